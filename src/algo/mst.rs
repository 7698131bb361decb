use itertools::Itertools;
use num::Zero;
use tracing::debug;

use super::*;
use crate::collections::UnionFind;

/// Minimum spanning forest: one minimum spanning tree per connected component
#[derive(Clone, Debug, PartialEq)]
pub struct SpanningForest<W> {
    /// Selected edges in the order Kruskal picked them (non-decreasing weight)
    pub edges: Vec<WeightedEdge<W>>,
    /// Sum of the weights of all selected edges
    pub total_weight: W,
    /// Number of connected components (trees) of the forest
    pub components: NumNodes,
}

impl<W> SpanningForest<W> {
    /// Returns *true* if the forest is a single tree spanning all nodes
    pub fn is_spanning_tree(&self) -> bool {
        self.components <= 1
    }
}

/// Kruskal's algorithm on `n` nodes and an arbitrary list of weighted edges.
///
/// Edges are considered by non-decreasing weight; equal weights keep their input order.
/// Self-loops never join two components and are skipped.
///
/// # Examples
/// ```
/// use casework::{prelude::*, algo::*};
///
/// let forest = kruskal(4, [(0, 1, 4), (1, 2, 1), (0, 2, 3), (2, 3, 2)]);
/// assert_eq!(forest.total_weight, 6);
/// assert_eq!(forest.edges, vec![WeightedEdge(1, 2, 1), WeightedEdge(2, 3, 2), WeightedEdge(0, 2, 3)]);
/// assert!(forest.is_spanning_tree());
/// ```
pub fn kruskal<W, I, E>(n: NumNodes, edges: I) -> SpanningForest<W>
where
    W: Weight,
    I: IntoIterator<Item = E>,
    E: Into<WeightedEdge<W>>,
{
    let mut edges = edges.into_iter().map(|e| e.into()).collect_vec();
    edges.sort_by(|a, b| cmp_weights(&a.2, &b.2));

    let mut sets = UnionFind::new(n as usize);
    let mut forest = SpanningForest {
        edges: Vec::with_capacity((n as usize).saturating_sub(1)),
        total_weight: W::zero(),
        components: n,
    };

    for e in edges {
        let WeightedEdge(u, v, w) = e;
        if sets.union(u as usize, v as usize) {
            forest.total_weight = forest.total_weight + w;
            forest.edges.push(e);
            forest.components -= 1;

            if forest.components == 1 {
                break;
            }
        }
    }

    debug!(
        edges = forest.edges.len(),
        components = forest.components,
        "kruskal finished"
    );
    forest
}

/// Provides a minimum spanning forest directly on undirected weighted graphs
pub trait MinimumSpanningForest: WeightedAdjacencyList<Weight: Weight> + GraphType<Dir = Undirected> {
    /// Kruskal's algorithm over the normalized edges of the graph
    fn minimum_spanning_forest(&self) -> SpanningForest<Self::Weight> {
        kruskal(self.number_of_nodes(), self.weighted_edges(true))
    }
}

impl<G> MinimumSpanningForest for G where
    G: WeightedAdjacencyList<Weight: Weight> + GraphType<Dir = Undirected>
{
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64Mcg;

    use super::*;

    #[test]
    fn forest_of_two_components() {
        let g = AdjArrayUndir::<f64>::from_edges(
            6,
            [(0, 1, 2.0), (1, 2, 1.0), (0, 2, 2.5), (3, 4, 0.5), (4, 4, 0.1)],
        );
        let forest = g.minimum_spanning_forest();

        assert_eq!(forest.components, 3); // {0,1,2}, {3,4}, {5}
        assert_eq!(forest.total_weight, 3.5);
        assert_eq!(forest.edges.len(), 3);
        assert!(!forest.is_spanning_tree());
    }

    #[test]
    fn empty_graph() {
        let forest = kruskal::<u32, _, WeightedEdge<u32>>(0, []);
        assert_eq!(forest.total_weight, 0);
        assert!(forest.is_spanning_tree());
    }

    /// Cut property: every edge outside the forest is not lighter than the heaviest edge on the
    /// tree path between its endpoints.
    #[test]
    fn cycle_property_random() {
        let rng = &mut Pcg64Mcg::seed_from_u64(3);

        for n in [5 as NumNodes, 12, 25] {
            for _ in 0..5 {
                let mut g = AdjArrayUndir::<u32>::new(n);
                for _ in 0..3 * n {
                    let (u, v) = (rng.random_range(0..n), rng.random_range(0..n));
                    if u != v {
                        g.add_edge(u, v, rng.random_range(1..30));
                    }
                }

                let forest = g.minimum_spanning_forest();
                let tree = AdjArrayUndir::<u32>::from_edges(n, forest.edges.iter().copied());
                assert_eq!(tree.total_weight(), forest.total_weight);

                for WeightedEdge(u, v, w) in g.weighted_edges(true) {
                    let path = tree.hop_path(u, v).unwrap();
                    let heaviest = path
                        .iter()
                        .tuple_windows()
                        .map(|(&a, &b)| tree.weight_of(a, b).unwrap())
                        .max()
                        .unwrap_or(0);
                    assert!(heaviest <= w);
                }
            }
        }
    }
}
