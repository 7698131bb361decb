/*!
# Graph Generators

Random weighted graphs for tests, benchmarks and the `generate` command of the CLI.

Generators follow a builder pattern:

1. Create a generator instance (e.g., `Gnp::new()`).
2. Set parameters using trait methods (e.g., `.nodes(n).prob(p).weights(1..=20)`).
3. Generate edges via `generate()` or `stream()`.

The [`RandomGraph`] trait wraps the generators into constructors of whole graphs, taking care of
the differences between directed and undirected representations.
[`GeneratorSubstructures`] adds paths and cycles to existing graphs.
*/

use std::ops::RangeInclusive;

use rand::{Rng, distr::uniform::SampleUniform};

use crate::prelude::*;

mod gnp;
mod substructures;

pub use gnp::*;
pub use substructures::*;

/// Trait for generators that allow setting the number of nodes.
pub trait NumNodesGen {
    /// Sets the number of nodes in the graph generator.
    fn nodes(self, n: NumNodes) -> Self;
}

/// Trait for generators that allow setting the average degree.
pub trait AverageDegreeGen {
    /// Set the average degree of this generator.
    fn avg_deg(self, deg: f64) -> Self;
}

/// General trait for a configurable random edge generator.
///
/// Types implementing this trait can produce a complete edge list
/// or a lazily-evaluated stream (iterator) of edges.
pub trait GraphGenerator {
    type Weight;

    /// Generates a list of random edges.
    fn generate<R>(&self, rng: &mut R) -> Vec<WeightedEdge<Self::Weight>>
    where
        R: Rng,
    {
        self.stream(rng).collect()
    }

    /// Creates a lazy iterator (stream) over generated edges.
    fn stream<R>(&self, rng: &mut R) -> impl Iterator<Item = WeightedEdge<Self::Weight>>
    where
        R: Rng;
}

/// Trait for building full graph instances from random models.
pub trait RandomGraph: Sized + WeightedAdjacencyList {
    /// Creates a `G(n,p)` graph without self-loops whose edge weights are drawn uniformly from
    /// `weights`. For undirected graphs, every unordered pair is connected with probability `p`.
    fn gnp_weighted<R>(rng: &mut R, n: NumNodes, p: f64, weights: RangeInclusive<Self::Weight>) -> Self
    where
        R: Rng;

    /// Like [`RandomGraph::gnp_weighted`], but additionally connects `0, 1, ..., n-1` by a path so
    /// that the graph is (strongly, if directed: in both directions) connected.
    fn gnp_connected<R>(rng: &mut R, n: NumNodes, p: f64, weights: RangeInclusive<Self::Weight>) -> Self
    where
        R: Rng;
}

impl<G> RandomGraph for G
where
    G: GraphFromScratch + GraphEdgeEditing + GraphType,
    G::Weight: SampleUniform + PartialOrd + Clone,
{
    fn gnp_weighted<R>(rng: &mut R, n: NumNodes, p: f64, weights: RangeInclusive<Self::Weight>) -> Self
    where
        R: Rng,
    {
        Self::from_edges(
            n,
            Gnp::new()
                .nodes(n)
                .prob(p)
                .weights(weights)
                .stream(rng)
                .filter(|e| Self::is_directed() || e.edge().is_normalized()),
        )
    }

    fn gnp_connected<R>(rng: &mut R, n: NumNodes, p: f64, weights: RangeInclusive<Self::Weight>) -> Self
    where
        R: Rng,
    {
        let mut graph = Self::gnp_weighted(rng, n, p, weights.clone());
        for u in 1..n {
            let w = rng.random_range(weights.clone());
            graph.add_edge(u - 1, u, w);
            if Self::is_directed() {
                graph.add_edge(u, u - 1, w);
            }
        }
        graph
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    use super::*;
    use crate::algo::Traversal;

    #[test]
    fn undirected_gnp_is_simple() {
        let rng = &mut Pcg64Mcg::seed_from_u64(3);
        let g = AdjArrayUndir::<u32>::gnp_weighted(rng, 30, 0.2, 1..=10);

        for u in g.vertices() {
            assert!(!g.has_self_loop(u));
            assert!(g.neighbors_of(u).all(|v| g.has_edge(v, u)));
        }
        assert!(g.weighted_edges(true).all(|e| (1..=10).contains(&e.2)));
    }

    #[test]
    fn connected_variant() {
        let rng = &mut Pcg64Mcg::seed_from_u64(3);
        let g = AdjArray::<f64>::gnp_connected(rng, 25, 0.01, 1.0..=2.0);
        for u in g.vertices() {
            assert!(g.is_reachable(0, u));
            assert!(g.is_reachable(u, 0));
        }
    }
}
