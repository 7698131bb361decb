/*!
# Directed Graph Representations

A directed graph stores only the **outgoing** neighborhoods of its nodes. Incoming neighborhoods
are derived on demand by [`DirectedAdjacencyList::in_neighbors_of`] which scans all nodes.

## Provided Representations

- [`AdjArray`]: adjacency arrays (`Vec<(Node, W)>`)
- [`SparseAdjArray`]: inline small vectors
*/

use crate::{repr::macros::impl_common_graph_ops, testing::test_graph_ops};

use super::*;

/// A directed graph storing only **outgoing neighborhoods**.
///
/// # Type parameters
/// - `OutNbs`: [`Neighborhood`] implementation used for outgoing adjacency.
#[derive(Clone)]
pub struct DirectedGraph<OutNbs>
where
    OutNbs: Neighborhood,
{
    out_nbs: Vec<OutNbs>,
    num_edges: NumEdges,
}

/// Directed graph using adjacency arrays; `W = ()` for unweighted graphs.
pub type AdjArray<W = ()> = DirectedGraph<ArrNeighborhood<W>>;

/// Directed graph using sparse adjacency arrays (`SmallVec`).
pub type SparseAdjArray<W = ()> = DirectedGraph<SparseNeighborhood<W>>;

impl_common_graph_ops!(DirectedGraph<OutNbs> => out_nbs, Directed);

impl<OutNbs> GraphEdgeEditing for DirectedGraph<OutNbs>
where
    OutNbs: Neighborhood,
{
    fn add_edge(&mut self, u: Node, v: Node, w: Self::Weight) {
        assert!(v < self.number_of_nodes());
        self.out_nbs[u as usize].add_neighbor(v, w);
        self.num_edges += 1;
    }

    fn try_add_edge(&mut self, u: Node, v: Node, w: Self::Weight) -> bool {
        assert!(v < self.number_of_nodes());
        if self.out_nbs[u as usize].try_add_neighbor(v, w) {
            true
        } else {
            self.num_edges += 1;
            false
        }
    }

    fn try_remove_edge(&mut self, u: Node, v: Node) -> bool {
        if self.out_nbs[u as usize].try_remove_neighbor(v) {
            self.num_edges -= 1;
            true
        } else {
            false
        }
    }
}

impl<OutNbs: Neighborhood> DirectedGraph<OutNbs> {
    /// Returns the graph with every edge reversed (weights are kept)
    pub fn reversed(&self) -> Self {
        let mut rev = Self::new(self.number_of_nodes());
        for WeightedEdge(u, v, w) in self.weighted_edges(false) {
            rev.add_edge(v, u, w);
        }
        rev
    }
}

// ---------- Testing ----------

test_graph_ops!(test_adj_array, AdjArray, false);
test_graph_ops!(test_sparse_adj_array, SparseAdjArray, false);

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;

    #[test]
    fn weighted_directed() {
        let mut graph = AdjArray::<u32>::from_edges(4, [(0, 1, 5), (1, 2, 3), (0, 1, 2)]);
        assert_eq!(graph.number_of_edges(), 3);
        assert_eq!(graph.weight_of(0, 1), Some(2));
        assert_eq!(graph.weight_of(1, 0), None);
        assert_eq!(graph.total_weight(), 10);

        assert_eq!(graph.in_neighbors_of(1).collect_vec(), vec![0, 0]);
        assert_eq!(graph.in_degrees(), vec![0, 2, 1, 0]);

        assert!(graph.try_add_edge(1, 2, 9));
        assert_eq!(graph.number_of_edges(), 3);

        let rev = graph.reversed();
        assert_eq!(rev.weight_of(2, 1), Some(3));
        assert!(!rev.has_edge(1, 2));

        graph.remove_edge(0, 1);
        assert_eq!(graph.weight_of(0, 1), Some(2));
        assert_eq!(graph.number_of_edges(), 2);
    }
}
