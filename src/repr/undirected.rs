use crate::{repr::macros::impl_common_graph_ops, testing::test_graph_ops};

use super::*;

/// An undirected graph representation.
/// Every edge `{u, v}` with `u != v` is stored in both neighborhoods; a self-loop is stored once.
#[derive(Clone)]
pub struct UndirectedGraph<Nbs: Neighborhood> {
    nbs: Vec<Nbs>,
    num_edges: NumEdges,
}

/// Representation using an Adjacency-Array; `W = ()` for unweighted graphs
pub type AdjArrayUndir<W = ()> = UndirectedGraph<ArrNeighborhood<W>>;

/// Representation using a sparse Adjacency-Array
pub type SparseAdjArrayUndir<W = ()> = UndirectedGraph<SparseNeighborhood<W>>;

impl_common_graph_ops!(UndirectedGraph<Nbs> => nbs, Undirected);

impl<Nbs: Neighborhood> GraphEdgeEditing for UndirectedGraph<Nbs> {
    fn add_edge(&mut self, u: Node, v: Node, w: Self::Weight) {
        assert!(v < self.number_of_nodes());
        self.nbs[u as usize].add_neighbor(v, w);
        if u != v {
            self.nbs[v as usize].add_neighbor(u, w);
        }
        self.num_edges += 1;
    }

    fn try_add_edge(&mut self, u: Node, v: Node, w: Self::Weight) -> bool {
        if self.has_edge(u, v) {
            true
        } else {
            self.add_edge(u, v, w);
            false
        }
    }

    fn try_remove_edge(&mut self, u: Node, v: Node) -> bool {
        if self.nbs[u as usize].try_remove_neighbor(v) {
            if u != v {
                assert!(self.nbs[v as usize].try_remove_neighbor(u));
            }
            self.num_edges -= 1;
            true
        } else {
            false
        }
    }
}

test_graph_ops!(test_adj_array_undir, AdjArrayUndir, true);
test_graph_ops!(test_sparse_adj_array_undir, SparseAdjArrayUndir, true);

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;

    #[test]
    fn weighted_undirected() {
        let mut graph = AdjArrayUndir::<f64>::from_edges(4, [(0, 1, 1.5), (2, 1, 2.0), (3, 3, 0.5)]);
        assert_eq!(graph.number_of_edges(), 3);
        assert_eq!(graph.weight_of(1, 2), Some(2.0));
        assert_eq!(graph.weight_of(2, 1), Some(2.0));
        assert_eq!(graph.degree_of(3), 1);
        assert_eq!(graph.total_weight(), 4.0);

        assert_eq!(
            graph.weighted_edges(true).collect_vec(),
            vec![
                WeightedEdge(0, 1, 1.5),
                WeightedEdge(1, 2, 2.0),
                WeightedEdge(3, 3, 0.5)
            ]
        );

        assert!(graph.try_remove_edge(2, 1));
        assert!(!graph.has_edge(1, 2));
        assert!(graph.try_remove_edge(3, 3));
        assert_eq!(graph.number_of_edges(), 1);
    }
}
