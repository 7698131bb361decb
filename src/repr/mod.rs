/*!
# Graph Representations

Adjacency-array based graphs parameterized by a [`Neighborhood`] which stores the
`(neighbor, weight)` pairs of a single node:

- [`ArrNeighborhood`] uses a `Vec`,
- [`SparseNeighborhood`] uses a `SmallVec` and avoids heap allocations for low-degree nodes.

Both are generic over the weight `W` which defaults to `()` for unweighted graphs.

Besides adjacency arrays, this module provides the dense [`DistanceMatrix`] used by all-pairs
algorithms and routing heuristics, and the [`Grid`] used for flood simulations.
*/

use crate::{ops::*, *};

mod directed;
mod grid;
mod matrix;
mod neighborhood;
mod undirected;

pub use directed::*;
pub use grid::*;
pub use matrix::*;
pub use neighborhood::*;
pub use undirected::*;

/// Trait for methods on the Neighborhood of a specified Node
pub trait Neighborhood: Clone {
    /// Weight attached to every entry
    type Weight: Copy + PartialOrd + std::fmt::Debug;

    fn new(n: NumNodes) -> Self;

    /// Returns the number of neighbors in the Neighborhood
    fn num_of_neighbors(&self) -> NumNodes;

    /// Returns an iterator over all `(neighbor, weight)` pairs in the Neighborhood
    fn weighted_neighbors(&self) -> impl Iterator<Item = (Node, Self::Weight)> + '_;

    /// Returns an iterator over all neighbors in the Neighborhood
    fn neighbors(&self) -> impl Iterator<Item = Node> + '_ {
        self.weighted_neighbors().map(|(v, _)| v)
    }

    /// Returns *true* if `v` is in the Neighborhood
    fn has_neighbor(&self, v: Node) -> bool {
        self.neighbors().any(|u| u == v)
    }

    /// Tries to add a neighbor to the Neighborhood.
    /// Returns *true* if the node was in the Neighborhood before (and leaves it unchanged).
    fn try_add_neighbor(&mut self, u: Node, w: Self::Weight) -> bool {
        if self.has_neighbor(u) {
            true
        } else {
            self.add_neighbor(u, w);
            false
        }
    }

    /// Adds a neighbor to the Neighborhood without checking if this neighbor exists beforehand.
    /// This might lead to Multi-Edges.
    fn add_neighbor(&mut self, u: Node, w: Self::Weight);

    /// Tries to remove a neighbor from the Neighborhood.
    /// Returns *true* if the node was in the Neighborhood before.
    /// Of multiple entries for the same node, only one is removed.
    fn try_remove_neighbor(&mut self, u: Node) -> bool;

    /// Removes all neighbors in the Neighborhood
    fn clear(&mut self);
}

pub(crate) mod macros {
    macro_rules! impl_common_graph_ops {
        ($struct:ident<$generic:ident> => $nbs:ident, $directed:ident) => {
            impl<$generic: Neighborhood> GraphType for $struct<$generic> {
                type Dir = $directed;
            }

            impl<$generic: Neighborhood> GraphNodeOrder for $struct<$generic> {
                fn number_of_nodes(&self) -> NumNodes {
                    self.$nbs.len() as NumNodes
                }
            }

            impl<$generic: Neighborhood> GraphEdgeOrder for $struct<$generic> {
                fn number_of_edges(&self) -> NumEdges {
                    self.num_edges
                }
            }

            impl<$generic: Neighborhood> AdjacencyList for $struct<$generic> {
                fn neighbors_of(&self, u: Node) -> impl Iterator<Item = Node> + '_ {
                    self.$nbs[u as usize].neighbors()
                }

                fn degree_of(&self, u: Node) -> NumNodes {
                    self.$nbs[u as usize].num_of_neighbors()
                }
            }

            impl<$generic: Neighborhood> WeightedAdjacencyList for $struct<$generic> {
                type Weight = <$generic as Neighborhood>::Weight;

                fn weighted_neighbors_of(
                    &self,
                    u: Node,
                ) -> impl Iterator<Item = (Node, Self::Weight)> + '_ {
                    self.$nbs[u as usize].weighted_neighbors()
                }
            }

            impl<$generic: Neighborhood> AdjacencyTest for $struct<$generic> {
                fn has_edge(&self, u: Node, v: Node) -> bool {
                    self.$nbs[u as usize].has_neighbor(v)
                }
            }

            impl<$generic: Neighborhood> GraphNew for $struct<$generic> {
                fn new(n: NumNodes) -> Self {
                    Self {
                        num_edges: 0,
                        $nbs: vec![$generic::new(n); n as usize],
                    }
                }
            }

            impl<$generic: Neighborhood> std::fmt::Debug for $struct<$generic> {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    f.debug_struct(stringify!($struct))
                        .field("n", &self.number_of_nodes())
                        .field("m", &self.num_edges)
                        .field(
                            "edges",
                            &self
                                .weighted_edges(<Self as GraphType>::is_undirected())
                                .collect::<Vec<_>>(),
                        )
                        .finish()
                }
            }
        };
    }

    pub(crate) use impl_common_graph_ops;
}
