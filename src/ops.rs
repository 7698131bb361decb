/*!
# Graph Operations

Traits describing what a graph representation can do. Algorithms are written against these traits
(most of them only need [`AdjacencyList`] or [`WeightedAdjacencyList`]) so that every representation
in [`crate::repr`] can be used interchangeably.

Unweighted graphs are weighted graphs with `Weight = ()`; all unweighted operations are available
on weighted graphs by simply ignoring the weights.
*/

use std::{fmt::Debug, ops::Range};

use itertools::Itertools;
use num::Zero;
use stream_bitset::prelude::*;

use crate::{weight::min_weight, *};

/// Marker type for directed graphs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Directed;

/// Marker type for undirected graphs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Undirected;

/// Trait implemented by [`Directed`] and [`Undirected`]
pub trait GraphDir {
    const IS_DIRECTED: bool;
}

impl GraphDir for Directed {
    const IS_DIRECTED: bool = true;
}

impl GraphDir for Undirected {
    const IS_DIRECTED: bool = false;
}

/// Whether a graph is directed or undirected is decided at the type level
pub trait GraphType {
    type Dir: GraphDir;

    /// Returns *true* if edges are oriented
    fn is_directed() -> bool {
        Self::Dir::IS_DIRECTED
    }

    /// Returns *true* if `Edge(u, v)` and `Edge(v, u)` are the same edge
    fn is_undirected() -> bool {
        !Self::is_directed()
    }
}

/// Provides getters pertaining to the node-size of a graph
pub trait GraphNodeOrder {
    /// Returns the number of nodes of the graph
    fn number_of_nodes(&self) -> NumNodes;

    /// Return the number of nodes as usize
    fn len(&self) -> usize {
        self.number_of_nodes() as usize
    }

    /// Returns *true* if the graph has no nodes (and thus no edges)
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the range `0..n`.
    /// In contrast to `self.vertices()`, the range does not borrow `self`.
    fn vertices_range(&self) -> Range<Node> {
        0..self.number_of_nodes()
    }

    /// Returns an iterator over V
    fn vertices(&self) -> impl Iterator<Item = Node> + '_ {
        self.vertices_range()
    }

    /// Returns empty bitset with one entry per node
    fn vertex_bitset_unset(&self) -> NodeBitSet {
        NodeBitSet::new(self.number_of_nodes())
    }

    /// Checks that `u` is a node of this graph
    fn check_node(&self, u: Node) -> Result<Node> {
        crate::node::check_node(u, self.number_of_nodes())
    }
}

/// Provides getters pertaining to the edge-size of a graph
pub trait GraphEdgeOrder {
    /// Returns the number of edges of the graph.
    /// An undirected edge `{u, v}` is counted once.
    fn number_of_edges(&self) -> NumEdges;

    /// Returns *true* if the graph has no edges
    fn is_singleton_graph(&self) -> bool {
        self.number_of_edges() == 0
    }
}

/// Traits pertaining getters for neighborhoods & edges
pub trait AdjacencyList: GraphNodeOrder + Sized {
    /// Returns an iterator over the (open) neighborhood of a given vertex.
    /// Parallel edges yield the same neighbor multiple times.
    /// ** Panics if `u >= n` **
    ///
    /// Note that for directed graphs, these are the out-neighbors.
    fn neighbors_of(&self, u: Node) -> impl Iterator<Item = Node> + '_;

    /// Returns an iterator over the closed neighborhood of a given vertex.
    /// ** Panics if `u >= n` **
    fn closed_neighbors_of(&self, u: Node) -> impl Iterator<Item = Node> + '_ {
        std::iter::once(u).chain(self.neighbors_of(u))
    }

    /// Returns the number of (outgoing) neighbors of `u`
    /// ** Panics if `u >= n` **
    fn degree_of(&self, u: Node) -> NumNodes;

    /// Returns an iterator over the degrees of all nodes
    fn degrees(&self) -> impl Iterator<Item = NumNodes> + '_ {
        self.vertices().map(|u| self.degree_of(u))
    }

    /// Returns the maximum degree in the graph
    fn max_degree(&self) -> NumNodes {
        self.degrees().max().unwrap_or(0)
    }

    /// Returns an iterator to all vertices with non-zero degree
    fn vertices_with_neighbors(&self) -> impl Iterator<Item = Node> + '_ {
        self.vertices().filter(|&u| self.degree_of(u) > 0)
    }

    /// Returns a NodeBitSet with the neighbors of `u`
    /// ** Panics if `u >= n` **
    fn neighbors_of_as_bitset(&self, u: Node) -> NodeBitSet {
        let mut set = self.vertex_bitset_unset();
        for v in self.neighbors_of(u) {
            set.set_bit(v);
        }
        set
    }

    /// Returns an iterator over outgoing edges of a given vertex.
    /// If `only_normalized`, then only edges `(u, v)` with `u <= v` are considered.
    /// ** Panics if `u >= n` **
    fn edges_of(&self, u: Node, only_normalized: bool) -> impl Iterator<Item = Edge> + '_ {
        self.neighbors_of(u)
            .map(move |v| Edge(u, v))
            .filter(move |e| !only_normalized || e.is_normalized())
    }

    /// Returns an iterator over all edges in the graph.
    /// If `only_normalized`, then only edges `(u, v)` with `u <= v` are considered.
    fn edges(&self, only_normalized: bool) -> impl Iterator<Item = Edge> + '_ {
        self.vertices_range()
            .flat_map(move |u| self.edges_of(u, only_normalized))
    }

    /// Returns all edges in the graph in sorted order.
    /// If `only_normalized`, then only edges `(u, v)` with `u <= v` are considered.
    fn ordered_edges(&self, only_normalized: bool) -> Vec<Edge> {
        let mut edges = self.edges(only_normalized).collect_vec();
        edges.sort_unstable();
        edges
    }
}

/// Weighted view of an adjacency list
pub trait WeightedAdjacencyList: AdjacencyList {
    /// Weight attached to each edge (`()` for unweighted graphs)
    type Weight: Copy + PartialOrd + Debug;

    /// Returns an iterator over `(neighbor, weight)` pairs of a given vertex.
    /// ** Panics if `u >= n` **
    fn weighted_neighbors_of(&self, u: Node) -> impl Iterator<Item = (Node, Self::Weight)> + '_;

    /// Returns an iterator over weighted outgoing edges of a given vertex.
    /// If `only_normalized`, then only edges `(u, v)` with `u <= v` are considered.
    /// ** Panics if `u >= n` **
    fn weighted_edges_of(
        &self,
        u: Node,
        only_normalized: bool,
    ) -> impl Iterator<Item = WeightedEdge<Self::Weight>> + '_ {
        self.weighted_neighbors_of(u)
            .filter(move |&(v, _)| !only_normalized || u <= v)
            .map(move |(v, w)| WeightedEdge(u, v, w))
    }

    /// Returns an iterator over all weighted edges in the graph.
    /// If `only_normalized`, then only edges `(u, v)` with `u <= v` are considered.
    fn weighted_edges(
        &self,
        only_normalized: bool,
    ) -> impl Iterator<Item = WeightedEdge<Self::Weight>> + '_ {
        self.vertices_range()
            .flat_map(move |u| self.weighted_edges_of(u, only_normalized))
    }

    /// Returns the weight of the edge `(u, v)` or `None` if there is no such edge.
    /// If there are parallel edges, the smallest weight is returned.
    /// ** Panics if `u >= n` **
    fn weight_of(&self, u: Node, v: Node) -> Option<Self::Weight> {
        self.weighted_neighbors_of(u)
            .filter(|&(x, _)| x == v)
            .map(|(_, w)| w)
            .reduce(min_weight)
    }

    /// Returns the sum of all edge weights (undirected edges are counted once)
    fn total_weight(&self) -> Self::Weight
    where
        Self: GraphType,
        Self::Weight: Weight,
    {
        self.weighted_edges(Self::is_undirected())
            .fold(Self::Weight::zero(), |acc, e| acc + e.weight())
    }
}

/// Additional getters for directed graphs
pub trait DirectedAdjacencyList: AdjacencyList + GraphType<Dir = Directed> {
    /// Returns an iterator over nodes `v` with edges `(u, v)`
    /// ** Panics if `u >= n` **
    #[inline]
    fn out_neighbors_of(&self, u: Node) -> impl Iterator<Item = Node> + '_ {
        self.neighbors_of(u)
    }

    /// Returns the number of outgoing neighbors of a given vertex
    /// ** Panics if `u >= n` **
    #[inline]
    fn out_degree_of(&self, u: Node) -> NumNodes {
        self.degree_of(u)
    }

    /// Returns an iterator over nodes `v` with edges `(v, u)`.
    /// Scans all neighborhoods.
    /// ** Panics if `u >= n` **
    fn in_neighbors_of(&self, u: Node) -> impl Iterator<Item = Node> + '_ {
        self.vertices()
            .flat_map(move |v| self.neighbors_of(v).filter(move |&x| x == u).map(move |_| v))
    }

    /// Returns the number of incoming edges of a given vertex
    /// ** Panics if `u >= n` **
    fn in_degree_of(&self, u: Node) -> NumNodes {
        self.in_neighbors_of(u).count() as NumNodes
    }

    /// Returns the in-degrees of all nodes computed in a single pass over all edges
    fn in_degrees(&self) -> Vec<NumNodes> {
        let mut in_degs = vec![0; self.len()];
        for Edge(_, v) in self.edges(false) {
            in_degs[v as usize] += 1;
        }
        in_degs
    }
}

impl<G: AdjacencyList + GraphType<Dir = Directed>> DirectedAdjacencyList for G {}

/// Trait to test existence of certain structures in a graph.
pub trait AdjacencyTest: GraphNodeOrder {
    /// Returns *true* if the egde (u,v) exists in the graph.
    /// ** Panics if `u >= n || v >= n` **
    fn has_edge(&self, u: Node, v: Node) -> bool;

    /// Returns *true* if a self-loop (u,u) exists.
    /// ** Panics if `u >= n` **
    fn has_self_loop(&self, u: Node) -> bool {
        self.has_edge(u, u)
    }
}

/// Trait for creating a new empty graph
pub trait GraphNew {
    /// Creates an empty graph with n singleton nodes
    fn new(n: NumNodes) -> Self;
}

/// Provides functions to insert/delete edges
pub trait GraphEdgeEditing: GraphNew + WeightedAdjacencyList {
    /// Adds the edge `(u, v)` with weight `w` to the graph.
    /// Does not check for an existing edge, so parallel edges can be created.
    /// ** Panics if `u >= n || v >= n` **
    fn add_edge(&mut self, u: Node, v: Node, w: Self::Weight);

    /// Adds the edge `(u, v)` with weight `w` to the graph if it is not present yet.
    /// Returns *true* exactly if the edge was present previously (the graph is then unchanged).
    /// ** Panics if `u >= n || v >= n` **
    fn try_add_edge(&mut self, u: Node, v: Node, w: Self::Weight) -> bool;

    /// Adds all edges in the collection
    fn add_edges<I, E>(&mut self, edges: I)
    where
        I: IntoIterator<Item = E>,
        E: Into<WeightedEdge<Self::Weight>>,
    {
        for WeightedEdge(u, v, w) in edges.into_iter().map(|e| e.into()) {
            self.add_edge(u, v, w);
        }
    }

    /// Removes the edge `(u, v)` from the graph. Of parallel edges, only one is removed.
    /// If an edge was removed, returns *true* and *false* otherwise.
    /// ** Panics if `u >= n || v >= n` **
    fn try_remove_edge(&mut self, u: Node, v: Node) -> bool;

    /// Removes the edge `(u, v)` from the graph.
    /// ** Panics if the edge is not present or `u, v >= n` **
    fn remove_edge(&mut self, u: Node, v: Node) {
        assert!(self.try_remove_edge(u, v));
    }
}

/// A super trait for creating a graph from scratch from a set of edges and a number of nodes
pub trait GraphFromScratch: WeightedAdjacencyList {
    /// Create a graph from a number of nodes and a collection of (weighted) edges
    fn from_edges<I, E>(n: NumNodes, edges: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<WeightedEdge<Self::Weight>>;
}

impl<G: GraphEdgeEditing> GraphFromScratch for G {
    fn from_edges<I, E>(n: NumNodes, edges: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<WeightedEdge<Self::Weight>>,
    {
        let mut graph = Self::new(n);
        graph.add_edges(edges);
        graph
    }
}
