/*!
# Node Representation

We choose `Node = u32` as the scenario networks (and the random graphs used to test the algorithms)
never come close to `2^32` nodes.
This allows us to (1) save space by not using `usize` or `u64` and (2) directly index with node values.
*/

use std::num::NonZero;
use stream_bitset::bitset::BitSetImpl;

/// Nodes can be any unsigned integer from `0` to `Node::MAX - 1`
pub type Node = u32;

/// Node-Value that is considered invalid
pub const INVALID_NODE: Node = Node::MAX;

/// There can be at most `2^32 - 1` nodes in a graph!
pub type NumNodes = Node;

/// BitSet for Nodes
pub type NodeBitSet = BitSetImpl<Node>;

/// As `Option<Node>` uses additional bytes for padding, it can be inefficient
/// since we often need `Vec<Option<Node>>` (predecessor arrays for example). This instead uses the
/// `NonZero`-Wrapper to assign a constant value the role of `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct OptionalNodeImpl<const N: Node>(NonZero<Node>);

/// Often, `INVALID_NODE` is safe to pick as the `None`-Value
pub type OptionalNode = OptionalNodeImpl<INVALID_NODE>;

impl<const N: Node> OptionalNodeImpl<N> {
    /// Returns `Some(OptionalNodeImpl)` if `n != N` and `None` otherwise
    pub const fn new(n: Node) -> Option<Self> {
        match NonZero::new(n ^ N) {
            Some(inner) => Some(OptionalNodeImpl(inner)),
            None => None,
        }
    }

    /// Gets the underlying Node-Value
    pub const fn get(&self) -> Node {
        self.0.get() ^ N
    }
}

/// Checks that `u` is a node of a graph with `n` nodes, returning a [`crate::Error`] otherwise.
///
/// Graph methods panic on invalid nodes; this is used at the boundary where node ids
/// come from scenario data or user input.
pub fn check_node(u: Node, n: NumNodes) -> crate::Result<Node> {
    if u < n {
        Ok(u)
    } else {
        Err(crate::Error::NodeOutOfRange { node: u, n })
    }
}
