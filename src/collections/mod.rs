/*!
# Collections

Classic textbook data structures used by the algorithms and scenarios:

- [`UnionFind`]: disjoint sets with path compression and union by rank
- [`SegmentTree`]: range sums with point updates
- [`BstMap`] / [`AvlMap`]: unbalanced and self-balancing search trees
- [`Trie`]: prefix tree with autocomplete
- [`PriorityQueue`] / [`MinPriorityQueue`]: binary heaps with FIFO tie-breaking
*/

mod avl;
mod bst;
mod priority_queue;
mod segment_tree;
mod trie;
mod union_find;

pub use avl::*;
pub use bst::*;
pub use priority_queue::*;
pub use segment_tree::*;
pub use trie::*;
pub use union_find::*;
