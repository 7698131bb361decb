/*!
# Graph Algorithms

This module provides a suite of **graph algorithms** built on top of the graph representations in this crate.
All algorithms are re-exported at the top level of this module, so you can simply do:
```rust
use casework::algo::*;
```
and gain access to traversals, shortest paths, spanning forests, flood fill and routing heuristics.
If possible, algorithms are provided as **iterators** or as traits on the graph itself.
*/

mod all_pairs;
mod flood;
mod mst;
mod routing;
mod shortest_path;
pub mod traversal;

use crate::prelude::*;
use stream_bitset::prelude::*;

pub use all_pairs::*;
pub use flood::*;
pub use mst::*;
pub use routing::*;
pub use shortest_path::*;
pub use traversal::*;

/// Gives access to the graph an algorithm is running on
pub trait WithGraphRef<G> {
    /// Returns the graph being processed
    fn graph_ref(&self) -> &G;
}
