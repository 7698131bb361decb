/*!
`casework` is a library of classic graph, tree, heap, string and sorting algorithms together with
a set of small operations scenarios (dispatch, transit, parking, pricing, ...) built on top of them.

# Representation

We represent **nodes** as `u32` in the range `0..n` where `n` is the number of nodes in the graph.
For **edges**, we use a simple tuple-struct `Edge(Node, Node)` and `WeightedEdge<W>(Node, Node, W)`
for edges carrying a weight. Unweighted graphs are weighted graphs with `W = ()`.

Distances are reported as `Option<W>`: `None` means *unreachable*.

### Directed vs Undirected

- In an **undirected** graph, `Edge(u, v)` is treated as equivalent to `Edge(v, u)`.
- In a **directed** graph, the edge has orientation, so `Edge(u, v)` and `Edge(v, u)` are distinct.

See the [`repr`] module for the storage backends ([`AdjArray`](crate::repr::AdjArray),
[`AdjArrayUndir`](crate::repr::AdjArrayUndir), their sparse variants, the
[`DistanceMatrix`](crate::repr::DistanceMatrix) and the [`Grid`](crate::repr::Grid)).

# Design

All algorithms are provided as configurable structs that one can alter to their needs using either
the *Builder* / *Setter* pattern before running them on a provided graph. The commonly used
functionality is also implemented via traits on the graph itself:

```
use casework::{prelude::*, algo::*};

let g = AdjArrayUndir::<u32>::from_edges(4, [(0, 1, 4), (1, 2, 1), (0, 2, 7), (2, 3, 2)]);

let tree = g.dijkstra(0);
assert_eq!(tree.distance_to(3), Some(7));
assert_eq!(tree.path_to(3), Some(vec![0, 1, 2, 3]));

let hops: Vec<_> = g.bfs(0).collect();
assert_eq!(hops[0], 0);
```

# Usage

- [`prelude`] includes definitions for nodes, edges, weights, errors, graph operation traits and
  all representations,
- [`algo`] includes traversals, shortest paths, spanning forests, flood fill and routing heuristics,
- [`collections`] includes union-find, segment tree, search trees, trie and priority queues,
- [`sorting`] and [`text`] include the classic sorting algorithms and KMP string matching,
- [`gens`] generates random weighted graphs, [`io`] reads and writes them,
- [`scenarios`] contains the operations models that tie everything together.
*/

pub mod algo;
pub mod collections;
pub mod edge;
pub mod error;
pub mod gens;
pub mod io;
pub mod node;
pub mod ops;
pub mod repr;
pub mod scenarios;
pub mod sorting;
pub(crate) mod testing;
pub mod text;
pub mod weight;

pub use edge::*;
pub use error::{Error, Result};
pub use node::*;
pub use weight::*;

/// `casework::prelude` includes definitions for nodes, edges and weights, all basic graph operation
/// traits as well as all implemented representations.
pub mod prelude {
    pub use super::{
        edge::*,
        error::{Error, Result},
        node::*,
        ops::*,
        repr::*,
        weight::*,
    };
}
