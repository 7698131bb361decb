/*!
# Substructure Generators

Adds **paths** and **cycles** with a fixed edge weight to an already existing graph, e.g. to
guarantee connectivity of a random network or to build small scenario networks by hand.

# Example

```rust
use casework::{prelude::*, gens::*};

let mut g = AdjArray::<u32>::new(5);
g.connect_path([0, 1, 2], 4);
g.connect_cycle([2, 3, 4], 1);

assert_eq!(
    g.ordered_edges(false),
    vec![Edge(0, 1), Edge(1, 2), Edge(2, 3), Edge(3, 4), Edge(4, 2)]
);
assert_eq!(g.total_weight(), 11);
```
*/

use itertools::Itertools;

use super::*;

/// Trait for creating additional **substructures** (paths, cycles) inside an already existing graph.
pub trait GeneratorSubstructures: GraphEdgeEditing {
    /// Connects the given nodes in order with a **simple path** whose edges all weigh `w`.
    fn connect_path<P>(&mut self, nodes_on_path: P, w: Self::Weight)
    where
        P: IntoIterator<Item = Node>;

    /// Connects the given nodes with a **cycle** whose edges all weigh `w`: consecutive nodes are
    /// connected and the last node is connected back to the first.
    fn connect_cycle<C>(&mut self, nodes_in_cycle: C, w: Self::Weight)
    where
        C: IntoIterator<Item = Node>;
}

impl<G: GraphEdgeEditing> GeneratorSubstructures for G {
    fn connect_path<P>(&mut self, nodes_on_path: P, w: Self::Weight)
    where
        P: IntoIterator<Item = Node>,
    {
        for (u, v) in nodes_on_path.into_iter().tuple_windows() {
            self.add_edge(u, v, w);
        }
    }

    fn connect_cycle<C>(&mut self, nodes_in_cycle: C, w: Self::Weight)
    where
        C: IntoIterator<Item = Node>,
    {
        let mut iter = nodes_in_cycle.into_iter();

        // avoids cloning the iterator
        if let Some(first) = iter.next() {
            let mut prev = first;
            for cur in iter {
                self.add_edge(prev, cur, w);
                prev = cur;
            }

            self.add_edge(prev, first, w);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_path() {
        let mut g = AdjArray::<()>::new(6);
        g.connect_path([], ());
        g.connect_path([1], ());
        assert_eq!(g.number_of_edges(), 0);

        g.connect_path([0, 3, 1, 4], ());
        assert_eq!(g.ordered_edges(false), vec![Edge(0, 3), Edge(1, 4), Edge(3, 1)]);
    }

    #[test]
    fn connect_cycle() {
        let mut g = AdjArrayUndir::<u8>::new(6);
        g.connect_cycle([], 1);
        assert_eq!(g.number_of_edges(), 0);

        g.connect_cycle([1], 2);
        assert_eq!(g.number_of_edges(), 1);
        assert!(g.has_self_loop(1));

        g.connect_cycle([0, 3, 5], 3);
        assert_eq!(g.number_of_edges(), 4);
        assert_eq!(g.weight_of(5, 0), Some(3));
        assert_eq!(g.total_weight(), 11);
    }
}
