/*!
# Scenarios

Small operations models that combine the graph algorithms, collections, sorting and string
matching of this crate. Every scenario has an explicit model type with a `sample()` constructor
holding a fixed set of seed data, and one method per operation of the scenario.

| scenario     | model                              | main building blocks                          |
|--------------|------------------------------------|-----------------------------------------------|
| [`dispatch`] | [`Hospital`](dispatch::Hospital)        | priority queue, Dijkstra                      |
| [`transit`]  | [`TrafficControl`](transit::TrafficControl) | Dijkstra, Bellman-Ford, Floyd-Warshall, A*, Kruskal, trie, nearest neighbour |
| [`counters`] | [`ServiceHall`](counters::ServiceHall)   | FIFO queues, priority queue                   |
| [`parking`]  | [`ParkingLot`](parking::ParkingLot)      | min-priority queue, merge sort                |
| [`pricing`]  | [`Shop`](pricing::Shop)                  | hash maps, BST, AVL, heaps, sorts, Dijkstra   |
| [`security`] | [`SecurityMonitor`](security::SecurityMonitor) | KMP, priority queue, BFS               |
| [`alerts`]   | [`AlertCenter`](alerts::AlertCenter)     | KMP, BFS, Dijkstra, priority queue            |
| [`flood`]    | [`FloodMonitor`](flood::FloodMonitor)    | priority queue, selection sort, grid flood    |
| [`city`]     | [`City`](city::City)                     | segment tree, Dijkstra, BFS layers, AVL, union-find |
| [`venue`]    | [`Venue`](venue::Venue)                  | priority queue, BFS hop path                  |
| [`freight`]  | [`FreightNetwork`](freight::FreightNetwork) | all-pairs Dijkstra, greedy assignment, 2-opt |

Each model also implements [`Scenario`], which runs the complete sequence of operations on the
current state and writes a plain-text report:

```
use casework::scenarios::{Scenario, venue::Venue};

let mut out = Vec::new();
Venue::sample().write_report(&mut out).unwrap();
let report = String::from_utf8(out).unwrap();
assert!(report.contains("1 2 4 6"));
```
*/

pub mod alerts;
pub mod city;
pub mod counters;
pub mod dispatch;
pub mod flood;
pub mod freight;
pub mod parking;
pub mod pricing;
pub mod security;
pub mod transit;
pub mod venue;

use std::io::Write;

use itertools::Itertools;

use crate::{Node, Result};

/// A runnable scenario
pub trait Scenario {
    /// Name of the scenario on the command line
    const NAME: &'static str;

    /// Runs all operations of the scenario and writes a human-readable report to `out`.
    /// Operations may change the state of the model (queues are drained, slots are taken, ...).
    fn write_report<W: Write>(&mut self, out: &mut W) -> Result<()>;
}

/// Writes a section header
pub(crate) fn section<W: Write>(out: &mut W, title: &str) -> Result<()> {
    writeln!(out, "\n== {title} ==")?;
    Ok(())
}

/// Formats a node path as `a b c`
pub(crate) fn format_path(path: &[Node]) -> String {
    path.iter().join(" ")
}

/// Formats an optional distance, `-` for unreachable
pub(crate) fn format_distance<W: std::fmt::Display>(d: Option<W>) -> String {
    d.map_or_else(|| "-".to_string(), |d| d.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formatting() {
        assert_eq!(format_path(&[1, 2, 4, 6]), "1 2 4 6");
        assert_eq!(format_path(&[]), "");
        assert_eq!(format_distance(Some(3)), "3");
        assert_eq!(format_distance::<u32>(None), "-");
    }
}
