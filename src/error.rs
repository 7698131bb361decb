use thiserror::Error;

use crate::Node;

/// Errors raised by data-dependent operations of this crate.
///
/// Programming errors (indexing a node `>= n` on a graph) still panic; this enum covers
/// everything that depends on input data such as scenario records or network files.
#[derive(Error, Debug)]
pub enum Error {
    #[error("node {node} is out of range for a graph with {n} nodes")]
    NodeOutOfRange { node: Node, n: Node },

    #[error("negative cycle reachable from the source (detected at node {node})")]
    NegativeCycle { node: Node },

    #[error("edge ({u}, {v}) has a negative weight, which Dijkstra cannot handle")]
    NegativeWeight { u: Node, v: Node },

    #[error("cell ({row}, {col}) lies outside of a {rows}x{cols} grid")]
    CellOutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("invalid range {start}..{end} for a sequence of length {len}")]
    InvalidRange { start: usize, end: usize, len: usize },

    #[error("unknown item `{0}`")]
    UnknownItem(String),

    #[error("unknown vehicle `{0}`")]
    UnknownVehicle(String),

    #[error("unknown customer `{0}`")]
    UnknownCustomer(String),

    #[error("the {0} desk needs at least one counter")]
    NoCounter(String),

    #[error("no free slot available for `{0}`")]
    NoSlotAvailable(String),

    #[error("vehicle `{0}` is already parked")]
    AlreadyParked(String),

    #[error("duplicate id `{0}`")]
    Duplicate(String),

    #[error("insufficient stock for `{item}`: requested {requested}, available {available}")]
    InsufficientStock {
        item: String,
        requested: u32,
        available: u32,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type of this crate
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(
            Error::NodeOutOfRange { node: 7, n: 5 }.to_string(),
            "node 7 is out of range for a graph with 5 nodes"
        );
        assert_eq!(
            Error::UnknownItem("Latte".into()).to_string(),
            "unknown item `Latte`"
        );

        let io: Error = std::io::Error::new(std::io::ErrorKind::InvalidData, "bad header").into();
        assert_eq!(io.to_string(), "bad header");
    }
}
