use std::fmt::{Debug, Display};

use num::Zero;

use super::*;

/// Dense `n x n` matrix of distances where `None` means that there is no (known) path.
///
/// Created from a graph (edge weights, `0` on the diagonal), from a complete table of known
/// distances, or as the output of an all-pairs shortest path algorithm.
#[derive(Clone, PartialEq)]
pub struct DistanceMatrix<W> {
    n: NumNodes,
    entries: Vec<Option<W>>,
}

impl<W: Weight> DistanceMatrix<W> {
    /// Creates a matrix where every node has distance `0` to itself and no other entries are known
    pub fn new(n: NumNodes) -> Self {
        let mut entries = vec![None; (n as usize) * (n as usize)];
        for u in 0..n as usize {
            entries[u * n as usize + u] = Some(W::zero());
        }
        Self { n, entries }
    }

    /// Creates the direct-distance matrix of a graph: `0` on the diagonal, the (smallest) edge
    /// weight for every edge and `None` otherwise.
    pub fn from_graph<G>(graph: &G) -> Self
    where
        G: WeightedAdjacencyList<Weight = W>,
    {
        let mut matrix = Self::new(graph.number_of_nodes());
        for WeightedEdge(u, v, w) in graph.weighted_edges(false) {
            let idx = matrix.index(u, v);
            let entry = &mut matrix.entries[idx];
            *entry = Some(match *entry {
                Some(x) => crate::weight::min_weight(x, w),
                None => w,
            });
        }
        matrix
    }

    /// Creates a matrix from a complete square table of known distances.
    /// ** Panics if the table is not square **
    pub fn from_rows(rows: Vec<Vec<W>>) -> Self {
        let n = rows.len();
        assert!(rows.iter().all(|r| r.len() == n), "distance table must be square");
        Self {
            n: n as NumNodes,
            entries: rows.into_iter().flatten().map(Some).collect(),
        }
    }
}

impl<W: Copy> DistanceMatrix<W> {
    fn index(&self, u: Node, v: Node) -> usize {
        assert!(u < self.n && v < self.n);
        (u as usize) * (self.n as usize) + v as usize
    }

    /// Returns the distance from `u` to `v` or `None` if `v` is unreachable from `u`.
    /// ** Panics if `u >= n || v >= n` **
    pub fn get(&self, u: Node, v: Node) -> Option<W> {
        self.entries[self.index(u, v)]
    }

    /// Overwrites the entry for `(u, v)`
    /// ** Panics if `u >= n || v >= n` **
    pub fn set(&mut self, u: Node, v: Node, dist: Option<W>) {
        let idx = self.index(u, v);
        self.entries[idx] = dist;
    }

    /// Returns all distances starting at `u`
    /// ** Panics if `u >= n` **
    pub fn row(&self, u: Node) -> &[Option<W>] {
        let n = self.n as usize;
        &self.entries[(u as usize) * n..(u as usize + 1) * n]
    }

    /// Iterates over all rows
    pub fn rows(&self) -> impl Iterator<Item = &[Option<W>]> + '_ {
        self.entries.chunks(self.n.max(1) as usize)
    }
}

impl<W> GraphNodeOrder for DistanceMatrix<W> {
    fn number_of_nodes(&self) -> NumNodes {
        self.n
    }
}

impl<W: Display + Copy> Debug for DistanceMatrix<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.rows() {
            for (i, x) in row.iter().enumerate() {
                if i > 0 {
                    write!(f, " ")?;
                }
                match x {
                    Some(x) => write!(f, "{x:>6}")?,
                    None => write!(f, "{:>6}", "INF")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl<W: Zero + Copy> DistanceMatrix<W> {
    /// Returns *true* if every entry on the diagonal is `0`
    pub fn has_zero_diagonal(&self) -> bool {
        (0..self.n).all(|u| self.get(u, u).is_some_and(|x| x.is_zero()))
    }
}
