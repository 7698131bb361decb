use std::fmt::Debug;

use itertools::Itertools;
use smallvec::{Array, SmallVec};

use super::*;

/// Basic Neighborhood-Impl. using `Vec<(Node, W)>`
#[derive(Clone, Debug)]
pub struct ArrNeighborhood<W = ()>(pub Vec<(Node, W)>);

impl<W> Default for ArrNeighborhood<W> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<W: Copy + PartialOrd + Debug> Neighborhood for ArrNeighborhood<W> {
    type Weight = W;

    fn new(_n: NumNodes) -> Self {
        Self::default()
    }

    fn num_of_neighbors(&self) -> NumNodes {
        self.0.len() as NumNodes
    }

    fn weighted_neighbors(&self) -> impl Iterator<Item = (Node, W)> + '_ {
        self.0.iter().copied()
    }

    fn add_neighbor(&mut self, u: Node, w: W) {
        self.0.push((u, w));
    }

    fn try_remove_neighbor(&mut self, u: Node) -> bool {
        if let Some((pos, _)) = self.0.iter().find_position(|&&(x, _)| x == u) {
            // keep insertion order so traversals stay deterministic
            self.0.remove(pos);
            true
        } else {
            false
        }
    }

    fn clear(&mut self) {
        self.0.clear();
    }
}

/// Like [`ArrNeighborhood`] but uses `SmallVec<[(Node, W); N]>` instead.
/// Prefer this if the graph is known to be sparse.
#[derive(Clone)]
pub struct SparseNeighborhood<W = (), const N: usize = 4>(pub SmallVec<[(Node, W); N]>)
where
    [(Node, W); N]: Array<Item = (Node, W)>;

impl<W, const N: usize> Default for SparseNeighborhood<W, N>
where
    [(Node, W); N]: Array<Item = (Node, W)>,
{
    fn default() -> Self {
        Self(SmallVec::new())
    }
}

impl<W: Copy + PartialOrd + Debug, const N: usize> Neighborhood for SparseNeighborhood<W, N>
where
    [(Node, W); N]: Array<Item = (Node, W)>,
{
    type Weight = W;

    fn new(_n: NumNodes) -> Self {
        Self::default()
    }

    fn num_of_neighbors(&self) -> NumNodes {
        self.0.len() as NumNodes
    }

    fn weighted_neighbors(&self) -> impl Iterator<Item = (Node, W)> + '_ {
        self.0.iter().copied()
    }

    fn add_neighbor(&mut self, u: Node, w: W) {
        self.0.push((u, w));
    }

    fn try_remove_neighbor(&mut self, u: Node) -> bool {
        if let Some((pos, _)) = self.0.iter().find_position(|&&(x, _)| x == u) {
            self.0.remove(pos);
            true
        } else {
            false
        }
    }

    fn clear(&mut self) {
        self.0.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arr_neighborhood() {
        let mut nbs = ArrNeighborhood::<u32>::new(5);
        assert!(!nbs.try_add_neighbor(3, 7));
        assert!(nbs.try_add_neighbor(3, 1));
        nbs.add_neighbor(1, 2);
        nbs.add_neighbor(3, 4);

        assert_eq!(nbs.num_of_neighbors(), 3);
        assert_eq!(nbs.neighbors().collect_vec(), vec![3, 1, 3]);

        assert!(nbs.try_remove_neighbor(3));
        assert_eq!(nbs.weighted_neighbors().collect_vec(), vec![(1, 2), (3, 4)]);
        assert!(!nbs.try_remove_neighbor(0));

        nbs.clear();
        assert_eq!(nbs.num_of_neighbors(), 0);
    }

    #[test]
    fn sparse_neighborhood_spills() {
        let mut nbs = SparseNeighborhood::<f64>::new(20);
        for u in 0..10 {
            nbs.add_neighbor(u, u as f64 * 0.5);
        }
        assert_eq!(nbs.num_of_neighbors(), 10);
        assert!(nbs.has_neighbor(9));
        assert!(nbs.try_remove_neighbor(0));
        assert_eq!(nbs.neighbors().next(), Some(1));
    }
}
