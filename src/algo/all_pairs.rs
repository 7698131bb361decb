use tracing::debug;

use super::*;

/// Floyd-Warshall on a matrix of direct distances.
///
/// Entries of the input are direct distances (`None` = no edge); the result holds the shortest
/// distance between every pair of nodes. A negative entry on the diagonal of the result indicates
/// a negative cycle through that node.
///
/// # Examples
/// ```
/// use casework::{prelude::*, algo::*};
///
/// let g = AdjArray::<u32>::from_edges(3, [(0, 1, 4), (1, 2, 1), (0, 2, 7)]);
/// let all = floyd_warshall(&DistanceMatrix::from_graph(&g));
/// assert_eq!(all.get(0, 2), Some(5));
/// assert_eq!(all.get(2, 0), None);
/// ```
pub fn floyd_warshall<W: Weight>(direct: &DistanceMatrix<W>) -> DistanceMatrix<W> {
    let mut dist = direct.clone();
    let n = dist.number_of_nodes();

    for k in 0..n {
        for i in 0..n {
            let Some(dik) = dist.get(i, k) else {
                continue;
            };
            for j in 0..n {
                let Some(dkj) = dist.get(k, j) else {
                    continue;
                };
                let through = dik + dkj;
                if dist.get(i, j).is_none_or(|dij| through < dij) {
                    dist.set(i, j, Some(through));
                }
            }
        }
    }

    dist
}

/// Provides all-pairs shortest paths directly on weighted graphs
pub trait AllPairsShortestPaths: ShortestPaths {
    /// Floyd-Warshall on the direct-distance matrix of the graph
    fn floyd_warshall(&self) -> DistanceMatrix<Self::Weight> {
        floyd_warshall(&DistanceMatrix::from_graph(self))
    }

    /// Runs Dijkstra from every node; requires non-negative weights
    fn all_pairs_dijkstra(&self) -> DistanceMatrix<Self::Weight> {
        let mut matrix = DistanceMatrix::new(self.number_of_nodes());
        for u in self.vertices_range() {
            let tree = self.dijkstra(u);
            for (v, d) in tree.reachable() {
                matrix.set(u, v, Some(d));
            }
        }
        debug!(n = self.number_of_nodes(), "computed all-pairs distances");
        matrix
    }
}

impl<G: ShortestPaths> AllPairsShortestPaths for G {}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64Mcg;

    use super::*;

    #[test]
    fn floyd_warshall_negative_edges() {
        let g = AdjArray::<i32>::from_edges(4, [(0, 2, -2), (2, 3, 2), (3, 1, -1), (1, 0, 4), (1, 2, 3)]);
        let all = g.floyd_warshall();

        assert_eq!(all.row(0), &[Some(0), Some(-1), Some(-2), Some(0)]);
        assert_eq!(all.row(1), &[Some(4), Some(0), Some(2), Some(4)]);
        assert!(all.has_zero_diagonal());
    }

    #[test]
    fn negative_cycle_on_diagonal() {
        let g = AdjArray::<i32>::from_edges(2, [(0, 1, 1), (1, 0, -3)]);
        let all = g.floyd_warshall();
        assert!(all.get(0, 0).unwrap() < 0);
        assert!(!all.has_zero_diagonal());
    }

    #[test]
    fn floyd_warshall_vs_dijkstra_random() {
        let rng = &mut Pcg64Mcg::seed_from_u64(3);

        for n in [4 as NumNodes, 15, 30] {
            for _ in 0..5 {
                let mut g = AdjArrayUndir::<u32>::new(n);
                for _ in 0..2 * n {
                    g.add_edge(rng.random_range(0..n), rng.random_range(0..n), rng.random_range(1..50));
                }

                assert_eq!(g.floyd_warshall(), g.all_pairs_dijkstra());
            }
        }
    }
}
