/*!
# Routing Heuristics

Construction and improvement heuristics for vehicle routes on top of a [`DistanceMatrix`]
(usually the all-pairs shortest path distances of a road network).

A *route* is a sequence of nodes; its length is the sum of the distances between consecutive nodes.
*/

use itertools::Itertools;
use num::Zero;
use tracing::debug;

use super::*;

/// Sum of the distances between consecutive nodes of `route`.
/// Returns `None` if any leg is unreachable; empty and single-node routes have length `0`.
///
/// # Examples
/// ```
/// use casework::{prelude::*, algo::*};
///
/// let m = DistanceMatrix::from_rows(vec![vec![0, 3, 5], vec![3, 0, 1], vec![5, 1, 0]]);
/// assert_eq!(route_length(&[0, 1, 2, 0], &m), Some(9));
/// ```
pub fn route_length<W: Weight>(route: &[Node], matrix: &DistanceMatrix<W>) -> Option<W> {
    route
        .iter()
        .tuple_windows()
        .try_fold(W::zero(), |acc, (&a, &b)| Some(acc + matrix.get(a, b)?))
}

/// Result of [`nearest_neighbor_tour`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NearestNeighborTour {
    /// `start` followed by the stops in visiting order
    pub route: Vec<Node>,
    /// Stops that could not be reached from the tour
    pub skipped: Vec<Node>,
}

/// Greedy tour from `start` that always proceeds to the nearest stop not visited yet.
///
/// Every entry of `stops` is visited once (duplicates are visited separately). Ties are broken by
/// the position in `stops`. Stops that are unreachable from the current position at the end are
/// reported in [`NearestNeighborTour::skipped`].
///
/// # Examples
/// ```
/// use casework::{prelude::*, algo::*};
///
/// let m = DistanceMatrix::from_rows(vec![
///     vec![0, 2, 9, 4],
///     vec![2, 0, 6, 3],
///     vec![9, 6, 0, 8],
///     vec![4, 3, 8, 0],
/// ]);
/// let tour = nearest_neighbor_tour(&m, 0, &[2, 3, 1]);
/// assert_eq!(tour.route, vec![0, 1, 3, 2]);
/// ```
pub fn nearest_neighbor_tour<W: Weight>(
    matrix: &DistanceMatrix<W>,
    start: Node,
    stops: &[Node],
) -> NearestNeighborTour {
    let mut used = vec![false; stops.len()];
    let mut route = Vec::with_capacity(stops.len() + 1);
    route.push(start);

    let mut current = start;
    loop {
        let mut best: Option<(usize, W)> = None;
        for (i, &stop) in stops.iter().enumerate() {
            if used[i] {
                continue;
            }
            let Some(d) = matrix.get(current, stop) else {
                continue;
            };
            if best.is_none_or(|(_, bd)| d < bd) {
                best = Some((i, d));
            }
        }

        let Some((i, _)) = best else {
            break;
        };
        used[i] = true;
        current = stops[i];
        route.push(current);
    }

    let skipped = stops
        .iter()
        .zip(&used)
        .filter_map(|(&s, &u)| (!u).then_some(s))
        .collect_vec();

    if !skipped.is_empty() {
        debug!(?skipped, "stops unreachable from nearest-neighbor tour");
    }

    NearestNeighborTour { route, skipped }
}

/// Best-improvement 2-opt local search.
///
/// In each iteration, the move `reverse(route[i..=j])` with the largest gain is applied as long as
/// the gain exceeds `min_gain`. The first and last node of the route are never moved, so closed
/// tours (`depot, ..., depot`) and open paths are both supported. The gain includes the reversed
/// legs inside the segment, so asymmetric matrices are handled as well.
///
/// # Examples
/// ```
/// use casework::{prelude::*, algo::*};
///
/// // four corners of a unit square, visited crosswise
/// let m = DistanceMatrix::from_rows(vec![
///     vec![0.0, 1.0, 1.5, 1.0],
///     vec![1.0, 0.0, 1.0, 1.5],
///     vec![1.5, 1.0, 0.0, 1.0],
///     vec![1.0, 1.5, 1.0, 0.0],
/// ]);
/// let mut route = vec![0, 2, 1, 3, 0];
/// let moves = TwoOpt::new().min_gain(1e-9).run(&mut route, &m);
/// assert_eq!(moves, 1);
/// assert_eq!(route_length(&route, &m), Some(4.0));
/// ```
#[derive(Clone, Debug)]
pub struct TwoOpt<W> {
    iteration_limit: usize,
    min_gain: W,
}

impl<W: Weight> Default for TwoOpt<W> {
    fn default() -> Self {
        Self {
            iteration_limit: 100,
            min_gain: W::zero(),
        }
    }
}

impl<W: Weight> TwoOpt<W> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maximum number of applied moves
    pub fn set_iteration_limit(&mut self, limit: usize) {
        self.iteration_limit = limit;
    }

    /// Builder variant of [`TwoOpt::set_iteration_limit`]
    pub fn iteration_limit(mut self, limit: usize) -> Self {
        self.set_iteration_limit(limit);
        self
    }

    /// A move is only applied if it shortens the route by more than `gain`
    pub fn set_min_gain(&mut self, gain: W) {
        self.min_gain = gain;
    }

    /// Builder variant of [`TwoOpt::set_min_gain`]
    pub fn min_gain(mut self, gain: W) -> Self {
        self.set_min_gain(gain);
        self
    }

    /// Returns the best move `(i, j, gain)` or `None` if no move gains more than `min_gain`
    fn best_move(&self, route: &[Node], matrix: &DistanceMatrix<W>) -> Option<(usize, usize, W)> {
        let n = route.len();
        let mut best: Option<(usize, usize, W)> = None;

        for i in 1..n.saturating_sub(2) {
            for j in (i + 1)..(n - 1) {
                let (a, b, c, d) = (route[i - 1], route[i], route[j], route[j + 1]);
                let (Some(ab), Some(cd), Some(ac), Some(bd)) =
                    (matrix.get(a, b), matrix.get(c, d), matrix.get(a, c), matrix.get(b, d))
                else {
                    continue;
                };

                // the reversed segment is traversed backwards, which matters for one-way distances
                let Some((forward, backward)) = route[i..=j].iter().tuple_windows().try_fold(
                    (W::zero(), W::zero()),
                    |(f, b), (&x, &y)| Some((f + matrix.get(x, y)?, b + matrix.get(y, x)?)),
                ) else {
                    continue;
                };

                let (before, after) = (ab + cd + forward, ac + bd + backward);
                if after >= before {
                    continue;
                }

                let gain = before - after;
                let threshold = best.map_or(self.min_gain, |(_, _, g)| g);
                if gain > threshold {
                    best = Some((i, j, gain));
                }
            }
        }

        best
    }

    /// Improves `route` in place and returns the number of applied moves.
    /// The route length never increases.
    pub fn run(&self, route: &mut [Node], matrix: &DistanceMatrix<W>) -> usize {
        let mut moves = 0;
        while moves < self.iteration_limit {
            let Some((i, j, gain)) = self.best_move(route, matrix) else {
                break;
            };
            route[i..=j].reverse();
            moves += 1;
            debug!(i, j, gain = %gain, "applied 2-opt move");
        }
        moves
    }
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng, seq::SliceRandom};
    use rand_pcg::Pcg64Mcg;

    use super::*;

    fn line_matrix(positions: &[i64]) -> DistanceMatrix<i64> {
        DistanceMatrix::from_rows(
            positions
                .iter()
                .map(|a| positions.iter().map(|b| (a - b).abs()).collect())
                .collect(),
        )
    }

    #[test]
    fn route_length_with_gap() {
        let mut m = line_matrix(&[0, 4, 10]);
        assert_eq!(route_length(&[], &m), Some(0));
        assert_eq!(route_length(&[2], &m), Some(0));
        assert_eq!(route_length(&[0, 2, 1], &m), Some(16));

        m.set(2, 1, None);
        assert_eq!(route_length(&[0, 2, 1], &m), None);
    }

    #[test]
    fn nearest_neighbor_skips_unreachable() {
        let mut m = DistanceMatrix::<u32>::new(4);
        m.set(0, 1, Some(5));
        m.set(0, 2, Some(3));
        m.set(2, 1, Some(1));

        let tour = nearest_neighbor_tour(&m, 0, &[1, 2, 3, 2]);
        assert_eq!(tour.route, vec![0, 2, 2, 1]);
        assert_eq!(tour.skipped, vec![3]);
    }

    #[test]
    fn two_opt_untangles_line() {
        let m = line_matrix(&[0, 1, 2, 3, 4, 5]);
        let mut route = vec![0, 3, 1, 4, 2, 5];
        let before = route_length(&route, &m).unwrap();

        let moves = TwoOpt::new().run(&mut route, &m);
        assert!(moves > 0);
        assert_eq!(route_length(&route, &m), Some(5));
        assert!(before > 5);
        assert_eq!((route[0], route[5]), (0, 5));
    }

    #[test]
    fn two_opt_respects_limit() {
        let m = line_matrix(&[0, 1, 2, 3, 4, 5]);
        let mut route = vec![0, 3, 1, 4, 2, 5];
        assert_eq!(TwoOpt::new().iteration_limit(0).run(&mut route, &m), 0);
        assert_eq!(route, vec![0, 3, 1, 4, 2, 5]);

        let mut short = vec![0, 1, 0];
        assert_eq!(TwoOpt::new().run(&mut short, &m), 0);
    }

    fn one_way_matrix(legs: &[(Node, Node, u32)]) -> DistanceMatrix<u32> {
        let mut m = DistanceMatrix::new(5);
        for &(u, v, d) in legs {
            m.set(u, v, Some(d));
        }
        m
    }

    #[test]
    fn two_opt_one_way_segment() {
        let legs = [(0, 1, 10), (1, 2, 1), (2, 1, 100), (2, 3, 10), (0, 2, 1), (1, 3, 1), (3, 4, 1)];
        let m = one_way_matrix(&legs);
        let mut route = vec![0, 1, 2, 3, 4];
        assert_eq!(route_length(&route, &m), Some(22));

        // reversing 1 2 saves 18 on the outer legs but costs 99 inside
        assert_eq!(TwoOpt::new().run(&mut route, &m), 0);
        assert_eq!(route, vec![0, 1, 2, 3, 4]);

        let mut legs = legs.to_vec();
        legs[2].2 = 1;
        let m = one_way_matrix(&legs);
        assert_eq!(TwoOpt::new().run(&mut route, &m), 1);
        assert_eq!(route, vec![0, 2, 1, 3, 4]);
        assert_eq!(route_length(&route, &m), Some(4));
    }

    #[test]
    fn two_opt_never_worsens_asymmetric() {
        let rng = &mut Pcg64Mcg::seed_from_u64(3);

        for n in [5usize, 8, 12] {
            let m = DistanceMatrix::from_rows(
                (0..n)
                    .map(|u| (0..n).map(|v| if u == v { 0 } else { rng.random_range(1..50u32) }).collect())
                    .collect(),
            );

            for _ in 0..10 {
                let mut route = (1..n as Node).collect_vec();
                route.shuffle(rng);
                route.insert(0, 0);
                route.push(0);

                let before = route_length(&route, &m).unwrap();
                TwoOpt::new().run(&mut route, &m);
                assert!(route_length(&route, &m).unwrap() <= before);
            }
        }
    }

    #[test]
    fn two_opt_never_worsens_random() {
        let rng = &mut Pcg64Mcg::seed_from_u64(3);

        for n in [5usize, 10, 20] {
            let points = (0..n)
                .map(|_| (rng.random_range(0.0..100.0), rng.random_range(0.0..100.0)))
                .collect_vec();
            let m = DistanceMatrix::from_rows(
                points
                    .iter()
                    .map(|&(x1, y1): &(f64, f64)| {
                        points
                            .iter()
                            .map(|&(x2, y2)| ((x1 - x2).powi(2) + (y1 - y2).powi(2)).sqrt())
                            .collect()
                    })
                    .collect(),
            );

            let mut route = (1..n as Node).collect_vec();
            route.shuffle(rng);
            route.insert(0, 0);
            route.push(0);

            let before = route_length(&route, &m).unwrap();
            TwoOpt::new().min_gain(1e-9).iteration_limit(200).run(&mut route, &m);
            let after = route_length(&route, &m).unwrap();

            assert!(after <= before + 1e-9);
            assert_eq!(route.first(), Some(&0));
            assert_eq!(route.last(), Some(&0));
            assert_eq!(route.iter().sorted().dedup().count(), n);
        }
    }
}
