use std::ops::RangeInclusive;

use rand::distr::uniform::SampleUniform;
use rand_distr::{Distribution, Geometric};

use super::*;

/// A G(n, p) graph can be defined by either a probability or the average degree which is more
/// common in practice
#[derive(Debug, Copy, Clone, Default)]
enum GnpType {
    /// No value has been set yet
    #[default]
    NotSet,
    /// Direct probability value
    Prob(f64),
    /// Average degree of a node
    AvgDeg(f64),
}

fn is_valid_probability(p: f64) -> bool {
    (0.0..=1.0).contains(&p)
}

/// Weighted `G(n,p)` generator: every ordered pair `(u, v)` becomes an edge with probability `p`
/// independent from each other, and each edge draws its weight uniformly from a range.
///
/// Undirected graphs keep only normalized pairs (`u <= v`), so every unordered pair is also present
/// with probability `p`. Self-loops are skipped unless enabled with [`Gnp::loops`].
///
/// # Examples
/// ```
/// use casework::{prelude::*, gens::*};
/// use rand::SeedableRng;
///
/// let rng = &mut rand::rngs::StdRng::seed_from_u64(1);
/// let edges = Gnp::new().nodes(10).prob(0.3).weights(1..=9u32).generate(rng);
/// assert!(edges.iter().all(|e| e.0 != e.1 && (1..=9).contains(&e.2)));
/// ```
#[derive(Debug, Clone)]
pub struct Gnp<W> {
    n: NumNodes,
    p: GnpType,
    weights: Option<RangeInclusive<W>>,
    loops: bool,
}

impl<W> Default for Gnp<W> {
    fn default() -> Self {
        Self {
            n: 0,
            p: GnpType::NotSet,
            weights: None,
            loops: false,
        }
    }
}

impl<W> Gnp<W> {
    /// Creates a new empty `G(n,p)` generator
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates `p` directly
    pub fn prob(mut self, prob: f64) -> Self {
        assert!(is_valid_probability(prob), "{prob} is not a probability");
        self.p = GnpType::Prob(prob);
        self
    }

    /// Weights are drawn uniformly from `range`
    pub fn weights(mut self, range: RangeInclusive<W>) -> Self {
        self.weights = Some(range);
        self
    }

    /// Also generate self-loops
    pub fn loops(mut self, loops: bool) -> Self {
        self.loops = loops;
        self
    }

    fn probability(&self) -> f64 {
        match self.p {
            GnpType::NotSet => panic!("Probability of Gnp was not set!"),
            GnpType::Prob(p) => p,
            GnpType::AvgDeg(d) => {
                let p = d / self.n as f64;
                assert!(
                    is_valid_probability(p),
                    "The average degree is invalid for the given n!"
                );
                p
            }
        }
    }
}

impl<W> NumNodesGen for Gnp<W> {
    fn nodes(mut self, n: NumNodes) -> Self {
        self.n = n;
        self
    }
}

impl<W> AverageDegreeGen for Gnp<W> {
    /// Updates `p` such that `p = d/n`.
    /// Note that this conversion will only be done when calling `stream/generate`.
    fn avg_deg(mut self, deg: f64) -> Self {
        self.p = GnpType::AvgDeg(deg);
        self
    }
}

impl<W: SampleUniform + PartialOrd + Clone> GraphGenerator for Gnp<W> {
    type Weight = W;

    /// Jumps over the `n * n` candidate pairs with geometrically distributed gaps, so the running
    /// time is proportional to the number of generated edges
    fn stream<R: Rng>(&self, rng: &mut R) -> impl Iterator<Item = WeightedEdge<W>> {
        assert!(self.n > 0, "At least one node must be generated!");
        let Some(weights) = self.weights.clone() else {
            panic!("Weight range of Gnp was not set!");
        };

        let p = self.probability();
        let n = self.n as u64;
        let max_value = if p > 0.0 { n * n } else { 0 };
        // p = 0 never reaches the sampling below
        let gaps = Geometric::new(if p > 0.0 { p } else { 1.0 }).ok();
        let loops = self.loops;

        let mut pos: Option<u64> = None;
        std::iter::from_fn(move || {
            loop {
                let skip = gaps.as_ref()?.sample(rng);
                let next = pos.map_or(Some(skip), |x| x.checked_add(skip)?.checked_add(1))?;
                if next >= max_value {
                    return None;
                }
                pos = Some(next);

                let (u, v) = ((next / n) as Node, (next % n) as Node);
                if u != v || loops {
                    return Some(WeightedEdge(u, v, rng.random_range(weights.clone())));
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    use super::*;

    #[test]
    fn extreme_probabilities() {
        let rng = &mut Pcg64Mcg::seed_from_u64(3);

        assert!(Gnp::new().nodes(20).prob(0.0).weights(1..=1u32).generate(rng).is_empty());

        let complete = Gnp::new().nodes(6).prob(1.0).weights(2..=2u32).generate(rng);
        assert_eq!(complete.len(), 30);
        assert!(complete.iter().map(|e| e.edge()).all_unique());

        let with_loops = Gnp::new().nodes(6).prob(1.0).weights(2..=2u32).loops(true).generate(rng);
        assert_eq!(with_loops.len(), 36);
    }

    #[test]
    fn average_degree() {
        let rng = &mut Pcg64Mcg::seed_from_u64(3);
        let n = 400;
        let edges = Gnp::new().nodes(n).avg_deg(10.0).weights(0.5..=1.5).generate(rng);

        let avg = edges.len() as f64 / n as f64;
        assert!((8.0..12.0).contains(&avg), "avg out-degree {avg}");
        assert!(edges.iter().tuple_windows().all(|(a, b)| a.edge() < b.edge()));
        assert!(edges.iter().all(|e| (0.5..=1.5).contains(&e.2)));
    }
}
