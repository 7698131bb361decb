/*!
# Edge Weights

Weighted algorithms are generic over a [`Weight`], which is blanket-implemented for every primitive
integer and float type. Distances are always reported as `Option<W>` where `None` means *unreachable*;
there is no `INF` sentinel that could overflow when added to.

Floats are only partially ordered. [`MinScored`] and [`cmp_weights`] treat incomparable values
(`NaN`) as equal to each other and larger than every number, so a stray `NaN` sinks to the bottom of a
min-heap instead of corrupting it.
*/

use std::{
    cmp::Ordering,
    fmt::{Debug, Display},
    ops::Sub,
};

use num::Zero;

/// Numeric edge weight
pub trait Weight: Copy + PartialOrd + Zero + Sub<Output = Self> + Debug + Display {}

impl<W> Weight for W where W: Copy + PartialOrd + Zero + Sub<Output = Self> + Debug + Display {}

/// Total order over partially ordered weights (`NaN` is largest)
pub fn cmp_weights<W: PartialOrd>(a: &W, b: &W) -> Ordering {
    match a.partial_cmp(b) {
        Some(ord) => ord,
        None => {
            #[allow(clippy::eq_op)]
            let a_nan = a != a;
            #[allow(clippy::eq_op)]
            let b_nan = b != b;
            match (a_nan, b_nan) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                _ => Ordering::Less,
            }
        }
    }
}

/// Returns the smaller of two weights (the first one on ties)
pub fn min_weight<W: PartialOrd>(a: W, b: W) -> W {
    if cmp_weights(&b, &a) == Ordering::Less { b } else { a }
}

/// Entry of a min-heap keyed by a weight.
///
/// [`std::collections::BinaryHeap`] is a max-heap; `MinScored` reverses the order so that the entry
/// with the *smallest* score is popped first. Equal scores are broken by the smaller payload, which
/// makes every algorithm using it deterministic.
#[derive(Copy, Clone, Debug)]
pub struct MinScored<W, T>(pub W, pub T);

impl<W: PartialOrd, T: Ord> PartialEq for MinScored<W, T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<W: PartialOrd, T: Ord> Eq for MinScored<W, T> {}

impl<W: PartialOrd, T: Ord> PartialOrd for MinScored<W, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<W: PartialOrd, T: Ord> Ord for MinScored<W, T> {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_weights(&other.0, &self.0).then_with(|| other.1.cmp(&self.1))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BinaryHeap;

    use itertools::Itertools;

    use super::*;

    #[test]
    fn min_heap_order() {
        let mut heap: BinaryHeap<_> = [(3.0, 1), (1.0, 4), (2.0, 0), (1.0, 2), (f64::NAN, 9)]
            .into_iter()
            .map(|(w, n)| MinScored(w, n))
            .collect();

        let order = std::iter::from_fn(|| heap.pop()).map(|s| s.1).collect_vec();
        assert_eq!(order, vec![2, 4, 0, 1, 9]);
    }

    #[test]
    fn weight_cmp() {
        assert_eq!(cmp_weights(&1, &2), Ordering::Less);
        assert_eq!(cmp_weights(&f64::NAN, &2.0), Ordering::Greater);
        assert_eq!(cmp_weights(&f64::NAN, &f64::NAN), Ordering::Equal);
        assert_eq!(min_weight(3u32, 2), 2);
        assert_eq!(min_weight(2.0, f64::NAN), 2.0);
    }
}
