use std::ops::{Add, Bound, RangeBounds};

use num::Zero;

/// Range-sum segment tree with point assignment.
///
/// Stored bottom-up in a single array of size `2n`: leaves occupy `n..2n`, node `i` holds the sum
/// of its children `2i` and `2i + 1`.
///
/// # Examples
/// ```
/// use casework::collections::SegmentTree;
///
/// let mut usage = SegmentTree::from_slice(&[120, 80, 200, 150]);
/// assert_eq!(usage.query(1..=2), 280);
/// usage.update(2, 50);
/// assert_eq!(usage.query(..), 400);
/// assert_eq!(usage.query(3..10), 150);
/// ```
#[derive(Clone, Debug)]
pub struct SegmentTree<T> {
    n: usize,
    tree: Vec<T>,
}

impl<T> SegmentTree<T>
where
    T: Zero + Add<Output = T> + Copy,
{
    pub fn from_slice(values: &[T]) -> Self {
        let n = values.len();
        let mut tree = vec![T::zero(); 2 * n];
        tree[n..].copy_from_slice(values);
        for i in (1..n).rev() {
            tree[i] = tree[2 * i] + tree[2 * i + 1];
        }
        Self { n, tree }
    }

    /// Number of leaves
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Value stored at `pos`, `None` if out of range
    pub fn get(&self, pos: usize) -> Option<T> {
        (pos < self.n).then(|| self.tree[self.n + pos])
    }

    /// Replaces the value at `pos`.
    /// ** Panics if `pos >= len` **
    pub fn update(&mut self, pos: usize, value: T) {
        assert!(pos < self.n, "position {pos} out of range (len {})", self.n);

        let mut i = self.n + pos;
        self.tree[i] = value;
        while i > 1 {
            i /= 2;
            self.tree[i] = self.tree[2 * i] + self.tree[2 * i + 1];
        }
    }

    /// Sum over `range`. Parts of the range outside of `0..len` are ignored, empty ranges sum to zero.
    pub fn query<R: RangeBounds<usize>>(&self, range: R) -> T {
        let start = match range.start_bound() {
            Bound::Included(&s) => s,
            Bound::Excluded(&s) => s.saturating_add(1),
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&e) => e.saturating_add(1),
            Bound::Excluded(&e) => e,
            Bound::Unbounded => self.n,
        }
        .min(self.n);

        let mut sum = T::zero();
        if start >= end {
            return sum;
        }

        let (mut l, mut r) = (start + self.n, end + self.n);
        while l < r {
            if l & 1 == 1 {
                sum = sum + self.tree[l];
                l += 1;
            }
            if r & 1 == 1 {
                r -= 1;
                sum = sum + self.tree[r];
            }
            l /= 2;
            r /= 2;
        }
        sum
    }

    /// Sum over all values
    pub fn total(&self) -> T {
        self.query(..)
    }
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64Mcg;

    use super::*;

    #[test]
    fn empty_and_clamped() {
        let tree = SegmentTree::<u32>::from_slice(&[]);
        assert!(tree.is_empty());
        assert_eq!(tree.total(), 0);

        let tree = SegmentTree::from_slice(&[1, 2, 3]);
        assert_eq!(tree.query(2..1), 0);
        assert_eq!(tree.query(5..), 0);
        assert_eq!(tree.query(1..100), 5);
        assert_eq!(tree.get(3), None);
    }

    #[test]
    fn random_against_naive() {
        let rng = &mut Pcg64Mcg::seed_from_u64(3);

        for n in [1usize, 2, 7, 16, 33] {
            let mut values: Vec<i64> = (0..n).map(|_| rng.random_range(-50..50)).collect();
            let mut tree = SegmentTree::from_slice(&values);

            for _ in 0..100 {
                let pos = rng.random_range(0..n);
                let value = rng.random_range(-50..50);
                values[pos] = value;
                tree.update(pos, value);

                let l = rng.random_range(0..=n);
                let r = rng.random_range(l..=n);
                assert_eq!(tree.query(l..r), values[l..r].iter().sum::<i64>());
            }
            assert_eq!(tree.total(), values.iter().sum::<i64>());
        }
    }
}
