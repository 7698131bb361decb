/*!
# Priority Queues

Binary heaps keyed by a (possibly only partially ordered) priority. Both queues break ties in
insertion order: of two items with equal priority, the one pushed first is popped first.

The heap array is 0-indexed with `parent(i) = (i - 1) / 2` and children `2i + 1`, `2i + 2`.
*/

use std::cmp::{Ordering, Reverse};

use crate::weight::cmp_weights;

#[derive(Clone, Debug)]
struct Entry<P, T> {
    priority: P,
    seq: u64,
    item: T,
}

impl<P: PartialOrd, T> Entry<P, T> {
    /// Heap order: higher priority first, then earlier insertion
    fn order(&self, other: &Self) -> Ordering {
        cmp_weights(&other.priority, &self.priority).then(self.seq.cmp(&other.seq))
    }
}

/// Max-priority queue with FIFO tie-breaking.
///
/// # Examples
/// ```
/// use casework::collections::PriorityQueue;
///
/// let mut triage = PriorityQueue::new();
/// triage.push(3, "fracture");
/// triage.push(9, "cardiac arrest");
/// triage.push(3, "burn");
///
/// assert_eq!(triage.pop(), Some((9, "cardiac arrest")));
/// assert_eq!(triage.pop(), Some((3, "fracture")));
/// assert_eq!(triage.pop(), Some((3, "burn")));
/// assert_eq!(triage.pop(), None);
/// ```
#[derive(Clone, Debug)]
pub struct PriorityQueue<P, T> {
    data: Vec<Entry<P, T>>,
    next_seq: u64,
}

impl<P, T> Default for PriorityQueue<P, T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            next_seq: 0,
        }
    }
}

impl<P: PartialOrd, T> PriorityQueue<P, T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn push(&mut self, priority: P, item: T) {
        self.data.push(Entry {
            priority,
            seq: self.next_seq,
            item,
        });
        self.next_seq += 1;
        self.sift_up(self.data.len() - 1);
    }

    /// Removes the item with the highest priority
    pub fn pop(&mut self) -> Option<(P, T)> {
        if self.data.is_empty() {
            return None;
        }
        let last = self.data.len() - 1;
        self.data.swap(0, last);
        let top = self.data.pop()?;
        if !self.data.is_empty() {
            self.sift_down(0);
        }
        Some((top.priority, top.item))
    }

    /// Item that [`PriorityQueue::pop`] would return next
    pub fn peek(&self) -> Option<(&P, &T)> {
        self.data.first().map(|e| (&e.priority, &e.item))
    }

    /// The `k` highest-priority items in pop order, without removing them
    pub fn peek_top(&self, k: usize) -> Vec<(&P, &T)> {
        let mut entries: Vec<&Entry<P, T>> = self.data.iter().collect();
        entries.sort_by(|a, b| a.order(b));
        entries
            .into_iter()
            .take(k)
            .map(|e| (&e.priority, &e.item))
            .collect()
    }

    /// Empties the queue and returns all items in pop order
    pub fn drain_sorted(&mut self) -> Vec<(P, T)> {
        let mut items = Vec::with_capacity(self.len());
        while let Some(x) = self.pop() {
            items.push(x);
        }
        items
    }

    /// Iterates over all items in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&P, &T)> + '_ {
        self.data.iter().map(|e| (&e.priority, &e.item))
    }

    /// Keeps only the items for which `keep` holds; the relative order of the rest is unchanged
    pub fn retain<F: FnMut(&P, &T) -> bool>(&mut self, mut keep: F) {
        self.data.retain(|e| keep(&e.priority, &e.item));
        for i in (0..self.data.len() / 2).rev() {
            self.sift_down(i);
        }
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let p = (i - 1) / 2;
            if self.data[p].order(&self.data[i]) != Ordering::Greater {
                break;
            }
            self.data.swap(p, i);
            i = p;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let n = self.data.len();
        loop {
            let mut first = i;
            for c in [2 * i + 1, 2 * i + 2] {
                if c < n && self.data[c].order(&self.data[first]) == Ordering::Less {
                    first = c;
                }
            }
            if first == i {
                break;
            }
            self.data.swap(i, first);
            i = first;
        }
    }
}

impl<P: PartialOrd, T> FromIterator<(P, T)> for PriorityQueue<P, T> {
    fn from_iter<I: IntoIterator<Item = (P, T)>>(iter: I) -> Self {
        let mut queue = Self::new();
        for (p, t) in iter {
            queue.push(p, t);
        }
        queue
    }
}

/// Min-priority queue with FIFO tie-breaking; a [`PriorityQueue`] over [`Reverse`] priorities.
///
/// # Examples
/// ```
/// use casework::collections::MinPriorityQueue;
///
/// let mut cheapest = MinPriorityQueue::new();
/// cheapest.push(4.5, "tea");
/// cheapest.push(1.25, "bread");
/// assert_eq!(cheapest.peek(), Some((&1.25, &"bread")));
/// assert_eq!(cheapest.pop(), Some((1.25, "bread")));
/// ```
#[derive(Clone, Debug)]
pub struct MinPriorityQueue<P, T>(PriorityQueue<Reverse<P>, T>);

impl<P, T> Default for MinPriorityQueue<P, T> {
    fn default() -> Self {
        Self(PriorityQueue::default())
    }
}

impl<P: PartialOrd, T> MinPriorityQueue<P, T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, priority: P, item: T) {
        self.0.push(Reverse(priority), item);
    }

    /// Removes the item with the lowest priority
    pub fn pop(&mut self) -> Option<(P, T)> {
        self.0.pop().map(|(Reverse(p), t)| (p, t))
    }

    pub fn peek(&self) -> Option<(&P, &T)> {
        self.0.peek().map(|(Reverse(p), t)| (p, t))
    }

    /// The `k` lowest-priority items in pop order, without removing them
    pub fn peek_top(&self, k: usize) -> Vec<(&P, &T)> {
        self.0
            .peek_top(k)
            .into_iter()
            .map(|(Reverse(p), t)| (p, t))
            .collect()
    }

    /// Empties the queue and returns all items in pop order
    pub fn drain_sorted(&mut self) -> Vec<(P, T)> {
        self.0
            .drain_sorted()
            .into_iter()
            .map(|(Reverse(p), t)| (p, t))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&P, &T)> + '_ {
        self.0.iter().map(|(Reverse(p), t)| (p, t))
    }

    pub fn retain<F: FnMut(&P, &T) -> bool>(&mut self, mut keep: F) {
        self.0.retain(|Reverse(p), t| keep(p, t));
    }
}

impl<P: PartialOrd, T> FromIterator<(P, T)> for MinPriorityQueue<P, T> {
    fn from_iter<I: IntoIterator<Item = (P, T)>>(iter: I) -> Self {
        let mut queue = Self::new();
        for (p, t) in iter {
            queue.push(p, t);
        }
        queue
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64Mcg;

    use super::*;

    #[test]
    fn fifo_among_equals() {
        let mut queue: PriorityQueue<u8, usize> = (0..20).map(|i| ((i % 3) as u8, i)).collect();
        assert_eq!(queue.len(), 20);

        let top = queue.peek_top(3).into_iter().map(|(_, &i)| i).collect_vec();
        assert_eq!(top, vec![2, 5, 8]);

        let drained = queue.drain_sorted();
        assert!(queue.is_empty());
        for ((p1, i1), (p2, i2)) in drained.iter().tuple_windows() {
            assert!(p1 > p2 || (p1 == p2 && i1 < i2));
        }
    }

    #[test]
    fn retain_keeps_heap_order() {
        let mut queue: MinPriorityQueue<u32, u32> = (0..30).map(|i| ((i * 7) % 11, i)).collect();
        queue.retain(|_, &i| i % 2 == 0);
        assert_eq!(queue.len(), 15);

        let drained = queue.drain_sorted();
        assert!(drained.iter().all(|(_, i)| i % 2 == 0));
        assert!(drained.iter().tuple_windows().all(|(a, b)| a.0 <= b.0));
    }

    #[test]
    fn float_priorities() {
        let mut queue = MinPriorityQueue::new();
        queue.push(2.5, 'c');
        queue.push(-1.0, 'a');
        queue.push(2.5, 'd');
        queue.push(0.0, 'b');
        assert_eq!(queue.peek_top(2), vec![(&-1.0, &'a'), (&0.0, &'b')]);
        assert_eq!(queue.drain_sorted().into_iter().map(|(_, c)| c).collect_vec(), vec!['a', 'b', 'c', 'd']);
    }

    #[test]
    fn random_against_sorted() {
        let rng = &mut Pcg64Mcg::seed_from_u64(3);

        for _ in 0..20 {
            let mut queue = PriorityQueue::new();
            let mut reference = Vec::new();
            for i in 0..rng.random_range(0..100) {
                let p = rng.random_range(0..10u32);
                queue.push(p, i);
                reference.push((p, i));

                if rng.random_bool(0.2) {
                    reference.sort_by_key(|&(p, i)| (Reverse(p), i));
                    let expected = (!reference.is_empty()).then(|| reference.remove(0));
                    assert_eq!(queue.pop(), expected);
                }
            }

            reference.sort_by_key(|&(p, i)| (Reverse(p), i));
            assert_eq!(queue.drain_sorted(), reference);
        }
    }
}
