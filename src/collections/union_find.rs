/// Disjoint-set forest over the elements `0..n` with path compression and union by rank.
///
/// # Examples
/// ```
/// use casework::collections::UnionFind;
///
/// let mut sets = UnionFind::new(4);
/// assert!(sets.union(0, 1));
/// assert!(!sets.union(1, 0));
/// assert!(sets.same_set(0, 1));
/// assert_eq!(sets.number_of_sets(), 3);
/// assert_eq!(sets.set_size(1), 2);
/// ```
#[derive(Clone, Debug)]
pub struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
    size: Vec<usize>,
    num_sets: usize,
}

impl UnionFind {
    /// Creates `n` singleton sets
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
            size: vec![1; n],
            num_sets: n,
        }
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Returns the representative of the set containing `x`.
    /// ** Panics if `x >= n` **
    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        let mut cur = x;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }

        root
    }

    /// Merges the sets of `a` and `b`.
    /// Returns *true* if they were in different sets before.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let (mut ra, mut rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }

        if self.rank[ra] < self.rank[rb] {
            std::mem::swap(&mut ra, &mut rb);
        }
        if self.rank[ra] == self.rank[rb] {
            self.rank[ra] += 1;
        }

        self.parent[rb] = ra;
        self.size[ra] += self.size[rb];
        self.num_sets -= 1;
        true
    }

    /// Returns *true* if `a` and `b` belong to the same set
    pub fn same_set(&mut self, a: usize, b: usize) -> bool {
        self.find(a) == self.find(b)
    }

    /// Number of disjoint sets
    pub fn number_of_sets(&self) -> usize {
        self.num_sets
    }

    /// Number of elements in the set containing `x`
    pub fn set_size(&mut self, x: usize) -> usize {
        let root = self.find(x);
        self.size[root]
    }
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64Mcg;

    use super::*;

    #[test]
    fn chain_merges() {
        let mut sets = UnionFind::new(6);
        assert_eq!(sets.number_of_sets(), 6);

        for i in 0..4 {
            assert!(sets.union(i, i + 1));
        }
        assert_eq!(sets.number_of_sets(), 2);
        assert_eq!(sets.set_size(2), 5);
        assert_eq!(sets.set_size(5), 1);
        assert!(sets.same_set(0, 4));
        assert!(!sets.same_set(0, 5));
        assert!(!sets.union(4, 0));
    }

    #[test]
    fn random_against_labels() {
        let rng = &mut Pcg64Mcg::seed_from_u64(3);
        let n = 50;

        let mut sets = UnionFind::new(n);
        let mut label: Vec<usize> = (0..n).collect();

        for _ in 0..200 {
            let (a, b) = (rng.random_range(0..n), rng.random_range(0..n));
            let merged = sets.union(a, b);
            assert_eq!(merged, label[a] != label[b]);

            let (from, to) = (label[b], label[a]);
            for l in label.iter_mut() {
                if *l == from {
                    *l = to;
                }
            }

            let (x, y) = (rng.random_range(0..n), rng.random_range(0..n));
            assert_eq!(sets.same_set(x, y), label[x] == label[y]);
            assert_eq!(sets.set_size(x), label.iter().filter(|&&l| l == label[x]).count());
        }
    }
}
