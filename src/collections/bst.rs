use std::{cmp::Ordering, collections::VecDeque, fmt};

type Link<K, V> = Option<Box<BstNode<K, V>>>;

struct BstNode<K, V> {
    key: K,
    value: V,
    left: Link<K, V>,
    right: Link<K, V>,
}

/// Unbalanced binary search tree map.
///
/// Inserting sorted keys degenerates the tree into a list; use [`super::AvlMap`] if the
/// insertion order is not random.
///
/// # Examples
/// ```
/// use casework::collections::BstMap;
///
/// let mut stock = BstMap::new();
/// stock.insert(40, "rice");
/// stock.insert(15, "salt");
/// stock.insert(60, "oil");
/// assert_eq!(stock.insert(15, "sugar"), Some("salt"));
///
/// assert_eq!(stock.get(&15), Some(&"sugar"));
/// assert_eq!(stock.iter().map(|(k, _)| *k).collect::<Vec<_>>(), vec![15, 40, 60]);
/// assert_eq!(stock.height(), 2);
/// ```
pub struct BstMap<K, V> {
    root: Link<K, V>,
    len: usize,
}

impl<K, V> Default for BstMap<K, V> {
    fn default() -> Self {
        Self { root: None, len: 0 }
    }
}

impl<K: Ord, V> BstMap<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Inserts `key`; if it was present already, its value is replaced and the old value returned
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let mut link = &mut self.root;
        while let Some(node) = link {
            link = match key.cmp(&node.key) {
                Ordering::Less => &mut node.left,
                Ordering::Greater => &mut node.right,
                Ordering::Equal => return Some(std::mem::replace(&mut node.value, value)),
            };
        }

        *link = Some(Box::new(BstNode {
            key,
            value,
            left: None,
            right: None,
        }));
        self.len += 1;
        None
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        let mut link = &self.root;
        while let Some(node) = link {
            link = match key.cmp(&node.key) {
                Ordering::Less => &node.left,
                Ordering::Greater => &node.right,
                Ordering::Equal => return Some(&node.value),
            };
        }
        None
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Number of nodes on the longest root-leaf path; `0` for the empty tree
    pub fn height(&self) -> usize {
        let mut level: VecDeque<&BstNode<K, V>> = self.root.as_deref().into_iter().collect();
        let mut height = 0;
        while !level.is_empty() {
            height += 1;
            for _ in 0..level.len() {
                let Some(node) = level.pop_front() else {
                    break;
                };
                level.extend(node.left.as_deref());
                level.extend(node.right.as_deref());
            }
        }
        height
    }

    /// In-order (ascending key) iterator
    pub fn iter(&self) -> BstIter<'_, K, V> {
        let mut iter = BstIter { stack: Vec::new() };
        iter.push_left(&self.root);
        iter
    }
}

/// In-order iterator over a [`BstMap`]
pub struct BstIter<'a, K, V> {
    stack: Vec<&'a BstNode<K, V>>,
}

impl<'a, K, V> BstIter<'a, K, V> {
    fn push_left(&mut self, mut link: &'a Link<K, V>) {
        while let Some(node) = link {
            self.stack.push(node);
            link = &node.left;
        }
    }
}

impl<'a, K, V> Iterator for BstIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left(&node.right);
        Some((&node.key, &node.value))
    }
}

// The derived impls recurse along the links and overflow the stack on degenerate trees.
impl<K, V> Drop for BstMap<K, V> {
    fn drop(&mut self) {
        let mut stack: Vec<Box<BstNode<K, V>>> = self.root.take().into_iter().collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.left.take());
            stack.extend(node.right.take());
        }
    }
}

impl<K: Ord + Clone, V: Clone> Clone for BstMap<K, V> {
    /// Reinserting in pre-order rebuilds the same shape
    fn clone(&self) -> Self {
        let mut map = Self::new();
        let mut stack: Vec<&BstNode<K, V>> = self.root.as_deref().into_iter().collect();
        while let Some(node) = stack.pop() {
            map.insert(node.key.clone(), node.value.clone());
            stack.extend(node.right.as_deref());
            stack.extend(node.left.as_deref());
        }
        map
    }
}

impl<K: Ord + fmt::Debug, V: fmt::Debug> fmt::Debug for BstMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for BstMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use itertools::Itertools;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64Mcg;

    use super::*;

    #[test]
    fn sorted_inserts_degenerate() {
        let map: BstMap<_, _> = (0..10).map(|i| (i, i * i)).collect();
        assert_eq!(map.len(), 10);
        assert_eq!(map.height(), 10);
        assert_eq!(map.get(&7), Some(&49));
        assert!(!map.contains_key(&10));
    }

    #[test]
    fn long_chain() {
        let n = 100_000u32;
        let mut root = None;
        for key in (0..n).rev() {
            root = Some(Box::new(BstNode {
                key,
                value: key,
                left: None,
                right: root,
            }));
        }
        let mut map = BstMap { root, len: n as usize };

        assert_eq!(map.height(), n as usize);
        assert_eq!(map.iter().count(), n as usize);
        assert_eq!(map.get(&(n - 1)), Some(&(n - 1)));
        assert_eq!(map.insert(n, n), None);
        assert_eq!(map.height(), n as usize + 1);
        drop(map);
    }

    #[test]
    fn clone_keeps_shape() {
        let map: BstMap<_, _> = [(40, 'a'), (15, 'b'), (60, 'c'), (10, 'd')].into_iter().collect();
        let copy = map.clone();
        assert_eq!(copy.height(), 3);
        assert_eq!(copy.iter().collect_vec(), map.iter().collect_vec());
        assert_eq!(format!("{copy:?}"), "{10: 'd', 15: 'b', 40: 'a', 60: 'c'}");
    }

    #[test]
    fn random_against_btree() {
        let rng = &mut Pcg64Mcg::seed_from_u64(3);
        let mut map = BstMap::new();
        let mut reference = BTreeMap::new();

        for _ in 0..300 {
            let key = rng.random_range(0..100u32);
            let value = rng.random::<u16>();
            assert_eq!(map.insert(key, value), reference.insert(key, value));
        }

        assert_eq!(map.len(), reference.len());
        assert_eq!(map.iter().collect_vec(), reference.iter().collect_vec());
        for key in 0..100 {
            assert_eq!(map.get(&key), reference.get(&key));
        }
    }
}
