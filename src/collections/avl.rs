use std::cmp::Ordering;

type Link<K, V> = Option<Box<AvlNode<K, V>>>;

#[derive(Clone, Debug)]
struct AvlNode<K, V> {
    key: K,
    value: V,
    height: usize,
    left: Link<K, V>,
    right: Link<K, V>,
}

fn height<K, V>(link: &Link<K, V>) -> usize {
    link.as_ref().map_or(0, |n| n.height)
}

impl<K, V> AvlNode<K, V> {
    fn leaf(key: K, value: V) -> Box<Self> {
        Box::new(Self {
            key,
            value,
            height: 1,
            left: None,
            right: None,
        })
    }

    fn update_height(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }

    /// Height of the left subtree minus height of the right subtree
    fn balance(&self) -> isize {
        height(&self.left) as isize - height(&self.right) as isize
    }
}

fn rotate_right<K, V>(mut y: Box<AvlNode<K, V>>) -> Box<AvlNode<K, V>> {
    let Some(mut x) = y.left.take() else {
        return y;
    };
    y.left = x.right.take();
    y.update_height();
    x.right = Some(y);
    x.update_height();
    x
}

fn rotate_left<K, V>(mut x: Box<AvlNode<K, V>>) -> Box<AvlNode<K, V>> {
    let Some(mut y) = x.right.take() else {
        return x;
    };
    x.right = y.left.take();
    x.update_height();
    y.left = Some(x);
    y.update_height();
    y
}

fn rebalance<K, V>(mut node: Box<AvlNode<K, V>>) -> Box<AvlNode<K, V>> {
    node.update_height();
    let balance = node.balance();

    if balance > 1 {
        // LR: rotate the left child first
        if node.left.as_ref().is_some_and(|l| l.balance() < 0) {
            node.left = node.left.take().map(rotate_left);
        }
        return rotate_right(node);
    }

    if balance < -1 {
        // RL
        if node.right.as_ref().is_some_and(|r| r.balance() > 0) {
            node.right = node.right.take().map(rotate_right);
        }
        return rotate_left(node);
    }

    node
}

/// Self-balancing binary search tree map (AVL tree).
///
/// The heights of the two subtrees of every node differ by at most one, so the tree height stays
/// logarithmic in the number of entries.
///
/// # Examples
/// ```
/// use casework::collections::AvlMap;
///
/// let mut readings = AvlMap::new();
/// for (i, level) in [42, 17, 88, 63, 5].into_iter().enumerate() {
///     readings.insert(level, i);
/// }
/// assert_eq!(readings.first(), Some((&5, &4)));
/// assert_eq!(readings.last(), Some((&88, &2)));
/// assert_eq!(readings.height(), 3);
/// ```
#[derive(Clone, Debug)]
pub struct AvlMap<K, V> {
    root: Link<K, V>,
    len: usize,
}

impl<K, V> Default for AvlMap<K, V> {
    fn default() -> Self {
        Self { root: None, len: 0 }
    }
}

impl<K: Ord, V> AvlMap<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Height of the tree; `0` for the empty tree
    pub fn height(&self) -> usize {
        height(&self.root)
    }

    /// Inserts `key`; if it was present already, its value is replaced and the old value returned
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        fn rec<K: Ord, V>(link: Link<K, V>, key: K, value: V, old: &mut Option<V>) -> Box<AvlNode<K, V>> {
            let Some(mut node) = link else {
                return AvlNode::leaf(key, value);
            };

            match key.cmp(&node.key) {
                Ordering::Less => node.left = Some(rec(node.left.take(), key, value, old)),
                Ordering::Greater => node.right = Some(rec(node.right.take(), key, value, old)),
                Ordering::Equal => {
                    *old = Some(std::mem::replace(&mut node.value, value));
                    return node;
                }
            }

            rebalance(node)
        }

        let mut old = None;
        self.root = Some(rec(self.root.take(), key, value, &mut old));
        if old.is_none() {
            self.len += 1;
        }
        old
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

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let mut link = &mut self.root;
        while let Some(node) = link {
            link = match key.cmp(&node.key) {
                Ordering::Less => &mut node.left,
                Ordering::Greater => &mut node.right,
                Ordering::Equal => return Some(&mut node.value),
            };
        }
        None
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Entry with the smallest key
    pub fn first(&self) -> Option<(&K, &V)> {
        let mut node = self.root.as_ref()?;
        while let Some(left) = &node.left {
            node = left;
        }
        Some((&node.key, &node.value))
    }

    /// Entry with the largest key
    pub fn last(&self) -> Option<(&K, &V)> {
        let mut node = self.root.as_ref()?;
        while let Some(right) = &node.right {
            node = right;
        }
        Some((&node.key, &node.value))
    }

    /// In-order (ascending key) iterator
    pub fn iter(&self) -> AvlIter<'_, K, V> {
        let mut iter = AvlIter { stack: Vec::new() };
        iter.push_left(&self.root);
        iter
    }
}

/// In-order iterator over an [`AvlMap`]
pub struct AvlIter<'a, K, V> {
    stack: Vec<&'a AvlNode<K, V>>,
}

impl<'a, K, V> AvlIter<'a, K, V> {
    fn push_left(&mut self, mut link: &'a Link<K, V>) {
        while let Some(node) = link {
            self.stack.push(node);
            link = &node.left;
        }
    }
}

impl<'a, K, V> Iterator for AvlIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left(&node.right);
        Some((&node.key, &node.value))
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for AvlMap<K, V> {
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

    fn assert_balanced<K, V>(link: &Link<K, V>) -> usize {
        let Some(node) = link else {
            return 0;
        };
        let (l, r) = (assert_balanced(&node.left), assert_balanced(&node.right));
        assert!(l.abs_diff(r) <= 1);
        assert_eq!(node.height, 1 + l.max(r));
        node.height
    }

    #[test]
    fn sorted_inserts_stay_balanced() {
        let map: AvlMap<_, _> = (0..1023).map(|i| (i, ())).collect();
        assert_eq!(map.len(), 1023);
        assert_eq!(map.height(), 10);
        assert_balanced(&map.root);

        let map: AvlMap<_, _> = (0..100).rev().map(|i| (i, ())).collect();
        assert!(map.height() <= 8);
        assert_balanced(&map.root);
    }

    #[test]
    fn zigzag_rotations() {
        // LR case
        let map: AvlMap<_, _> = [(30, 'a'), (10, 'b'), (20, 'c')].into_iter().collect();
        assert_eq!(map.root.as_ref().map(|n| n.key), Some(20));

        // RL case
        let map: AvlMap<_, _> = [(10, 'a'), (30, 'b'), (20, 'c')].into_iter().collect();
        assert_eq!(map.root.as_ref().map(|n| n.key), Some(20));
        assert_eq!(map.height(), 2);
    }

    #[test]
    fn random_against_btree() {
        let rng = &mut Pcg64Mcg::seed_from_u64(3);
        let mut map = AvlMap::new();
        let mut reference = BTreeMap::new();

        for _ in 0..500 {
            let key = rng.random_range(0..200i32);
            let value = rng.random_range(0..1000u32);
            assert_eq!(map.insert(key, value), reference.insert(key, value));

            if let Some(v) = map.get_mut(&(key / 2)) {
                *v += 1;
                *reference.get_mut(&(key / 2)).unwrap() += 1;
            }
        }

        assert_balanced(&map.root);
        assert_eq!(map.len(), reference.len());
        assert_eq!(map.iter().collect_vec(), reference.iter().collect_vec());
        assert_eq!(map.first(), reference.first_key_value());
        assert_eq!(map.last(), reference.last_key_value());
    }
}
