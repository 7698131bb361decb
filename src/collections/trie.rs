use fxhash::FxHashMap;

#[derive(Clone, Debug, Default)]
struct TrieNode {
    children: FxHashMap<char, usize>,
    terminal: bool,
}

/// Prefix tree over words.
///
/// Nodes are stored in an arena and addressed by index; node `0` is the root (empty prefix).
///
/// # Examples
/// ```
/// use casework::collections::Trie;
///
/// let routes: Trie = ["ring", "river", "rivergate", "airport"].into_iter().collect();
/// assert!(routes.contains("river"));
/// assert!(!routes.contains("riv"));
/// assert!(routes.starts_with("riv"));
/// assert_eq!(routes.autocomplete("riv"), vec!["river", "rivergate"]);
/// ```
#[derive(Clone, Debug)]
pub struct Trie {
    nodes: Vec<TrieNode>,
    num_words: usize,
}

impl Default for Trie {
    fn default() -> Self {
        Self {
            nodes: vec![TrieNode::default()],
            num_words: 0,
        }
    }
}

impl Trie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct stored words
    pub fn len(&self) -> usize {
        self.num_words
    }

    pub fn is_empty(&self) -> bool {
        self.num_words == 0
    }

    /// Inserts `word`; returns *true* if it was not stored before
    pub fn insert(&mut self, word: &str) -> bool {
        let mut cur = 0;
        for c in word.chars() {
            cur = match self.nodes[cur].children.get(&c) {
                Some(&next) => next,
                None => {
                    let next = self.nodes.len();
                    self.nodes.push(TrieNode::default());
                    self.nodes[cur].children.insert(c, next);
                    next
                }
            };
        }

        let is_new = !self.nodes[cur].terminal;
        self.nodes[cur].terminal = true;
        self.num_words += is_new as usize;
        is_new
    }

    /// Node reached by following `prefix` from the root
    fn walk(&self, prefix: &str) -> Option<usize> {
        prefix
            .chars()
            .try_fold(0, |cur, c| self.nodes[cur].children.get(&c).copied())
    }

    /// Returns *true* if exactly `word` was inserted
    pub fn contains(&self, word: &str) -> bool {
        self.walk(word).is_some_and(|u| self.nodes[u].terminal)
    }

    /// Returns *true* if some stored word starts with `prefix`; the empty prefix always matches
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.walk(prefix).is_some()
    }

    /// All stored words starting with `prefix`, in lexicographic order
    pub fn autocomplete(&self, prefix: &str) -> Vec<String> {
        let Some(start) = self.walk(prefix) else {
            return Vec::new();
        };

        let mut words = Vec::new();
        let mut stack = vec![(start, prefix.to_string())];
        while let Some((u, word)) = stack.pop() {
            for (&c, &v) in &self.nodes[u].children {
                let mut next = word.clone();
                next.push(c);
                stack.push((v, next));
            }
            if self.nodes[u].terminal {
                words.push(word);
            }
        }

        words.sort_unstable();
        words
    }
}

impl<'a> FromIterator<&'a str> for Trie {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut trie = Self::new();
        for word in iter {
            trie.insert(word);
        }
        trie
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;

    #[test]
    fn empty_word_and_duplicates() {
        let mut trie = Trie::new();
        assert!(!trie.contains(""));
        assert!(trie.starts_with(""));
        assert!(trie.autocomplete("").is_empty());

        assert!(trie.insert("bus"));
        assert!(!trie.insert("bus"));
        assert!(trie.insert(""));
        assert_eq!(trie.len(), 2);
        assert_eq!(trie.autocomplete(""), vec!["", "bus"]);
    }

    #[test]
    fn autocomplete_sorted() {
        let words = ["metro", "met", "meter", "market", "m", "mét"];
        let trie: Trie = words.into_iter().collect();

        assert_eq!(trie.autocomplete("me"), vec!["met", "meter", "metro"]);
        assert_eq!(trie.autocomplete("m"), words.iter().sorted().map(|w| w.to_string()).collect_vec());
        assert!(trie.autocomplete("x").is_empty());
        assert!(trie.contains("mét"));
        assert!(!trie.starts_with("metros"));
    }
}
