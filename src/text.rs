/*!
# Text Search

Knuth-Morris-Pratt substring search over bytes and a [`SignatureScanner`] that looks for many named
patterns in the same text (malware signatures, emergency keywords, ...).

Positions are byte offsets into the searched text.
*/

/// KMP failure table: `pi[i]` is the length of the longest proper prefix of `pattern[..=i]` that is
/// also a suffix of it.
///
/// # Examples
/// ```
/// use casework::text::prefix_function;
///
/// assert_eq!(prefix_function(b"abacaba"), vec![0, 0, 1, 0, 1, 2, 3]);
/// assert!(prefix_function::<u8>(&[]).is_empty());
/// ```
pub fn prefix_function<T: PartialEq>(pattern: &[T]) -> Vec<usize> {
    let mut pi = vec![0; pattern.len()];
    let mut len = 0;
    for i in 1..pattern.len() {
        while len > 0 && pattern[i] != pattern[len] {
            len = pi[len - 1];
        }
        if pattern[i] == pattern[len] {
            len += 1;
        }
        pi[i] = len;
    }
    pi
}

/// Precompiled KMP matcher for a single pattern.
///
/// # Examples
/// ```
/// use casework::text::Kmp;
///
/// let kmp = Kmp::new("ana");
/// assert_eq!(kmp.find("bananas"), Some(1));
/// assert_eq!(kmp.find_all("bananas"), vec![1, 3]);
/// assert!(!kmp.is_match("band"));
/// ```
#[derive(Clone, Debug)]
pub struct Kmp {
    pattern: Vec<u8>,
    pi: Vec<usize>,
}

impl Kmp {
    pub fn new(pattern: &str) -> Self {
        let pattern = pattern.as_bytes().to_vec();
        let pi = prefix_function(&pattern);
        Self { pattern, pi }
    }

    pub fn pattern(&self) -> &[u8] {
        &self.pattern
    }

    /// Calls `found(pos)` for every (possibly overlapping) occurrence until it returns *false*
    fn search<F: FnMut(usize) -> bool>(&self, text: &str, mut found: F) {
        let m = self.pattern.len();
        if m == 0 {
            return;
        }

        let mut j = 0;
        for (i, &c) in text.as_bytes().iter().enumerate() {
            while j > 0 && c != self.pattern[j] {
                j = self.pi[j - 1];
            }
            if c == self.pattern[j] {
                j += 1;
            }
            if j == m {
                if !found(i + 1 - m) {
                    return;
                }
                j = self.pi[j - 1];
            }
        }
    }

    /// Position of the first occurrence; the empty pattern occurs at `0`
    pub fn find(&self, text: &str) -> Option<usize> {
        if self.pattern.is_empty() {
            return Some(0);
        }

        let mut first = None;
        self.search(text, |pos| {
            first = Some(pos);
            false
        });
        first
    }

    /// Positions of all occurrences, including overlapping ones; none for the empty pattern
    pub fn find_all(&self, text: &str) -> Vec<usize> {
        let mut positions = Vec::new();
        self.search(text, |pos| {
            positions.push(pos);
            true
        });
        positions
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.find(text).is_some()
    }
}

/// Occurrences of one signature in a scanned text
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignatureMatch<'a> {
    pub name: &'a str,
    pub positions: Vec<usize>,
}

/// A set of named patterns that are searched for together.
///
/// # Examples
/// ```
/// use casework::text::SignatureScanner;
///
/// let scanner = SignatureScanner::new()
///     .with_signature("trojan", "malware.exe")
///     .with_signature("miner", "xmrig");
///
/// let log = "User downloaded malware.exe from suspicious site";
/// assert_eq!(scanner.detected(log), vec!["trojan"]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct SignatureScanner {
    signatures: Vec<(String, Kmp)>,
}

impl SignatureScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    /// Registers `pattern` under `name`
    pub fn add_signature(&mut self, name: impl Into<String>, pattern: &str) {
        self.signatures.push((name.into(), Kmp::new(pattern)));
    }

    /// Builder variant of [`SignatureScanner::add_signature`]
    pub fn with_signature(mut self, name: impl Into<String>, pattern: &str) -> Self {
        self.add_signature(name, pattern);
        self
    }

    /// Names of all signatures that occur in `text`, in registration order
    pub fn detected(&self, text: &str) -> Vec<&str> {
        self.signatures
            .iter()
            .filter(|(_, kmp)| !kmp.pattern().is_empty() && kmp.is_match(text))
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// All occurrences of every signature that occurs in `text`
    pub fn scan(&self, text: &str) -> Vec<SignatureMatch<'_>> {
        self.signatures
            .iter()
            .filter_map(|(name, kmp)| {
                let positions = kmp.find_all(text);
                (!positions.is_empty()).then_some(SignatureMatch {
                    name: name.as_str(),
                    positions,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64Mcg;

    use super::*;

    #[test]
    fn empty_pattern_and_text() {
        let empty = Kmp::new("");
        assert_eq!(empty.find("abc"), Some(0));
        assert_eq!(empty.find(""), Some(0));
        assert!(empty.find_all("abc").is_empty());

        let kmp = Kmp::new("a");
        assert_eq!(kmp.find(""), None);
        assert_eq!(kmp.find_all("aaa"), vec![0, 1, 2]);
    }

    #[test]
    fn overlapping_matches() {
        let kmp = Kmp::new("aabaa");
        assert_eq!(kmp.find_all("aabaabaaxaabaa"), vec![0, 3, 9]);
    }

    #[test]
    fn random_against_std() {
        let rng = &mut Pcg64Mcg::seed_from_u64(3);

        for _ in 0..200 {
            let text: String = (0..rng.random_range(0..60))
                .map(|_| ['a', 'b', 'c'][rng.random_range(0..3)])
                .collect();
            let pattern: String = (0..rng.random_range(1..5))
                .map(|_| ['a', 'b'][rng.random_range(0..2)])
                .collect();

            let kmp = Kmp::new(&pattern);
            let expected = (0..text.len())
                .filter(|&i| text[i..].starts_with(&pattern))
                .collect_vec();

            assert_eq!(kmp.find_all(&text), expected);
            assert_eq!(kmp.find(&text), text.find(&pattern));
        }
    }

    #[test]
    fn scanner_reports_all_signatures() {
        let mut scanner = SignatureScanner::new();
        scanner.add_signature("FIRE", "FIRE");
        scanner.add_signature("FLOOD", "FLOOD");
        scanner.add_signature("empty", "");
        scanner.add_signature("smoke", "moke");
        assert_eq!(scanner.len(), 4);

        let text = "Smoke detected! Possible FIRE in Block A. FIRE spreading.";
        assert_eq!(scanner.detected(text), vec!["FIRE", "smoke"]);

        let matches = scanner.scan(text);
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0], SignatureMatch { name: "FIRE", positions: vec![25, 42] });
        assert_eq!(matches[1].positions, vec![1]);
    }
}
