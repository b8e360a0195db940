//! Gestalt (Ratcliff/Obershelp) similarity between two strings.
//!
//! The ratio is `2 * M / T`, where `T` is the total number of characters in
//! both strings and `M` the number of characters covered by matching blocks.
//! Blocks are found by taking the longest common substring and recursing on
//! the pieces to its left and right.

use std::collections::HashMap;

/// Sequences at least this long have their most frequent characters
/// excluded from seeding matches.
const AUTOJUNK_MIN_LEN: usize = 200;

/// Similarity ratio in `[0, 1]`. Two empty strings are identical (1.0).
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matches = SequenceMatcher::new(&a, &b).matching_characters();
    2.0 * matches as f64 / total as f64
}

struct SequenceMatcher<'a> {
    a: &'a [char],
    b: &'a [char],
    /// Positions of each character in `b`, ascending.
    b2j: HashMap<char, Vec<usize>>,
}

impl<'a> SequenceMatcher<'a> {
    fn new(a: &'a [char], b: &'a [char]) -> Self {
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, &c) in b.iter().enumerate() {
            b2j.entry(c).or_default().push(j);
        }
        if b.len() >= AUTOJUNK_MIN_LEN {
            let limit = b.len() / 100 + 1;
            b2j.retain(|_, positions| positions.len() <= limit);
        }
        Self { a, b, b2j }
    }

    /// Longest block `(i, j, size)` with `a[i..i+size] == b[j..j+size]`
    /// inside the given ranges; earliest in `a`, then in `b`, on ties.
    fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> (usize, usize, usize) {
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for i in alo..ahi {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j.checked_sub(1).and_then(|p| j2len.get(&p)).copied().unwrap_or(0) + 1;
                    next.insert(j, k);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            j2len = next;
        }

        // Characters dropped as too frequent can still extend a block.
        while best_i > alo && best_j > blo && self.a[best_i - 1] == self.b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < ahi
            && best_j + best_size < bhi
            && self.a[best_i + best_size] == self.b[best_j + best_size]
        {
            best_size += 1;
        }
        (best_i, best_j, best_size)
    }

    fn matching_characters(&self) -> usize {
        let mut total = 0;
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];
        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let (i, j, k) = self.find_longest_match(alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            total += k;
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_identical_strings() {
        assert_eq!(similarity("lumela", "lumela"), 1.0);
        assert_eq!(similarity("kea leboha", "kea leboha"), 1.0);
    }

    #[test]
    fn test_empty_strings() {
        assert_eq!(similarity("", ""), 1.0);
        assert_eq!(similarity("", "lumela"), 0.0);
        assert_eq!(similarity("lumela", ""), 0.0);
    }

    #[test]
    fn test_disjoint_strings() {
        assert_eq!(similarity("xxxxx", "lumela"), 0.0);
        assert_eq!(similarity("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_known_ratios() {
        // "abcd" / "bcde": block "bcd" -> 2*3/8
        assert!(close(similarity("abcd", "bcde"), 0.75));
        // "lumela" / "dumela": block "umela" -> 2*5/12
        assert!(close(similarity("lumela", "dumela"), 10.0 / 12.0));
        // "hello" / "hallo": "h" + "llo" -> 2*4/10
        assert!(close(similarity("hello", "hallo"), 0.8));
    }

    #[test]
    fn test_ratio_counts_blocks_not_edits() {
        // Longest block "ab" leaves "cd"/"dc" on the right, which share one
        // character: 2*3/8, where an edit-distance ratio would differ.
        assert!(close(similarity("abcd", "abdc"), 0.75));
        // Reordered words: "leboha" sits at the edge of both sides, so
        // nothing else is recovered.
        assert!(close(similarity("kea leboha", "leboha kea"), 12.0 / 20.0));
    }

    #[test]
    fn test_bounded_and_deterministic() {
        let pairs = [
            ("o kae", "ke teng"),
            ("lebitso la hau ke mang", "what is your name"),
            ("sala hantle", "tsamaya hantle"),
        ];
        for (a, b) in pairs {
            let s = similarity(a, b);
            assert!((0.0..=1.0).contains(&s));
            assert_eq!(s, similarity(a, b));
        }
    }

    #[test]
    fn test_long_inputs_with_frequent_characters() {
        let a = "a".repeat(300);
        let b = "a".repeat(300);
        assert_eq!(similarity(&a, &b), 1.0);

        let b = format!("{}b", "a".repeat(299));
        let s = similarity(&a, &b);
        assert!(s > 0.99 && s < 1.0);
    }
}
