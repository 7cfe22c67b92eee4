//! Near-miss detection
//!
//! Bounded Levenshtein distance plus the heuristic that lets ordinary
//! derived words (prefixed, suffixed or much longer) through.

use crate::rules::{LEGITIMATE_PREFIXES, LEGITIMATE_SUFFIXES};

/// Maximum edit distance treated as a bypass attempt
pub const MAX_DISTANCE: usize = 2;

/// Shortest and longest words checked for near misses
pub const MIN_FUZZY_LEN: usize = 3;
pub const MAX_FUZZY_LEN: usize = 10;

/// A word this much longer than the term is assumed to be a different word
pub const LENGTH_MARGIN: usize = 3;

/// Levenshtein distance that gives up once it must exceed `threshold`.
///
/// Returns `threshold + 1` when abandoned, otherwise the exact distance.
pub fn bounded_levenshtein(a: &[char], b: &[char], threshold: usize) -> usize {
    if a.len().abs_diff(b.len()) > threshold {
        return threshold + 1;
    }
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    if short.is_empty() {
        return long.len();
    }

    let mut prev: Vec<usize> = (0..=short.len()).collect();
    let mut cur = vec![0; short.len() + 1];

    for (i, lc) in long.iter().enumerate() {
        cur[0] = i + 1;
        let mut row_min = cur[0];
        for (j, sc) in short.iter().enumerate() {
            let substitution = prev[j] + usize::from(lc != sc);
            cur[j + 1] = substitution.min(prev[j + 1] + 1).min(cur[j] + 1);
            row_min = row_min.min(cur[j + 1]);
        }
        if row_min > threshold {
            return threshold + 1;
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    prev[short.len()]
}

/// Whether `word` looks like a legitimate word rather than a disguised `term`
pub fn likely_legitimate(word: &str, term: &str) -> bool {
    let len = word.chars().count();
    if len > term.chars().count() + LENGTH_MARGIN {
        return true;
    }
    let has_prefix = LEGITIMATE_PREFIXES
        .iter()
        .any(|p| word.starts_with(p) && len > p.len() + 2);
    let has_suffix = LEGITIMATE_SUFFIXES
        .iter()
        .any(|s| word.ends_with(s) && len > s.len() + 2);
    has_prefix || has_suffix
}
