//! Letter-run helpers shared by normalization and matching

/// Whether `word` is `term` with each character possibly repeated.
///
/// Both strings are compared as run-length encodings: the same characters
/// in the same order, each run in `word` at least as long as the matching
/// run in `term`. A doubled letter in the term needs a run of two or more.
pub fn matches_with_repetitions(word: &str, term: &str) -> bool {
    let word = runs(word);
    let term = runs(term);

    word.len() == term.len()
        && word
            .iter()
            .zip(&term)
            .all(|((wc, wn), (tc, tn))| wc == tc && wn >= tn)
}

/// Run-length encoding as (character, run length) pairs
fn runs(text: &str) -> Vec<(char, usize)> {
    let mut out: Vec<(char, usize)> = Vec::new();
    for c in text.chars() {
        match out.last_mut() {
            Some((last, n)) if *last == c => *n += 1,
            _ => out.push((c, 1)),
        }
    }
    out
}

/// Shorten every run of identical characters longer than `max_run`
pub fn collapse_runs(text: &str, max_run: usize) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last: Option<char> = None;
    let mut run = 0;

    for c in text.chars() {
        if Some(c) == last {
            run += 1;
        } else {
            last = Some(c);
            run = 1;
        }
        if run <= max_run {
            out.push(c);
        }
    }

    out
}
