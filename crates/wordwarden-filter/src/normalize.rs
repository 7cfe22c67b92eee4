//! Message normalization pipeline
//!
//! Converts raw message text into a canonical comparable form. Stages, in
//! order:
//!
//! 1. NFKC unicode normalization (fullwidth -> ASCII, ligatures, etc.)
//! 2. Hidden separator removal (zero-width joiners, soft hyphens, fillers)
//! 3. Homoglyph folding (Cyrillic look-alikes, small capitals)
//! 4. Swear-aware repetition reduction per whitespace token
//! 5. Spaced-letter joining (`f u c k` -> `fuck`)
//! 6. Stripping of everything but ASCII alphanumerics and whitespace
//! 7. Lowercasing, trimming and settling (single spaces, stages 4-5 re-run
//!    on the stripped text)
//!
//! The result is deterministic and idempotent for a fixed term set:
//! `normalize(normalize(x)) == normalize(x)`.

use crate::repetition::{collapse_runs, matches_with_repetitions};
use regex::Regex;
use std::collections::BTreeSet;
use unicode_normalization::UnicodeNormalization;
use wordwarden_core::{Error, Result};

/// Tokens whose letters-only form is shorter than this are left untouched
const MIN_REDUCIBLE_LETTERS: usize = 3;

/// Longest run of one character kept by generic repetition collapsing
const MAX_RUN: usize = 2;

/// Zero-width and other invisible separators used to split words
pub fn is_hidden_separator(c: char) -> bool {
    matches!(
        c,
        '\u{200B}'  // zero width space
        | '\u{200C}' // zero width non-joiner
        | '\u{200D}' // zero width joiner
        | '\u{2060}' // word joiner
        | '\u{034F}' // combining grapheme joiner
        | '\u{180E}' // mongolian vowel separator
        | '\u{FEFF}' // byte order mark
        | '\u{00AD}' // soft hyphen
        | '\u{17B5}' // khmer vowel inherent aa
        | '\u{17B6}' // khmer vowel sign aa
        | '\u{2028}' // line separator
        | '\u{2029}' // paragraph separator
        | '\u{1160}' // hangul jungseong filler
        | '\u{3164}' // hangul filler
    )
}

/// Latin letter for common non-Latin look-alikes
pub fn fold_homoglyph(c: char) -> char {
    match c {
        // Cyrillic
        'ѕ' => 's',
        'с' => 'c',
        'е' => 'e',
        'а' => 'a',
        'р' => 'p',
        'о' => 'o',
        'і' => 'i',
        'ԁ' => 'd',
        'ӏ' => 'l',
        'һ' => 'h',
        'ԛ' => 'q',
        'н' => 'h',
        'у' => 'y',
        'ғ' => 'f',
        // Small capitals
        'ᴀ' => 'a',
        'ʙ' => 'b',
        'ᴄ' => 'c',
        'ᴅ' => 'd',
        'ᴇ' => 'e',
        'ɢ' => 'g',
        'ɪ' => 'i',
        'ᴊ' => 'j',
        'ᴋ' => 'k',
        'ʟ' => 'l',
        'ᴍ' => 'm',
        'ɴ' => 'n',
        'ᴏ' => 'o',
        'ᴘ' => 'p',
        'ǫ' => 'q',
        'ʀ' => 'r',
        'ᴛ' => 't',
        'ᴜ' => 'u',
        'ᴠ' => 'v',
        'ᴡ' => 'w',
        'ʏ' => 'y',
        'ᴢ' => 'z',
        other => other,
    }
}

/// Reduce one token: a stretched prohibited term becomes the term itself,
/// anything else has runs of 3+ identical characters shortened to 2.
pub fn reduce_token(token: &str, terms: &BTreeSet<String>) -> String {
    let letters: String = token
        .chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_lowercase())
        .collect();

    if letters.len() < MIN_REDUCIBLE_LETTERS {
        return token.to_string();
    }

    terms
        .iter()
        .find(|term| letters.len() >= term.chars().count() && matches_with_repetitions(&letters, term))
        .cloned()
        .unwrap_or_else(|| collapse_runs(token, MAX_RUN))
}

/// Stage 4 over a whole text; tokens are re-joined with single spaces
pub fn reduce_repetitions(text: &str, terms: &BTreeSet<String>) -> String {
    text.split_whitespace()
        .map(|token| reduce_token(token, terms))
        .collect::<Vec<_>>()
        .join(" ")
}

/// The message normalization pipeline
#[derive(Debug, Clone)]
pub struct MessageNormalizer {
    spaced_letters: Regex,
}

impl MessageNormalizer {
    /// Create a new normalizer
    pub fn new() -> Result<Self> {
        Ok(Self {
            spaced_letters: Regex::new(r"(?i)\b(?:[a-z]\s+){2,}[a-z]\b")
                .map_err(|e| Error::pattern(format!("Failed to compile spaced-letter regex: {}", e)))?,
        })
    }

    /// Run the full pipeline against the given prohibited terms
    pub fn normalize(&self, text: &str, terms: &BTreeSet<String>) -> String {
        let folded: String = text
            .nfkc()
            .filter(|c| !is_hidden_separator(*c))
            .map(fold_homoglyph)
            .collect();

        let reduced = reduce_repetitions(&folded, terms);
        let joined = self.join_spaced_letters(&reduced, terms);

        let stripped: String = joined
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
            .collect();
        let lowered = stripped.to_ascii_lowercase();

        self.settle(lowered.trim(), terms)
    }

    /// Join runs of 3+ whitespace-separated single letters into one token
    pub fn join_spaced_letters(&self, text: &str, terms: &BTreeSet<String>) -> String {
        self.spaced_letters
            .replace_all(text, |caps: &regex::Captures<'_>| {
                let joined: String = caps[0].chars().filter(|c| !c.is_whitespace()).collect();
                reduce_token(&joined, terms)
            })
            .into_owned()
    }

    /// Stripping can expose new runs or spaced letters; reduce once more so
    /// the output is a fixpoint of the pipeline.
    fn settle(&self, text: &str, terms: &BTreeSet<String>) -> String {
        let reduced = reduce_repetitions(text, terms);
        self.join_spaced_letters(&reduced, terms)
    }
}

impl Default for MessageNormalizer {
    fn default() -> Self {
        Self::new().expect("Failed to create message normalizer")
    }
}
