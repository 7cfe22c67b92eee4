//! Static rule tables for the term classifier
//!
//! Suffix/prefix stripping tables, the short-abbreviation list, the
//! legitimate-affix heuristics used to veto fuzzy matches and the per-term
//! context whitelist. All of it is fixed data compiled once.

use regex::{Regex, RegexBuilder};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use tracing::warn;

/// One morphological suffix with its guard conditions
#[derive(Debug, Clone, Copy)]
pub struct SuffixRule {
    /// Suffix to strip
    pub suffix: &'static str,

    /// Minimum whole-word length (in characters) before stripping applies
    pub min_len: usize,

    /// Whole words that must never be stripped
    pub exceptions: &'static [&'static str],
}

impl SuffixRule {
    /// Root left after stripping, if this rule applies to `word`
    pub fn strip<'a>(&self, word: &'a str) -> Option<&'a str> {
        if word.chars().count() < self.min_len || self.exceptions.contains(&word) {
            return None;
        }
        word.strip_suffix(self.suffix)
    }
}

pub const SUFFIX_RULES: &[SuffixRule] = &[
    SuffixRule { suffix: "ing", min_len: 4, exceptions: &["ring", "king", "sing", "wing", "thing"] },
    SuffixRule { suffix: "er", min_len: 3, exceptions: &["her", "per", "over", "under", "water"] },
    SuffixRule { suffix: "ed", min_len: 3, exceptions: &["red", "bed", "fed", "led", "wed"] },
    SuffixRule { suffix: "a", min_len: 4, exceptions: &["banana", "drama", "camera"] },
    SuffixRule { suffix: "s", min_len: 3, exceptions: &["is", "as", "us", "yes", "this"] },
    SuffixRule { suffix: "es", min_len: 4, exceptions: &["yes", "res", "des", "goes", "does"] },
    SuffixRule { suffix: "ly", min_len: 4, exceptions: &["my", "by", "fly", "try", "dry"] },
    SuffixRule { suffix: "y", min_len: 4, exceptions: &["my", "by", "try", "dry", "guy"] },
];

/// Prefixes stripped by the morphology rule
pub const MORPHOLOGY_PREFIXES: &[&str] = &["re", "un", "de", "in", "pre", "pro", "anti", "non"];

/// Shortest remainder a prefix strip may leave
pub const MIN_PREFIX_REMAINDER: usize = 3;

/// Prefixes that mark a near-miss as an ordinary derived word
pub const LEGITIMATE_PREFIXES: &[&str] = &[
    "un", "re", "pre", "de", "dis", "mis", "over", "under", "out", "sub", "anti", "pro", "inter",
];

/// Suffixes that mark a near-miss as an ordinary derived word
pub const LEGITIMATE_SUFFIXES: &[&str] = &[
    "ing", "ed", "er", "est", "ly", "tion", "sion", "ness", "ment", "able", "ful", "less",
];

/// Known abbreviated profanities (all three characters or fewer)
pub const SHORT_ABBREVIATIONS: &[&str] = &[
    "fx", "fk", "sht", "wtf", "ffs", "ngr", "bch", "cnt", "dck", "fck", "sh1", "5ht", "vgn",
    "prn", "f4n", "n1g", "k3k", "fku", "ass", "fuk", "fuc", "fgs", "wth", "dmn", "prk", "twt",
];

/// Longest token the abbreviation rule considers
pub const MAX_ABBREVIATION_LEN: usize = 3;

/// Digits and symbols dropped before the second abbreviation lookup
pub const ABBREVIATION_DECORATION: &[char] =
    &['1', '3', '7', '8', '2', '4', '5', '6', '0', '9', '@', '#', '$', '+', '*'];

/// Whether `word` is a known abbreviation, as-is or with decoration removed
pub fn is_short_abbreviation(word: &str) -> bool {
    if word.chars().count() <= MAX_ABBREVIATION_LEN && SHORT_ABBREVIATIONS.contains(&word) {
        return true;
    }
    let undecorated: String = word
        .chars()
        .filter(|c| !ABBREVIATION_DECORATION.contains(c))
        .collect();
    undecorated.chars().count() <= MAX_ABBREVIATION_LEN
        && SHORT_ABBREVIATIONS.contains(&undecorated.as_str())
}

/// Context patterns that exempt a term when found in the original message
pub const CONTEXT_PATTERNS: &[(&str, &[&str])] = &[
    (
        "ass",
        &[
            r"\bclass\w*\b",
            r"\bpass\w*\b",
            r"\bgrass\w*\b",
            r"\bmass\w*\b",
            r"\bassess\w*\b",
            r"\bassign\w*\b",
            r"\bassist\w*\b",
            r"\bassert\w*\b",
        ],
    ),
    (
        "hell",
        &[
            r"\bhello\w*\b",
            r"\bshell\w*\b",
            r"\bwherein\b",
            r"\bmichelle\b",
            r"\bseychelles\b",
        ],
    ),
];

/// Compiled per-term context exemptions
///
/// A term without an entry can never be exempted. A pattern that fails to
/// compile is dropped and behaves as a non-match.
#[derive(Debug, Default)]
pub struct ContextWhitelist {
    rules: HashMap<String, Vec<Regex>>,
}

impl ContextWhitelist {
    /// Compile the built-in context patterns
    pub fn new() -> Self {
        Self::from_patterns(CONTEXT_PATTERNS)
    }

    /// Compile an arbitrary pattern table
    pub fn from_patterns(table: &[(&str, &[&str])]) -> Self {
        let mut rules: HashMap<String, Vec<Regex>> = HashMap::new();
        for (term, patterns) in table {
            let compiled = rules.entry(term.to_string()).or_default();
            for pattern in patterns.iter() {
                match RegexBuilder::new(pattern).case_insensitive(true).build() {
                    Ok(re) => compiled.push(re),
                    Err(e) => warn!("Skipping context pattern {:?} for {:?}: {}", pattern, term, e),
                }
            }
        }
        Self { rules }
    }

    /// Process-wide compiled built-in table
    pub fn shared() -> Arc<ContextWhitelist> {
        static SHARED: OnceLock<Arc<ContextWhitelist>> = OnceLock::new();
        SHARED.get_or_init(|| Arc::new(ContextWhitelist::new())).clone()
    }

    /// Whether `message` contains a context that exempts `term`
    pub fn exempts(&self, term: &str, message: &str) -> bool {
        self.rules
            .get(term)
            .map(|patterns| patterns.iter().any(|re| re.is_match(message)))
            .unwrap_or(false)
    }

    /// Terms that have context exemptions
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }
}
