//! Term classifier
//!
//! Decides whether one candidate token is a prohibited term in disguise.
//! Rules are evaluated from an explicit ordered list and the first rule that
//! reaches a decision wins; the order is policy (the safe-word check runs
//! before any fuzzy matching, fuzzy before morphology, and so on).

use crate::confusables::ConfusableTable;
use crate::fuzzy::{bounded_levenshtein, likely_legitimate, MAX_DISTANCE, MAX_FUZZY_LEN, MIN_FUZZY_LEN};
use crate::repetition::matches_with_repetitions;
use crate::rules::{is_short_abbreviation, ContextWhitelist, MIN_PREFIX_REMAINDER, MORPHOLOGY_PREFIXES, SUFFIX_RULES};
use crate::terms::TermSnapshot;
use wordwarden_core::{MatchRule, TermMatch};

/// Tokens shorter than this are never evaluated
pub const MIN_WORD_LEN: usize = 2;

/// Transposition applies to words within this length range
pub const TRANSPOSITION_LEN: std::ops::RangeInclusive<usize> = 3..=6;

/// Longest word considered for confusable expansion
pub const MAX_EXPANSION_LEN: usize = 5;

/// Reverse-confusable bases tried per character
pub const BASES_PER_CHAR: usize = 2;

/// Expansion is skipped when it would generate more variants than this
pub const MAX_EXPANSIONS: usize = 100;

/// Rules applied to words, the squeezed form and the distributed form
pub const WORD_RULES: &[MatchRule] = &[
    MatchRule::Direct,
    MatchRule::Fuzzy,
    MatchRule::Morphology,
    MatchRule::Abbreviation,
    MatchRule::Transposition,
    MatchRule::Expansion,
];

/// Rules applied to independently folded raw tokens
pub const RAW_TOKEN_RULES: &[MatchRule] = &[
    MatchRule::Direct,
    MatchRule::Repetition,
    MatchRule::Expansion,
];

/// Result of evaluating a single rule
enum Outcome {
    /// Block with this match
    Block(TermMatch),
    /// Stop evaluating and allow the token
    Allow,
    /// This rule has no opinion
    Continue,
}

impl From<Option<TermMatch>> for Outcome {
    fn from(found: Option<TermMatch>) -> Self {
        found.map_or(Outcome::Continue, Outcome::Block)
    }
}

/// Evaluates candidates against one term snapshot
pub struct TermMatcher<'a> {
    terms: &'a TermSnapshot,
    confusables: &'a ConfusableTable,
    context: &'a ContextWhitelist,
}

impl<'a> TermMatcher<'a> {
    /// Create a matcher over a snapshot
    pub fn new(
        terms: &'a TermSnapshot,
        confusables: &'a ConfusableTable,
        context: &'a ContextWhitelist,
    ) -> Self {
        Self {
            terms,
            confusables,
            context,
        }
    }

    /// Run `rules` in order against `word`, with `message` as context
    pub fn check(&self, word: &str, message: &str, rules: &[MatchRule]) -> Option<TermMatch> {
        if word.chars().count() < MIN_WORD_LEN {
            return None;
        }

        if self.terms.is_safe(word) {
            if !self.terms.is_prohibited(word) {
                return None;
            }
            // safe and prohibited: only a direct match outside a
            // whitelisted context blocks
            return match self.direct(word, message) {
                Outcome::Block(found) => Some(found),
                Outcome::Allow | Outcome::Continue => None,
            };
        }

        for rule in rules {
            match self.apply(*rule, word, message) {
                Outcome::Block(found) => return Some(found),
                Outcome::Allow => return None,
                Outcome::Continue => {}
            }
        }
        None
    }

    fn apply(&self, rule: MatchRule, word: &str, message: &str) -> Outcome {
        match rule {
            MatchRule::Direct => self.direct(word, message),
            MatchRule::Fuzzy => self.fuzzy(word).into(),
            MatchRule::Morphology => self.morphology(word).into(),
            MatchRule::Abbreviation => self.abbreviation(word).into(),
            MatchRule::Transposition => self.transposition(word).into(),
            MatchRule::Expansion => self.expansion(word).into(),
            MatchRule::Repetition => self.repetition(word).into(),
        }
    }

    fn direct(&self, word: &str, message: &str) -> Outcome {
        if !self.terms.is_prohibited(word) {
            Outcome::Continue
        } else if self.context.exempts(word, message) {
            Outcome::Allow
        } else {
            Outcome::Block(TermMatch::new(word, MatchRule::Direct))
        }
    }

    fn fuzzy(&self, word: &str) -> Option<TermMatch> {
        let chars: Vec<char> = word.chars().collect();
        if !(MIN_FUZZY_LEN..=MAX_FUZZY_LEN).contains(&chars.len()) {
            return None;
        }

        self.terms
            .prohibited()
            .iter()
            .find(|term| {
                let term_chars: Vec<char> = term.chars().collect();
                chars.len().abs_diff(term_chars.len()) <= MAX_DISTANCE
                    && bounded_levenshtein(&chars, &term_chars, MAX_DISTANCE) <= MAX_DISTANCE
                    && !likely_legitimate(word, term)
            })
            .map(|term| TermMatch::new(term.as_str(), MatchRule::Fuzzy))
    }

    fn morphology(&self, word: &str) -> Option<TermMatch> {
        let by_suffix = SUFFIX_RULES
            .iter()
            .filter_map(|rule| rule.strip(word))
            .any(|root| self.root_matches(root, drop_last_if_doubled(root)));

        let matched = by_suffix
            || MORPHOLOGY_PREFIXES
                .iter()
                .filter_map(|prefix| word.strip_prefix(prefix))
                .filter(|rest| rest.chars().count() >= MIN_PREFIX_REMAINDER)
                .any(|rest| self.root_matches(rest, drop_first_if_doubled(rest)));

        matched.then(|| TermMatch::new(word, MatchRule::Morphology))
    }

    fn root_matches(&self, root: &str, undoubled: Option<&str>) -> bool {
        self.is_blockable_root(root) || undoubled.is_some_and(|r| self.is_blockable_root(r))
    }

    fn is_blockable_root(&self, root: &str) -> bool {
        self.terms.is_prohibited(root) && !self.terms.is_safe(root)
    }

    fn abbreviation(&self, word: &str) -> Option<TermMatch> {
        is_short_abbreviation(word).then(|| TermMatch::new(word, MatchRule::Abbreviation))
    }

    fn transposition(&self, word: &str) -> Option<TermMatch> {
        let chars: Vec<char> = word.chars().collect();
        if !TRANSPOSITION_LEN.contains(&chars.len()) {
            return None;
        }

        (0..chars.len() - 1).find_map(|i| {
            let mut swapped = chars.clone();
            swapped.swap(i, i + 1);
            let candidate: String = swapped.into_iter().collect();
            self.terms
                .is_prohibited(&candidate)
                .then(|| TermMatch::new(candidate, MatchRule::Transposition))
        })
    }

    fn expansion(&self, word: &str) -> Option<TermMatch> {
        let options: Vec<Vec<char>> = word
            .chars()
            .map(|c| {
                let bases = self.confusables.bases_for(c);
                if bases.is_empty() {
                    vec![c]
                } else {
                    bases.iter().take(BASES_PER_CHAR).copied().collect()
                }
            })
            .collect();
        if options.is_empty() || options.len() > MAX_EXPANSION_LEN {
            return None;
        }

        let total = options
            .iter()
            .fold(1usize, |acc, o| acc.saturating_mul(o.len()));
        if total > MAX_EXPANSIONS {
            return None;
        }

        let mut positions = vec![0usize; options.len()];
        loop {
            let candidate: String = positions
                .iter()
                .zip(&options)
                .map(|(i, choices)| choices[*i])
                .collect();
            if self.terms.is_prohibited(&candidate) {
                return Some(TermMatch::new(candidate, MatchRule::Expansion));
            }

            // odometer increment, last position fastest
            let mut slot = options.len();
            loop {
                if slot == 0 {
                    return None;
                }
                slot -= 1;
                positions[slot] += 1;
                if positions[slot] < options[slot].len() {
                    break;
                }
                positions[slot] = 0;
            }
        }
    }

    fn repetition(&self, word: &str) -> Option<TermMatch> {
        let len = word.chars().count();
        self.terms
            .prohibited()
            .iter()
            .find(|term| len >= term.chars().count() && matches_with_repetitions(word, term))
            .map(|term| TermMatch::new(term.as_str(), MatchRule::Repetition))
    }
}

/// `root` without its last character when it ends in a doubled letter
fn drop_last_if_doubled(root: &str) -> Option<&str> {
    let mut rev = root.char_indices().rev();
    let (last_idx, last) = rev.next()?;
    let (_, prev) = rev.next()?;
    (root.chars().count() > 2 && last == prev).then(|| &root[..last_idx])
}

/// `rest` without its first character when it starts with a doubled letter
fn drop_first_if_doubled(rest: &str) -> Option<&str> {
    let mut chars = rest.chars();
    let first = chars.next()?;
    let second = chars.next()?;
    (rest.chars().count() > 2 && first == second).then(|| &rest[first.len_utf8()..])
}
