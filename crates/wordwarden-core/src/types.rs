//! Verdict types shared by the filter and its callers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of classifying one message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// Whether at least one prohibited term was detected
    pub blocked: bool,

    /// Distinct matched terms in first-seen order
    pub matched_terms: Vec<String>,
}

impl Verdict {
    /// A verdict with no matches
    pub fn clean() -> Self {
        Self::default()
    }

    /// Build a verdict from the matched terms; blocked iff any term matched
    pub fn from_terms(matched_terms: Vec<String>) -> Self {
        Self {
            blocked: !matched_terms.is_empty(),
            matched_terms,
        }
    }

    /// Borrow the verdict as the `(blocked, terms)` pair callers usually want
    pub fn as_pair(&self) -> (bool, &[String]) {
        (self.blocked, &self.matched_terms)
    }
}

/// Which decision rule produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchRule {
    /// Exact prohibited term
    Direct,
    /// Edit distance within the threshold
    Fuzzy,
    /// Suffix or prefix stripped down to a term
    Morphology,
    /// Known abbreviated profanity
    Abbreviation,
    /// One adjacent swap away from a term
    Transposition,
    /// Confusable substitution expands to a term
    Expansion,
    /// Term with stretched letter runs
    Repetition,
}

impl MatchRule {
    /// Stable lowercase name, used as a metrics label
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Fuzzy => "fuzzy",
            Self::Morphology => "morphology",
            Self::Abbreviation => "abbreviation",
            Self::Transposition => "transposition",
            Self::Expansion => "expansion",
            Self::Repetition => "repetition",
        }
    }
}

impl fmt::Display for MatchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single candidate blocked by a rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermMatch {
    /// The term attributed as matched
    pub term: String,

    /// The rule that fired
    pub rule: MatchRule,
}

impl TermMatch {
    /// Create a new term match
    pub fn new(term: impl Into<String>, rule: MatchRule) -> Self {
        Self {
            term: term.into(),
            rule,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_from_terms() {
        let verdict = Verdict::from_terms(vec!["fuck".to_string()]);
        assert!(verdict.blocked);
        assert_eq!(verdict.as_pair(), (true, &["fuck".to_string()][..]));

        let clean = Verdict::from_terms(Vec::new());
        assert!(!clean.blocked);
        assert_eq!(clean, Verdict::clean());
    }

    #[test]
    fn test_verdict_serialization() {
        let verdict = Verdict::from_terms(vec!["shit".to_string()]);
        let json = serde_json::to_string(&verdict).unwrap();
        assert_eq!(json, r#"{"blocked":true,"matched_terms":["shit"]}"#);
    }

    #[test]
    fn test_rule_names() {
        assert_eq!(MatchRule::Transposition.to_string(), "transposition");
        assert_eq!(MatchRule::Repetition.as_str(), "repetition");
    }
}
