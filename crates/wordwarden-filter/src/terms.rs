//! Prohibited terms and safe words for one filter instance
//!
//! Readers take an immutable `TermSnapshot` and keep it for the whole
//! classification; administrative updates build a new snapshot and swap it
//! in, so a reader never observes a half-applied change.

use crate::dictionary::SafeDictionary;
use parking_lot::RwLock;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Shortest accepted prohibited term, in characters
pub const MIN_TERM_LEN: usize = 2;

/// Lowercased, trimmed term, or `None` if it is too short
pub fn canonical_term(raw: &str) -> Option<String> {
    let term = raw.trim().to_lowercase();
    (term.chars().count() >= MIN_TERM_LEN).then_some(term)
}

/// Immutable view of an instance's term sets
#[derive(Debug, Clone)]
pub struct TermSnapshot {
    prohibited: BTreeSet<String>,
    whitelist: BTreeSet<String>,
    dictionary: Arc<SafeDictionary>,
}

impl TermSnapshot {
    /// Create a snapshot with no prohibited terms
    pub fn new(dictionary: Arc<SafeDictionary>) -> Self {
        Self {
            prohibited: BTreeSet::new(),
            whitelist: BTreeSet::new(),
            dictionary,
        }
    }

    /// Whether `word` is a prohibited term
    pub fn is_prohibited(&self, word: &str) -> bool {
        self.prohibited.contains(word)
    }

    /// Whether `word` is in the base dictionary or the tenant whitelist
    pub fn is_safe(&self, word: &str) -> bool {
        self.dictionary.contains(word) || self.whitelist.contains(word)
    }

    /// Prohibited terms in sorted order
    pub fn prohibited(&self) -> &BTreeSet<String> {
        &self.prohibited
    }

    /// Tenant whitelist overlay
    pub fn whitelist(&self) -> &BTreeSet<String> {
        &self.whitelist
    }

    /// Size of the combined safe set (base plus overlay entries not in base)
    pub fn safe_len(&self) -> usize {
        self.dictionary.len()
            + self
                .whitelist
                .iter()
                .filter(|w| !self.dictionary.contains(w))
                .count()
    }

    /// Whether there are no prohibited terms
    pub fn has_no_terms(&self) -> bool {
        self.prohibited.is_empty()
    }
}

/// Copy-on-write holder for the current snapshot
#[derive(Debug)]
pub struct TermStore {
    current: RwLock<Arc<TermSnapshot>>,
}

impl TermStore {
    /// Create an empty store over the given base dictionary
    pub fn new(dictionary: Arc<SafeDictionary>) -> Self {
        Self {
            current: RwLock::new(Arc::new(TermSnapshot::new(dictionary))),
        }
    }

    /// Current snapshot
    pub fn snapshot(&self) -> Arc<TermSnapshot> {
        self.current.read().clone()
    }

    /// Add terms; returns how many were new
    pub fn add_terms<I, S>(&self, terms: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let candidates: Vec<String> = terms
            .into_iter()
            .filter_map(|t| canonical_term(t.as_ref()))
            .collect();
        self.update(|snapshot| {
            candidates
                .into_iter()
                .filter(|t| snapshot.prohibited.insert(t.clone()))
                .count()
        })
    }

    /// Remove terms; absent terms are ignored. Returns how many were removed.
    pub fn remove_terms<I, S>(&self, terms: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let candidates: Vec<String> = terms
            .into_iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .collect();
        self.update(|snapshot| {
            candidates
                .iter()
                .filter(|t| snapshot.prohibited.remove(t.as_str()))
                .count()
        })
    }

    /// Replace the whitelist overlay; returns its new size
    pub fn set_whitelist<I, S>(&self, words: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let whitelist: BTreeSet<String> = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        self.update(|snapshot| {
            snapshot.whitelist = whitelist;
            snapshot.whitelist.len()
        })
    }

    fn update<R>(&self, apply: impl FnOnce(&mut TermSnapshot) -> R) -> R {
        let mut current = self.current.write();
        let mut next = TermSnapshot::clone(&current);
        let result = apply(&mut next);
        *current = Arc::new(next);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> TermStore {
        TermStore::new(Arc::new(SafeDictionary::from_words(["class", "hello"])))
    }

    #[test]
    fn test_add_terms_canonicalizes() {
        let store = store();
        assert_eq!(store.add_terms(["  FUCK ", "shit", "shit", "x", ""]), 2);
        let snapshot = store.snapshot();
        assert!(snapshot.is_prohibited("fuck"));
        assert!(snapshot.is_prohibited("shit"));
        assert!(!snapshot.is_prohibited("x"));
        assert_eq!(snapshot.prohibited().len(), 2);

        assert_eq!(store.add_terms(["Shit"]), 0);
    }

    #[test]
    fn test_remove_terms_exact_only() {
        let store = store();
        store.add_terms(["fuck", "fucker"]);
        assert_eq!(store.remove_terms(["fuck", "absent"]), 1);
        let snapshot = store.snapshot();
        assert!(!snapshot.is_prohibited("fuck"));
        assert!(snapshot.is_prohibited("fucker"));
    }

    #[test]
    fn test_whitelist_overlay() {
        let store = store();
        assert!(store.snapshot().is_safe("class"));
        assert!(!store.snapshot().is_safe("warhammer"));

        assert_eq!(store.set_whitelist(["Warhammer", " "]), 1);
        assert!(store.snapshot().is_safe("warhammer"));
        assert_eq!(store.snapshot().safe_len(), 3);

        store.set_whitelist(Vec::<String>::new());
        assert!(!store.snapshot().is_safe("warhammer"));
    }

    #[test]
    fn test_snapshot_isolated_from_updates() {
        let store = store();
        store.add_terms(["damn"]);
        let before = store.snapshot();
        store.add_terms(["shit"]);
        assert!(!before.is_prohibited("shit"));
        assert!(store.snapshot().is_prohibited("shit"));
    }
}
