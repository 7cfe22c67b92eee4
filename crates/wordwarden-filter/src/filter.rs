//! Per-tenant profanity filter
//!
//! `ProfanityFilter` owns a tenant's prohibited terms, whitelist overlay,
//! verdict cache and counters. Classification flows through:
//!
//! cache lookup -> normalization -> candidate generation -> term matching
//! per candidate -> aggregated verdict -> cache write
//!
//! with cooperative checkpoints before the word scan, every few words,
//! before the raw-token scan and every few raw tokens.

use crate::cache::ResultCache;
use crate::candidates::{self, fold_raw_token, MIN_JOINED_LEN, MIN_RAW_TOKEN_LEN};
use crate::classifier::Classifier;
use crate::config::FilterConfig;
use crate::confusables::ConfusableTable;
use crate::dictionary::SafeDictionary;
use crate::matcher::{TermMatcher, RAW_TOKEN_RULES, WORD_RULES};
use crate::metrics::{FilterStats, StatsSnapshot};
use crate::normalize::MessageNormalizer;
use crate::rules::{ContextWhitelist, MAX_ABBREVIATION_LEN, SHORT_ABBREVIATIONS};
use crate::scheduler::Checkpoints;
use crate::terms::TermStore;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};
use wordwarden_core::{Result, TermMatch, Verdict};

/// Diagnostic view of how a single word is treated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordReport {
    /// The word as evaluated (trimmed, lowercased)
    pub word: String,

    /// Whether the word is in the safe set (base or overlay)
    pub in_safe: bool,

    /// Whether the word is itself a prohibited term
    pub in_prohibited: bool,

    /// Size of the combined safe set
    pub safe_size: usize,

    /// Number of prohibited terms
    pub prohibited_size: usize,

    /// The rule that would block the word, if any
    pub decision: Option<TermMatch>,
}

/// Distinct matched terms in first-seen order
#[derive(Default)]
struct MatchedTerms {
    terms: Vec<String>,
}

impl MatchedTerms {
    fn push(&mut self, term: &str) {
        if !self.terms.iter().any(|t| t == term) {
            self.terms.push(term.to_string());
        }
    }
}

/// Classifier instance for one tenant
pub struct ProfanityFilter {
    name: String,
    terms: TermStore,
    confusables: Arc<ConfusableTable>,
    context: Arc<ContextWhitelist>,
    normalizer: MessageNormalizer,
    cache: ResultCache,
    checkpoints: Checkpoints,
    stats: FilterStats,
    invalidate_on_update: bool,
}

impl ProfanityFilter {
    /// Start building a filter for the named tenant
    pub fn builder(name: impl Into<String>) -> FilterBuilder {
        FilterBuilder::new(name)
    }

    /// Filter with default configuration and the built-in dictionary
    pub fn with_terms<I, S>(name: impl Into<String>, terms: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::builder(name).terms(terms).build()
    }

    /// Classify one message
    ///
    /// Empty or all-whitespace input, and any input while no terms are
    /// configured, yields a clean verdict.
    pub async fn classify(&self, message: &str) -> Verdict {
        self.stats.record_call();
        if let Some(verdict) = self.cached(message) {
            return verdict;
        }

        let _slot = self.cache.lock_key(message).await;
        if let Some(verdict) = self.cached(message) {
            return verdict;
        }

        let started = Instant::now();
        let verdict = self.evaluate(message).await;
        let latency_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        self.stats.record_verdict(verdict.blocked, latency_us);

        if verdict.blocked {
            debug!(
                tenant = %self.name,
                terms = ?verdict.matched_terms,
                latency_us,
                "Message blocked"
            );
        }

        self.cache.insert(message, verdict.clone());
        verdict
    }

    fn cached(&self, message: &str) -> Option<Verdict> {
        let verdict = self.cache.get(message)?;
        self.stats.record_cache_hit();
        Some(verdict)
    }

    async fn evaluate(&self, message: &str) -> Verdict {
        let snapshot = self.terms.snapshot();
        if message.trim().is_empty() || snapshot.has_no_terms() {
            return Verdict::clean();
        }

        let matcher = TermMatcher::new(&snapshot, &self.confusables, &self.context);
        let mut found = MatchedTerms::default();

        self.checkpoints.pause().await;
        let normalized = self.normalizer.normalize(message, snapshot.prohibited());
        let words = candidates::words(&normalized);

        for (index, word) in words.iter().enumerate() {
            self.checkpoints.word(index).await;
            if let Some(hit) = matcher.check(word, message, WORD_RULES) {
                self.record(&mut found, word, hit);
            }
        }

        let squeezed = candidates::squeezed(&normalized);
        if squeezed.len() >= MIN_JOINED_LEN && !snapshot.is_safe(&squeezed) {
            if let Some(hit) = matcher.check(&squeezed, message, WORD_RULES) {
                self.record(&mut found, &squeezed, hit);
            }
        }

        self.checkpoints.pause().await;
        for (index, token) in candidates::raw_tokens(message).enumerate() {
            self.checkpoints.raw_token(index).await;
            let folded = fold_raw_token(token, &self.confusables);
            if folded.len() >= MIN_RAW_TOKEN_LEN && !snapshot.is_safe(&folded) {
                if let Some(hit) = matcher.check(&folded, message, RAW_TOKEN_RULES) {
                    self.record(&mut found, &folded, hit);
                }
            }
        }

        let distributed = candidates::distributed(message);
        if distributed.len() >= MIN_JOINED_LEN && !snapshot.is_safe(&distributed) {
            if let Some(hit) = matcher.check(&distributed, message, WORD_RULES) {
                self.record(&mut found, &distributed, hit);
            }
        }

        // A message that is nothing but a known abbreviation, and that no
        // other candidate already attributed to a term
        if let [only] = words.as_slice() {
            if found.terms.is_empty()
                && only.chars().count() <= MAX_ABBREVIATION_LEN
                && SHORT_ABBREVIATIONS.contains(only)
                && !snapshot.is_safe(only)
            {
                found.push(only);
            }
        }

        Verdict::from_terms(found.terms)
    }

    fn record(&self, found: &mut MatchedTerms, candidate: &str, hit: TermMatch) {
        debug!(
            tenant = %self.name,
            candidate,
            term = %hit.term,
            rule = %hit.rule,
            "Candidate matched"
        );
        self.stats.record_match(hit.rule);
        found.push(&hit.term);
    }

    /// Classify several messages in order, pairing each with its verdict
    pub async fn classify_batch<I, S>(&self, messages: I) -> Vec<(String, Verdict)>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut results = Vec::new();
        for message in messages {
            let message = message.into();
            let verdict = self.classify(&message).await;
            results.push((message, verdict));
        }
        results
    }

    /// Explain how a single word would be treated
    pub fn explain(&self, word: &str) -> WordReport {
        let word = word.trim().to_lowercase();
        let snapshot = self.terms.snapshot();
        let matcher = TermMatcher::new(&snapshot, &self.confusables, &self.context);

        WordReport {
            in_safe: snapshot.is_safe(&word),
            in_prohibited: snapshot.is_prohibited(&word),
            safe_size: snapshot.safe_len(),
            prohibited_size: snapshot.prohibited().len(),
            decision: matcher.check(&word, &word, WORD_RULES),
            word,
        }
    }

    /// Add prohibited terms; returns how many were new
    pub fn add_terms<I, S>(&self, terms: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let added = self.terms.add_terms(terms);
        info!(tenant = %self.name, added, "Prohibited terms added");
        self.after_update();
        added
    }

    /// Remove prohibited terms; returns how many were removed
    pub fn remove_terms<I, S>(&self, terms: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let removed = self.terms.remove_terms(terms);
        info!(tenant = %self.name, removed, "Prohibited terms removed");
        self.after_update();
        removed
    }

    /// Replace the tenant whitelist; returns its new size
    pub fn set_whitelist<I, S>(&self, words: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let size = self.terms.set_whitelist(words);
        info!(tenant = %self.name, size, "Whitelist replaced");
        self.after_update();
        size
    }

    fn after_update(&self) {
        if self.invalidate_on_update {
            self.cache.clear();
        }
    }

    /// Drop all cached verdicts
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Number of cached verdicts
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Current prohibited terms, sorted
    pub fn terms(&self) -> Vec<String> {
        self.terms.snapshot().prohibited().iter().cloned().collect()
    }

    /// Current whitelist overlay, sorted
    pub fn whitelist(&self) -> Vec<String> {
        self.terms.snapshot().whitelist().iter().cloned().collect()
    }

    /// Counters for this instance
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot(self.checkpoints.yields())
    }

    /// Tenant name
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl Classifier for ProfanityFilter {
    async fn classify(&self, message: &str) -> Verdict {
        ProfanityFilter::classify(self, message).await
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Builder for `ProfanityFilter`
pub struct FilterBuilder {
    name: String,
    config: FilterConfig,
    dictionary: Option<Arc<SafeDictionary>>,
    confusables: Option<Arc<ConfusableTable>>,
    terms: Vec<String>,
    whitelist: Vec<String>,
}

impl FilterBuilder {
    /// Create a new builder
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: FilterConfig::default(),
            dictionary: None,
            confusables: None,
            terms: Vec::new(),
            whitelist: Vec::new(),
        }
    }

    /// Use this configuration
    pub fn config(mut self, config: FilterConfig) -> Self {
        self.config = config;
        self
    }

    /// Share an existing base dictionary instead of loading one
    pub fn dictionary(mut self, dictionary: Arc<SafeDictionary>) -> Self {
        self.dictionary = Some(dictionary);
        self
    }

    /// Inject a confusable table (the process-wide one by default)
    pub fn confusables(mut self, confusables: Arc<ConfusableTable>) -> Self {
        self.confusables = Some(confusables);
        self
    }

    /// Initial prohibited terms
    pub fn terms<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.terms
            .extend(terms.into_iter().map(|t| t.as_ref().to_string()));
        self
    }

    /// Initial whitelist overlay
    pub fn whitelist<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.whitelist
            .extend(words.into_iter().map(|w| w.as_ref().to_string()));
        self
    }

    /// Build the filter
    pub fn build(self) -> Result<ProfanityFilter> {
        self.config.validate()?;

        let dictionary = match self.dictionary {
            Some(dictionary) => dictionary,
            None => SafeDictionary::from_config(&self.config.dictionary)?,
        };
        let terms = TermStore::new(dictionary);
        terms.add_terms(&self.terms);
        terms.set_whitelist(&self.whitelist);

        let filter = ProfanityFilter {
            terms,
            confusables: self.confusables.unwrap_or_else(ConfusableTable::shared),
            context: ContextWhitelist::shared(),
            normalizer: MessageNormalizer::new()?,
            cache: ResultCache::new(self.config.cache.capacity, self.config.cache.ttl()),
            checkpoints: Checkpoints::new(&self.config.checkpoints),
            stats: FilterStats::new(self.name.clone()),
            invalidate_on_update: self.config.cache.invalidate_on_update,
            name: self.name,
        };

        info!(
            tenant = %filter.name,
            terms = filter.terms.snapshot().prohibited().len(),
            "Profanity filter ready"
        );
        Ok(filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(terms: &[&str]) -> ProfanityFilter {
        ProfanityFilter::with_terms("test", terms.iter().copied()).unwrap()
    }

    #[tokio::test]
    async fn test_empty_input_is_clean() {
        let filter = filter(&["fuck"]);
        assert_eq!(filter.classify("").await, Verdict::clean());
        assert_eq!(filter.classify("   \t\n").await, Verdict::clean());
    }

    #[tokio::test]
    async fn test_no_terms_is_clean() {
        let filter = filter(&[]);
        assert_eq!(filter.classify("wtf").await, Verdict::clean());
    }

    #[tokio::test]
    async fn test_direct_term() {
        let filter = filter(&["shit"]);
        let verdict = filter.classify("oh shit").await;
        assert_eq!(verdict, Verdict::from_terms(vec!["shit".to_string()]));
    }

    #[tokio::test]
    async fn test_lone_abbreviation() {
        let filter = filter(&["fuck"]);
        let verdict = filter.classify("wtf").await;
        assert!(verdict.blocked);
        assert_eq!(verdict.matched_terms, vec!["wtf"]);
    }

    #[tokio::test]
    async fn test_attributed_abbreviation_not_repeated() {
        let filter = filter(&["fuck"]);
        // "fck" is both a near miss of the term and a known abbreviation
        let verdict = filter.classify("f@ck").await;
        assert_eq!(verdict, Verdict::from_terms(vec!["fuck".to_string()]));
        let verdict = filter.classify("fck").await;
        assert_eq!(verdict.matched_terms, vec!["fuck"]);
    }

    #[tokio::test]
    async fn test_stretched_doubled_letter_terms() {
        let filter = filter(&["asshole", "bullshit"]);
        assert_eq!(
            filter.classify("aasssshhoollee").await,
            Verdict::from_terms(vec!["asshole".to_string()])
        );
        assert_eq!(
            filter.classify("bbuullllsshhiitt").await,
            Verdict::from_terms(vec!["bullshit".to_string()])
        );
    }

    #[tokio::test]
    async fn test_explain() {
        let filter = filter(&["fuck"]);
        let report = filter.explain(" FCK ");
        assert_eq!(report.word, "fck");
        assert!(!report.in_safe);
        assert!(!report.in_prohibited);
        assert_eq!(report.prohibited_size, 1);
        assert_eq!(report.decision.map(|m| m.term), Some("fuck".to_string()));

        let report = filter.explain("classic");
        assert!(report.in_safe);
        assert!(report.decision.is_none());
    }

    #[tokio::test]
    async fn test_batch() {
        let filter = filter(&["fuck"]);
        let results = filter.classify_batch(["hello", "f@ck"]).await;
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0, "hello");
        assert!(!results[0].1.blocked);
        assert!(results[1].1.blocked);
    }

    #[tokio::test]
    async fn test_trait_object() {
        let filter: Arc<dyn Classifier> = Arc::new(filter(&["shit"]));
        assert_eq!(filter.name(), "test");
        let verdicts = filter
            .classify_all(&["all good".to_string(), "sh1t".to_string()])
            .await;
        assert!(!verdicts[0].blocked);
        assert!(verdicts[1].blocked);
    }
}
