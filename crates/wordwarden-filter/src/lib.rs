//! WordWarden Filter
//!
//! Evasion-resistant prohibited-term classification for chat messages.
//!
//! A message is normalized (compatibility folding, hidden separator removal,
//! homoglyph and repetition reduction, spaced-letter joining), split into
//! candidates, and each candidate is checked against the tenant's prohibited
//! terms with an ordered set of rules:
//! - direct match, gated by context patterns
//! - bounded edit distance
//! - morphological variants (suffixes and prefixes)
//! - short abbreviations
//! - transpositions
//! - confusable-character expansion
//! - letter repetition
//!
//! Known-safe words short-circuit matching. Verdicts are cached per message
//! for a bounded time, and classification yields to the runtime at regular
//! checkpoints so large messages do not starve other tasks.

pub mod cache;
pub mod candidates;
pub mod classifier;
pub mod config;
pub mod confusables;
pub mod dictionary;
pub mod filter;
pub mod fuzzy;
pub mod matcher;
pub mod metrics;
pub mod normalize;
pub mod registry;
pub mod repetition;
pub mod rules;
pub mod scheduler;
pub mod terms;

pub use classifier::Classifier;
pub use config::{
    CacheConfig, CheckpointConfig, DictionaryConfig, FilterConfig, ModerationConfig, TenantConfig,
};
pub use confusables::ConfusableTable;
pub use dictionary::SafeDictionary;
pub use filter::{FilterBuilder, ProfanityFilter, WordReport};
pub use metrics::StatsSnapshot;
pub use normalize::MessageNormalizer;
pub use registry::TenantFilters;
pub use wordwarden_core::{Error, MatchRule, Result, TermMatch, Verdict};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::classifier::Classifier;
    pub use crate::config::{FilterConfig, ModerationConfig, TenantConfig};
    pub use crate::filter::{FilterBuilder, ProfanityFilter};
    pub use crate::registry::TenantFilters;
    pub use wordwarden_core::{MatchRule, TermMatch, Verdict};
}
