//! WordWarden Core
//!
//! Types and error handling shared across WordWarden components.
//!
//! This crate provides:
//! - The message-level `Verdict` returned by every classification
//! - `TermMatch` / `MatchRule` describing why a single token was blocked
//! - Error types and result handling

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{MatchRule, TermMatch, Verdict};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{MatchRule, TermMatch, Verdict};
}
