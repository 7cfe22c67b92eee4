//! Cooperative checkpoints
//!
//! Classification can run for a while on long or heavily repeated input.
//! These checkpoints hand control back to the runtime at fixed points so a
//! shared (possibly single-threaded) executor stays responsive. Nothing is
//! awaited except the yield itself.

use crate::config::CheckpointConfig;
use std::sync::atomic::{AtomicU64, Ordering};

/// Yield policy for one filter instance
#[derive(Debug)]
pub struct Checkpoints {
    enabled: bool,
    word_interval: usize,
    raw_token_interval: usize,
    yields: AtomicU64,
}

impl Checkpoints {
    /// Create checkpoints from configuration
    pub fn new(config: &CheckpointConfig) -> Self {
        Self {
            enabled: config.enabled,
            word_interval: config.word_interval.max(1),
            raw_token_interval: config.raw_token_interval.max(1),
            yields: AtomicU64::new(0),
        }
    }

    /// Unconditional checkpoint (before heavy work, before the raw scan)
    pub async fn pause(&self) {
        if self.enabled {
            self.yields.fetch_add(1, Ordering::Relaxed);
            tokio::task::yield_now().await;
        }
    }

    /// Checkpoint at every `word_interval`-th word, starting with the first
    pub async fn word(&self, index: usize) {
        if index % self.word_interval == 0 {
            self.pause().await;
        }
    }

    /// Checkpoint at every `raw_token_interval`-th raw token, starting with the first
    pub async fn raw_token(&self, index: usize) {
        if index % self.raw_token_interval == 0 {
            self.pause().await;
        }
    }

    /// Total yields taken so far
    pub fn yields(&self) -> u64 {
        self.yields.load(Ordering::Relaxed)
    }
}

impl Default for Checkpoints {
    fn default() -> Self {
        Self::new(&CheckpointConfig::default())
    }
}
