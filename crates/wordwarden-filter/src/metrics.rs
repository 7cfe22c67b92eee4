//! Per-instance statistics
//!
//! In-process counters for one filter instance, plus emission through the
//! `metrics` facade so an installed recorder (e.g. Prometheus) sees the same
//! events labelled by tenant.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use wordwarden_core::MatchRule;

/// Statistics collector for one filter instance
#[derive(Clone)]
pub struct FilterStats {
    inner: Arc<StatsInner>,
}

struct StatsInner {
    tenant: String,
    calls: AtomicU64,
    cache_hits: AtomicU64,
    blocked: AtomicU64,
    total_latency_us: AtomicU64,
}

impl FilterStats {
    /// Create a new collector labelled with the tenant id
    pub fn new(tenant: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(StatsInner {
                tenant: tenant.into(),
                calls: AtomicU64::new(0),
                cache_hits: AtomicU64::new(0),
                blocked: AtomicU64::new(0),
                total_latency_us: AtomicU64::new(0),
            }),
        }
    }

    /// Record a classify call
    pub fn record_call(&self) {
        self.inner.calls.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a verdict served from the cache
    pub fn record_cache_hit(&self) {
        self.inner.cache_hits.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("wordwarden_cache_hits_total", "tenant" => self.inner.tenant.clone())
            .increment(1);
    }

    /// Record a freshly computed verdict
    pub fn record_verdict(&self, blocked: bool, latency_us: u64) {
        if blocked {
            self.inner.blocked.fetch_add(1, Ordering::Relaxed);
        }
        self.inner
            .total_latency_us
            .fetch_add(latency_us, Ordering::Relaxed);

        let outcome = if blocked { "blocked" } else { "allowed" };
        metrics::counter!(
            "wordwarden_messages_total",
            "tenant" => self.inner.tenant.clone(),
            "outcome" => outcome
        )
        .increment(1);
        metrics::histogram!("wordwarden_classify_latency_us", "tenant" => self.inner.tenant.clone())
            .record(latency_us as f64);
    }

    /// Record a candidate blocked by a rule
    pub fn record_match(&self, rule: MatchRule) {
        metrics::counter!(
            "wordwarden_terms_matched_total",
            "tenant" => self.inner.tenant.clone(),
            "rule" => rule.as_str()
        )
        .increment(1);
    }

    /// Get current statistics snapshot
    pub fn snapshot(&self, yields: u64) -> StatsSnapshot {
        StatsSnapshot {
            calls: self.inner.calls.load(Ordering::Relaxed),
            cache_hits: self.inner.cache_hits.load(Ordering::Relaxed),
            blocked: self.inner.blocked.load(Ordering::Relaxed),
            yields,
            total_latency_us: self.inner.total_latency_us.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of an instance's counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub calls: u64,
    pub cache_hits: u64,
    pub blocked: u64,
    pub yields: u64,
    pub total_latency_us: u64,
}

impl StatsSnapshot {
    /// Calls that ran the full pipeline
    pub fn computed(&self) -> u64 {
        self.calls.saturating_sub(self.cache_hits)
    }

    /// Share of calls answered from the cache
    pub fn hit_rate(&self) -> f64 {
        if self.calls == 0 {
            0.0
        } else {
            self.cache_hits as f64 / self.calls as f64
        }
    }

    /// Average latency of computed verdicts
    pub fn avg_latency_us(&self) -> u64 {
        match self.computed() {
            0 => 0,
            n => self.total_latency_us / n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_collection() {
        let stats = FilterStats::new("guild-1");

        stats.record_call();
        stats.record_verdict(true, 400);
        stats.record_call();
        stats.record_cache_hit();
        stats.record_match(MatchRule::Fuzzy);

        let snapshot = stats.snapshot(2);
        assert_eq!(snapshot.calls, 2);
        assert_eq!(snapshot.cache_hits, 1);
        assert_eq!(snapshot.blocked, 1);
        assert_eq!(snapshot.yields, 2);
        assert_eq!(snapshot.computed(), 1);
        assert_eq!(snapshot.avg_latency_us(), 400);
        assert!((snapshot.hit_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = FilterStats::new("t").snapshot(0);
        assert_eq!(snapshot.hit_rate(), 0.0);
        assert_eq!(snapshot.avg_latency_us(), 0);
    }
}
