//! Time-bounded verdict cache
//!
//! Keyed by the exact message text. Entries older than the TTL are treated
//! as absent and removed on read. When a write finds the cache full, expired
//! entries are purged first and, if that is not enough, the oldest quarter
//! is evicted.
//!
//! Concurrent classifications of the same message are serialized through a
//! per-key gate so the lookup, compute and store sequence runs once per key.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OwnedMutexGuard;
use tokio::time::Instant;
use wordwarden_core::Verdict;

#[derive(Debug, Clone)]
struct CacheEntry {
    verdict: Verdict,
    created: Instant,
}

/// Per-instance verdict cache
#[derive(Debug)]
pub struct ResultCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    gates: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
    capacity: usize,
    ttl: Duration,
}

impl ResultCache {
    /// Create a new cache
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            gates: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
            ttl,
        }
    }

    /// Fresh verdict for `message`; an expired entry is dropped
    pub fn get(&self, message: &str) -> Option<Verdict> {
        let mut entries = self.entries.lock();
        let expired = match entries.get(message) {
            Some(entry) if entry.created.elapsed() < self.ttl => {
                return Some(entry.verdict.clone());
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.remove(message);
        }
        None
    }

    /// Store a verdict, making room first if the cache is full
    pub fn insert(&self, message: impl Into<String>, verdict: Verdict) {
        let message = message.into();
        let mut entries = self.entries.lock();

        if entries.len() >= self.capacity && !entries.contains_key(&message) {
            let ttl = self.ttl;
            entries.retain(|_, entry| entry.created.elapsed() <= ttl);

            if entries.len() >= self.capacity {
                let evict = (self.capacity / 4).max(1);
                let mut by_age: Vec<(Instant, String)> = entries
                    .iter()
                    .map(|(key, entry)| (entry.created, key.clone()))
                    .collect();
                by_age.sort_unstable();
                for (_, key) in by_age.into_iter().take(evict) {
                    entries.remove(&key);
                }
            }
        }

        entries.insert(
            message,
            CacheEntry {
                verdict,
                created: Instant::now(),
            },
        );
    }

    /// Wait for exclusive use of `message`'s slot
    pub async fn lock_key(&self, message: &str) -> KeyGuard<'_> {
        let gate = {
            let mut gates = self.gates.lock();
            gates
                .entry(message.to_string())
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
                .clone()
        };
        let guard = gate.lock_owned().await;
        KeyGuard {
            cache: self,
            key: message.to_string(),
            guard: Some(guard),
        }
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Number of stored entries, including any not yet purged
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entry lifetime
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn release_gate(&self, key: &str) {
        let mut gates = self.gates.lock();
        if gates.get(key).is_some_and(|gate| Arc::strong_count(gate) == 1) {
            gates.remove(key);
        }
    }
}

/// Exclusive hold on one cache key; released on drop
pub struct KeyGuard<'a> {
    cache: &'a ResultCache,
    key: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for KeyGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        self.cache.release_gate(&self.key);
    }
}
