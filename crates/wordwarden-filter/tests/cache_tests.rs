//! Verdict cache behaviour observed through the filter

use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use wordwarden_filter::{FilterConfig, ProfanityFilter};

fn filter(config: FilterConfig) -> ProfanityFilter {
    ProfanityFilter::builder("cache")
        .config(config)
        .terms(["fuck", "shit"])
        .build()
        .expect("Failed to build filter")
}

#[tokio::test(start_paused = true)]
async fn test_second_call_served_from_cache() {
    let filter = filter(FilterConfig::default());

    let first = filter.classify("f@ck off").await;
    let second = filter.classify("f@ck off").await;
    assert_eq!(first, second);

    let stats = filter.stats();
    assert_eq!(stats.calls, 2);
    assert_eq!(stats.cache_hits, 1);
    assert_eq!(stats.computed(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_expired_verdict_recomputed() {
    let filter = filter(FilterConfig::default());

    filter.classify("what the shit").await;
    tokio::time::advance(Duration::from_secs(299)).await;
    filter.classify("what the shit").await;
    assert_eq!(filter.stats().cache_hits, 1);

    tokio::time::advance(Duration::from_secs(2)).await;
    let verdict = filter.classify("what the shit").await;
    assert!(verdict.blocked);

    let stats = filter.stats();
    assert_eq!(stats.cache_hits, 1);
    assert_eq!(stats.computed(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_ttl_from_config() {
    let config = FilterConfig::from_yaml("cache:\n  ttl_secs: 5\n").unwrap();
    let filter = filter(config);

    filter.classify("hello").await;
    tokio::time::advance(Duration::from_secs(6)).await;
    filter.classify("hello").await;
    assert_eq!(filter.stats().cache_hits, 0);
}

#[tokio::test]
async fn test_cache_keyed_by_exact_text() {
    let filter = filter(FilterConfig::default());
    filter.classify("Shit").await;
    filter.classify("shit").await;
    filter.classify("shit ").await;
    assert_eq!(filter.stats().cache_hits, 0);
    assert_eq!(filter.cache_len(), 3);
}

#[tokio::test]
async fn test_concurrent_same_message_computed_once() {
    let filter = Arc::new(filter(FilterConfig::default()));

    let calls = (0..8).map(|_| {
        let filter = Arc::clone(&filter);
        async move { filter.classify("you piece of sh1t").await }
    });
    let verdicts = join_all(calls).await;

    assert!(verdicts.iter().all(|v| v.blocked));
    assert!(verdicts.windows(2).all(|pair| pair[0] == pair[1]));

    let stats = filter.stats();
    assert_eq!(stats.calls, 8);
    assert_eq!(stats.computed(), 1);
    assert_eq!(stats.cache_hits, 7);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_distinct_messages() {
    let filter = Arc::new(filter(FilterConfig::default()));

    let handles: Vec<_> = (0..32)
        .map(|i| {
            let filter = Arc::clone(&filter);
            tokio::spawn(async move { filter.classify(&format!("message number {i}")).await })
        })
        .collect();

    for handle in handles {
        assert!(!handle.await.unwrap().blocked);
    }
    assert_eq!(filter.stats().computed(), 32);
    assert_eq!(filter.cache_len(), 32);
}

#[tokio::test]
async fn test_capacity_bounded() {
    let config = FilterConfig::from_yaml("cache:\n  capacity: 8\n").unwrap();
    let filter = filter(config);

    for i in 0..50 {
        filter.classify(&format!("chat line {i}")).await;
    }
    assert!(filter.cache_len() <= 8);
}

#[tokio::test]
async fn test_term_update_invalidates_cache() {
    let filter = filter(FilterConfig::default());
    assert!(!filter.classify("damn").await.blocked);

    filter.add_terms(["damn"]);
    assert_eq!(filter.cache_len(), 0);
    assert!(filter.classify("damn").await.blocked);
}

#[tokio::test]
async fn test_stale_verdict_without_invalidation() {
    let config = FilterConfig::from_yaml("cache:\n  invalidate_on_update: false\n").unwrap();
    let filter = filter(config);
    assert!(!filter.classify("damn").await.blocked);

    filter.add_terms(["damn"]);
    assert!(!filter.classify("damn").await.blocked);

    filter.clear_cache();
    assert!(filter.classify("damn").await.blocked);
}
