//! Latency benchmarks for message classification
//!
//! Cost should stay roughly linear in message length; the expansion and
//! fuzzy caps keep adversarial input from blowing up.
//!
//! Run with: cargo bench -p wordwarden-filter

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::runtime::Runtime;

use wordwarden_filter::{FilterConfig, MessageNormalizer, ProfanityFilter};

const TERMS: &[&str] = &[
    "fuck", "shit", "damn", "crap", "ass", "hell", "bitch", "bastard", "dick", "cunt",
];

fn filter() -> ProfanityFilter {
    let config = FilterConfig::from_yaml("checkpoints:\n  enabled: false\n")
        .expect("Failed to parse config");
    ProfanityFilter::builder("bench")
        .config(config)
        .terms(TERMS.iter().copied())
        .build()
        .expect("Failed to create filter")
}

/// Cache-miss classification at increasing message lengths
fn benchmark_classify_by_length(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let filter = filter();
    let counter = AtomicU64::new(0);

    let sentence = "the quick brown fox jumps over the lazy dog and ";
    let mut group = c.benchmark_group("Classify_Miss_By_Length");
    group.sample_size(50);

    for len in [50usize, 100, 250, 500] {
        let message: String = sentence.repeat(len / sentence.len() + 1).chars().take(len).collect();
        group.bench_with_input(BenchmarkId::new("clean", len), &message, |b, message| {
            b.iter(|| {
                // unique suffix so every iteration misses the cache
                let n = counter.fetch_add(1, Ordering::Relaxed);
                let text = format!("{message} {n}");
                rt.block_on(async { filter.classify(black_box(&text)).await })
            });
        });
    }

    group.finish();
}

/// Adversarial inputs that exercise every rule
fn benchmark_adversarial(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let filter = filter();
    let counter = AtomicU64::new(0);

    let test_cases = vec![
        ("stretched", "shiiiiiiiiiiit ".repeat(30)),
        ("spaced", "f u c k ".repeat(60)),
        ("leet", "5h1t f@ck $h!t 4ss ".repeat(25)),
        ("zero_width", "f\u{200B}u\u{200B}c\u{200B}k ".repeat(50)),
        ("symbols", "@#$%^&*!1457 ".repeat(40)),
    ];

    let mut group = c.benchmark_group("Classify_Adversarial");
    group.sample_size(50);

    for (name, message) in test_cases {
        group.bench_with_input(BenchmarkId::new("classify", name), &message, |b, message| {
            b.iter(|| {
                let n = counter.fetch_add(1, Ordering::Relaxed);
                let text = format!("{message}{n}");
                rt.block_on(async { filter.classify(black_box(&text)).await })
            });
        });
    }

    group.finish();
}

/// Repeated message served from the verdict cache
fn benchmark_cache_hit(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let filter = filter();
    let message = "you absolute sh1tty f@cking b1tch";
    rt.block_on(filter.classify(message));

    c.bench_function("classify_cache_hit", |b| {
        b.iter(|| rt.block_on(async { filter.classify(black_box(message)).await }));
    });
}

/// Normalization alone
fn benchmark_normalize(c: &mut Criterion) {
    let normalizer = MessageNormalizer::default();
    let terms: BTreeSet<String> = TERMS.iter().map(|t| t.to_string()).collect();
    let message = "Ｈｅｌｌｏ  s h i t  shiiiit  f\u{200B}ck  ".repeat(10);

    c.bench_function("normalize_500_chars", |b| {
        b.iter(|| normalizer.normalize(black_box(&message), &terms));
    });
}

/// Batch of mixed messages
fn benchmark_batch(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let filter = filter();
    let batch: Vec<String> = (0..20)
        .map(|i| match i % 4 {
            0 => format!("hello there friend {i}"),
            1 => format!("what the f@ck {i}"),
            2 => format!("that was a great class {i}"),
            _ => format!("s h i t {i}"),
        })
        .collect();

    c.bench_function("classify_batch_20", |b| {
        b.iter(|| {
            filter.clear_cache();
            rt.block_on(filter.classify_batch(black_box(batch.clone())))
        });
    });
}

criterion_group!(
    benches,
    benchmark_classify_by_length,
    benchmark_adversarial,
    benchmark_cache_hit,
    benchmark_normalize,
    benchmark_batch,
);

criterion_main!(benches);
