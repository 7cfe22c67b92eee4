//! Property tests for normalization and classification

use proptest::prelude::*;
use std::collections::BTreeSet;
use tokio::runtime::Runtime;
use wordwarden_filter::{MessageNormalizer, ProfanityFilter, Verdict};

const TERMS: &[&str] = &["fuck", "shit", "damn", "crap", "ass", "asshole", "bullshit"];

fn runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .expect("Failed to build runtime")
}

fn term_set() -> BTreeSet<String> {
    TERMS.iter().map(|t| t.to_string()).collect()
}

/// A term with every character repeated two to four times
fn stretched_term() -> impl Strategy<Value = (String, String)> {
    (0..TERMS.len(), prop::collection::vec(2usize..=4, 8)).prop_map(|(index, runs)| {
        let term = TERMS[index];
        let variant: String = term
            .chars()
            .zip(runs)
            .map(|(c, n)| c.to_string().repeat(n))
            .collect();
        (term.to_string(), variant)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_normalize_idempotent(text in "[a-zA-Z0-9@$!.* \u{200B}]{0,40}") {
        let normalizer = MessageNormalizer::default();
        let terms = term_set();
        let once = normalizer.normalize(&text, &terms);
        let twice = normalizer.normalize(&once, &terms);
        prop_assert_eq!(once, twice, "input {:?}", text);
    }

    #[test]
    fn prop_normalized_is_lowercase_ascii(text in "\\PC{0,30}") {
        let normalizer = MessageNormalizer::default();
        let out = normalizer.normalize(&text, &term_set());
        prop_assert!(out.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == ' '));
        prop_assert_eq!(out.trim(), out.as_str());
    }

    #[test]
    fn prop_stretched_term_blocks((term, variant) in stretched_term()) {
        let filter = ProfanityFilter::with_terms("prop", TERMS.iter().copied()).unwrap();
        let verdict = runtime().block_on(filter.classify(&variant));
        prop_assert_eq!(verdict, Verdict::from_terms(vec![term]), "variant {:?}", variant);
    }

    #[test]
    fn prop_added_term_blocks_itself(term in "[a-z]{2,8}") {
        let filter = ProfanityFilter::with_terms("prop", Vec::<String>::new()).unwrap();
        filter.add_terms([term.as_str()]);
        let verdict = runtime().block_on(filter.classify(&term));
        prop_assert_eq!(verdict, Verdict::from_terms(vec![term.clone()]));
    }

    #[test]
    fn prop_classify_never_panics(text in "\\PC{0,200}") {
        let filter = ProfanityFilter::with_terms("prop", TERMS.iter().copied()).unwrap();
        let verdict = runtime().block_on(filter.classify(&text));
        prop_assert_eq!(verdict.blocked, !verdict.matched_terms.is_empty());
    }
}
