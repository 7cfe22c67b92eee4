//! Candidate generation
//!
//! One message is examined in several shapes, because different evasions
//! only show up in different ones:
//!
//! - words of the normalized message (morphology, near misses)
//! - the normalized message with all spaces squeezed out (split words)
//! - each raw token folded through the confusable table on its own
//!   (mixed-script single words)
//! - the raw message reduced to its alphanumerics (symbol-separated letters)

use crate::confusables::ConfusableTable;

/// Squeezed and distributed forms shorter than this are ignored
pub const MIN_JOINED_LEN: usize = 3;

/// Raw tokens shorter than this (after folding) are ignored
pub const MIN_RAW_TOKEN_LEN: usize = 3;

/// Whitespace-separated words of a normalized message
pub fn words(normalized: &str) -> Vec<&str> {
    normalized.split_whitespace().collect()
}

/// The normalized message with whitespace removed
pub fn squeezed(normalized: &str) -> String {
    normalized.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Raw whitespace-delimited tokens of the original message
pub fn raw_tokens(message: &str) -> impl Iterator<Item = &str> {
    message.split_whitespace()
}

/// Fold one raw token to canonical bases and keep only ASCII alphanumerics
pub fn fold_raw_token(token: &str, confusables: &ConfusableTable) -> String {
    confusables
        .to_base(&token.to_lowercase())
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect()
}

/// The lowercased original message reduced to ASCII alphanumerics
pub fn distributed(message: &str) -> String {
    message
        .to_lowercase()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words_and_squeezed() {
        assert_eq!(words("you are a b"), vec!["you", "are", "a", "b"]);
        assert_eq!(squeezed("fu ck you"), "fuckyou");
        assert!(words("").is_empty());
    }

    #[test]
    fn test_raw_token_folding() {
        let table = ConfusableTable::shared();
        assert_eq!(fold_raw_token("$h!t", &table), "shit");
        assert_eq!(fold_raw_token("sh!t!", &table), "shiti");
        assert_eq!(fold_raw_token("ＦＵＣＫ", &table), "fuck");
        assert_eq!(fold_raw_token("ѕһіt", &table), "shit");
        assert_eq!(fold_raw_token("...", &table), "");
        let tokens: Vec<&str> = raw_tokens("  a\tb \n c ").collect();
        assert_eq!(tokens, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_distributed() {
        assert_eq!(distributed("F.u.C.k"), "fuck");
        assert_eq!(distributed("s-h-i-t 2day"), "shit2day");
    }
}
