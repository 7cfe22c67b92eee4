//! Safe-word dictionary
//!
//! The base set of legitimate words that are never classified as prohibited
//! on their own, however much they resemble a term ("classic", "cocktail").
//! Built once per process and shared by every tenant; tenant whitelists are
//! layered on top by the term store.

use crate::config::DictionaryConfig;
use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, OnceLock};
use tracing::info;
use wordwarden_core::{Error, Result};

/// Bundled English word list, one lowercase word per line
const BUNDLED_WORDS: &str = include_str!("../data/english_words.txt");

/// Legitimate words and place names that contain prohibited substrings
pub const COMMON_SAFE_WORDS: &[&str] = &[
    "penistone", "lightwater", "cockburn", "mianus", "hello", "tatsuki", "cumming",
    "clitheroe", "twatt", "fanny", "assington", "bitchfield", "titcomb", "rape",
    "shitterton", "prickwillow", "scunthorpe", "whale", "beaver", "cocktail", "passage",
    "classic", "grassland", "bassist", "butterfly", "shipment", "shooting", "language",
    "counting", "cluster", "glassware", "testes", "scrotum", "vaginal", "urethra",
    "mastectomy", "vasectomy", "nucleus", "molecular", "pascal", "vascular", "fascial",
    "cockermouth", "cockbridge",
];

/// Set of words that are always considered legitimate
#[derive(Debug, Clone, Default)]
pub struct SafeDictionary {
    words: HashSet<String>,
}

impl SafeDictionary {
    /// Create an empty dictionary
    pub fn empty() -> Self {
        Self::default()
    }

    /// Bundled word list plus the common safe words
    pub fn builtin() -> Self {
        let mut dictionary = Self::empty();
        dictionary.extend_from_str(BUNDLED_WORDS);
        dictionary.extend(COMMON_SAFE_WORDS.iter().copied());
        dictionary
    }

    /// Process-wide built-in dictionary, built on first use
    pub fn shared_builtin() -> Arc<SafeDictionary> {
        static SHARED: OnceLock<Arc<SafeDictionary>> = OnceLock::new();
        SHARED
            .get_or_init(|| {
                let dictionary = SafeDictionary::builtin();
                info!("Loaded {} built-in safe words", dictionary.len());
                Arc::new(dictionary)
            })
            .clone()
    }

    /// Build from configuration: optional built-in list plus extra files
    pub fn from_config(config: &DictionaryConfig) -> Result<Arc<Self>> {
        if config.extra_paths.is_empty() {
            return Ok(if config.builtin {
                Self::shared_builtin()
            } else {
                Arc::new(Self::empty())
            });
        }

        let mut dictionary = if config.builtin {
            Self::builtin()
        } else {
            Self::empty()
        };
        for path in &config.extra_paths {
            let added = dictionary.load_file(path)?;
            info!("Loaded {} safe words from {}", added, path.display());
        }
        Ok(Arc::new(dictionary))
    }

    /// Build from an explicit word list
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut dictionary = Self::empty();
        dictionary.extend(words);
        dictionary
    }

    /// Add words; returns how many were new
    pub fn extend<I, S>(&mut self, words: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        words
            .into_iter()
            .filter_map(|w| canonical_word(w.as_ref()))
            .filter(|w| self.words.insert(w.clone()))
            .count()
    }

    /// Add one word per line; blank lines and `#` comments are skipped
    pub fn extend_from_str(&mut self, text: &str) -> usize {
        self.extend(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        )
    }

    /// Add words from a newline-separated file
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::dictionary(format!("Failed to read word list {}: {}", path.display(), e))
        })?;
        Ok(self.extend_from_str(&content))
    }

    /// Whether the word is a known safe word
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// Number of words
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the dictionary is empty
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Lowercase alphabetic words of at least two letters
fn canonical_word(raw: &str) -> Option<String> {
    let word = raw.trim().to_lowercase();
    (word.chars().count() >= 2 && word.chars().all(char::is_alphabetic)).then_some(word)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_contains_common_words() {
        let dictionary = SafeDictionary::shared_builtin();
        for word in ["hello", "class", "classic", "was", "there", "cocktail", "scunthorpe"] {
            assert!(dictionary.contains(word), "missing {}", word);
        }
        for word in ["fuck", "shit", "fcuk", "ass"] {
            assert!(!dictionary.contains(word), "unexpected {}", word);
        }
    }

    #[test]
    fn test_canonical_words_only() {
        let dictionary = SafeDictionary::from_words(["Apple", " pear ", "a", "x1", "", "naïve"]);
        assert!(dictionary.contains("apple"));
        assert!(dictionary.contains("pear"));
        assert!(dictionary.contains("naïve"));
        assert!(!dictionary.contains("a"));
        assert!(!dictionary.contains("x1"));
        assert_eq!(dictionary.len(), 3);
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# local words\nwarhammer\n\nskaven").unwrap();

        let mut dictionary = SafeDictionary::empty();
        assert_eq!(dictionary.load_file(file.path()).unwrap(), 2);
        assert!(dictionary.contains("skaven"));

        let err = dictionary.load_file("/nonexistent/words.txt").unwrap_err();
        assert!(matches!(err, Error::Dictionary(_)));
    }

    #[test]
    fn test_from_config() {
        let config = DictionaryConfig {
            builtin: false,
            extra_paths: Vec::new(),
        };
        assert!(SafeDictionary::from_config(&config).unwrap().is_empty());

        let default = SafeDictionary::from_config(&DictionaryConfig::default()).unwrap();
        assert!(Arc::ptr_eq(&default, &SafeDictionary::shared_builtin()));
    }
}
