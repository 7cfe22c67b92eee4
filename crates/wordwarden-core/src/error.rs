//! Error types for WordWarden

/// Result type alias using WordWarden's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for WordWarden operations
///
/// Classification itself never fails; these errors only surface while
/// building filters, loading dictionaries or reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Word list loading errors
    #[error("dictionary error: {0}")]
    Dictionary(String),

    /// Pattern compilation errors
    #[error("pattern error: {0}")]
    Pattern(String),

    /// Filesystem errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML (de)serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_yaml::Error),

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new dictionary error
    pub fn dictionary(msg: impl Into<String>) -> Self {
        Self::Dictionary(msg.into())
    }

    /// Create a new pattern error
    pub fn pattern(msg: impl Into<String>) -> Self {
        Self::Pattern(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::config("missing tenant id").to_string(),
            "configuration error: missing tenant id"
        );
        assert_eq!(
            Error::pattern("unclosed group").to_string(),
            "pattern error: unclosed group"
        );
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "words.txt");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
