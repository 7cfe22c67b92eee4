//! Configuration for filter instances and tenants

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use wordwarden_core::{Error, Result};

/// Configuration shared by every filter instance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Verdict cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// Cooperative yield settings
    #[serde(default)]
    pub checkpoints: CheckpointConfig,

    /// Safe-word dictionary sources
    #[serde(default)]
    pub dictionary: DictionaryConfig,
}

impl FilterConfig {
    /// Parse from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Reject settings that would make the filter misbehave
    pub fn validate(&self) -> Result<()> {
        if self.cache.capacity == 0 {
            return Err(Error::config("cache.capacity must be at least 1"));
        }
        if self.cache.ttl_secs == 0 {
            return Err(Error::config("cache.ttl_secs must be at least 1"));
        }
        if self.checkpoints.enabled
            && (self.checkpoints.word_interval == 0 || self.checkpoints.raw_token_interval == 0)
        {
            return Err(Error::config("checkpoint intervals must be at least 1"));
        }
        Ok(())
    }
}

/// Verdict cache settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum cached verdicts per instance
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,

    /// Verdict lifetime in seconds
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,

    /// Clear the cache whenever terms or the whitelist change
    #[serde(default = "default_true")]
    pub invalidate_on_update: bool,
}

impl CacheConfig {
    /// Verdict lifetime
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_cache_capacity(),
            ttl_secs: default_cache_ttl_secs(),
            invalidate_on_update: true,
        }
    }
}

/// Cooperative yield settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointConfig {
    /// Yield to the runtime during classification
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Yield every N words of the normalized message
    #[serde(default = "default_word_interval")]
    pub word_interval: usize,

    /// Yield every N raw tokens
    #[serde(default = "default_raw_token_interval")]
    pub raw_token_interval: usize,
}

impl Default for CheckpointConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            word_interval: default_word_interval(),
            raw_token_interval: default_raw_token_interval(),
        }
    }
}

/// Safe-word dictionary sources
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictionaryConfig {
    /// Include the bundled English word list and common safe words
    #[serde(default = "default_true")]
    pub builtin: bool,

    /// Extra newline-separated word lists
    #[serde(default)]
    pub extra_paths: Vec<PathBuf>,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            builtin: true,
            extra_paths: Vec::new(),
        }
    }
}

/// Per-tenant moderation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenantConfig {
    /// Unique tenant identifier
    pub id: String,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Prohibited terms
    #[serde(default)]
    pub terms: Vec<String>,

    /// Tenant-specific safe words
    #[serde(default)]
    pub whitelist: Vec<String>,
}

impl TenantConfig {
    /// Create a tenant with no terms
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            terms: Vec::new(),
            whitelist: Vec::new(),
        }
    }
}

/// Top-level configuration: shared filter settings plus tenants
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModerationConfig {
    /// Settings applied to every tenant's filter
    #[serde(default)]
    pub filter: FilterConfig,

    /// Tenants created up front
    #[serde(default)]
    pub tenants: Vec<TenantConfig>,
}

impl ModerationConfig {
    /// Parse from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.filter.validate()?;

        let mut seen = std::collections::HashSet::new();
        for tenant in &config.tenants {
            if tenant.id.trim().is_empty() {
                return Err(Error::config("tenant id must not be empty"));
            }
            if !seen.insert(tenant.id.as_str()) {
                return Err(Error::config(format!("duplicate tenant id '{}'", tenant.id)));
            }
        }

        Ok(config)
    }

    /// Load from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Look up a tenant by id
    pub fn tenant(&self, id: &str) -> Option<&TenantConfig> {
        self.tenants.iter().find(|t| t.id == id)
    }
}

fn default_cache_capacity() -> usize {
    500
}

fn default_cache_ttl_secs() -> u64 {
    300
}

fn default_word_interval() -> usize {
    10
}

fn default_raw_token_interval() -> usize {
    5
}

fn default_true() -> bool {
    true
}
