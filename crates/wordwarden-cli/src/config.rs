//! CLI configuration loading

use std::path::Path;
use wordwarden_filter::{ModerationConfig, TenantConfig};

/// Command-line overrides applied on top of the configuration file
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    /// Tenant the overrides apply to
    pub tenant: String,

    /// Extra prohibited terms
    pub terms: Vec<String>,

    /// Replacement whitelist, if given
    pub whitelist: Option<Vec<String>>,
}

/// Load configuration from file (defaults if missing) and apply CLI overrides
pub fn load(config_path: &str, overrides: &Overrides) -> anyhow::Result<ModerationConfig> {
    let mut config = if Path::new(config_path).exists() {
        ModerationConfig::from_file(config_path)?
    } else {
        ModerationConfig::default()
    };

    apply(&mut config, overrides);
    Ok(config)
}

fn apply(config: &mut ModerationConfig, overrides: &Overrides) {
    let index = match config.tenants.iter().position(|t| t.id == overrides.tenant) {
        Some(index) => index,
        None => {
            config.tenants.push(TenantConfig::new(overrides.tenant.clone()));
            config.tenants.len() - 1
        }
    };
    let tenant = &mut config.tenants[index];

    tenant.terms.extend(overrides.terms.iter().cloned());
    if let Some(whitelist) = &overrides.whitelist {
        tenant.whitelist = whitelist.clone();
    }
}

/// Split a comma-separated list, dropping blanks
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
