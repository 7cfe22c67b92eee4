//! Tenant registry
//!
//! One `ProfanityFilter` per tenant, created when the tenant's moderation
//! settings are first loaded and dropped when the tenant is torn down. The
//! base dictionary and confusable table are built once and shared by all.

use crate::config::{FilterConfig, ModerationConfig, TenantConfig};
use crate::confusables::ConfusableTable;
use crate::dictionary::SafeDictionary;
use crate::filter::ProfanityFilter;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;
use wordwarden_core::Result;

/// Registry of per-tenant filters
pub struct TenantFilters {
    config: FilterConfig,
    dictionary: Arc<SafeDictionary>,
    confusables: Arc<ConfusableTable>,
    tenants: RwLock<HashMap<String, Arc<ProfanityFilter>>>,
}

impl TenantFilters {
    /// Create an empty registry using the given filter settings
    pub fn new(config: FilterConfig) -> Result<Self> {
        config.validate()?;
        let dictionary = SafeDictionary::from_config(&config.dictionary)?;
        Ok(Self {
            config,
            dictionary,
            confusables: ConfusableTable::shared(),
            tenants: RwLock::new(HashMap::new()),
        })
    }

    /// Create a registry and every tenant listed in the configuration
    pub fn from_config(config: &ModerationConfig) -> Result<Self> {
        let registry = Self::new(config.filter.clone())?;
        for tenant in &config.tenants {
            registry.insert(tenant)?;
        }
        info!("Tenant registry ready with {} tenants", registry.len());
        Ok(registry)
    }

    /// Create (or replace) a tenant's filter from its settings
    pub fn insert(&self, tenant: &TenantConfig) -> Result<Arc<ProfanityFilter>> {
        let filter = Arc::new(self.build(&tenant.id, &tenant.terms, &tenant.whitelist)?);
        self.tenants
            .write()
            .insert(tenant.id.clone(), Arc::clone(&filter));
        info!(
            "Tenant {} loaded {} prohibited terms",
            tenant.id,
            filter.terms().len()
        );
        Ok(filter)
    }

    /// Existing filter for `tenant_id`, or a new one with no terms
    pub fn get_or_create(&self, tenant_id: &str) -> Result<Arc<ProfanityFilter>> {
        if let Some(filter) = self.get(tenant_id) {
            return Ok(filter);
        }

        let mut tenants = self.tenants.write();
        if let Some(filter) = tenants.get(tenant_id) {
            return Ok(Arc::clone(filter));
        }
        let filter = Arc::new(self.build(tenant_id, &[], &[])?);
        tenants.insert(tenant_id.to_string(), Arc::clone(&filter));
        info!("Created filter for tenant {}", tenant_id);
        Ok(filter)
    }

    /// Filter for `tenant_id`, if present
    pub fn get(&self, tenant_id: &str) -> Option<Arc<ProfanityFilter>> {
        self.tenants.read().get(tenant_id).cloned()
    }

    /// Tear down a tenant; returns its filter if it existed
    pub fn remove(&self, tenant_id: &str) -> Option<Arc<ProfanityFilter>> {
        let removed = self.tenants.write().remove(tenant_id);
        if removed.is_some() {
            info!("Removed filter for tenant {}", tenant_id);
        }
        removed
    }

    /// Registered tenant ids, sorted
    pub fn tenant_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.tenants.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Number of tenants
    pub fn len(&self) -> usize {
        self.tenants.read().len()
    }

    /// Whether no tenants are registered
    pub fn is_empty(&self) -> bool {
        self.tenants.read().is_empty()
    }

    /// Shared base dictionary
    pub fn dictionary(&self) -> &Arc<SafeDictionary> {
        &self.dictionary
    }

    fn build(&self, id: &str, terms: &[String], whitelist: &[String]) -> Result<ProfanityFilter> {
        ProfanityFilter::builder(id)
            .config(self.config.clone())
            .dictionary(Arc::clone(&self.dictionary))
            .confusables(Arc::clone(&self.confusables))
            .terms(terms)
            .whitelist(whitelist)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ModerationConfig {
        ModerationConfig::from_yaml(
            r#"
tenants:
  - id: guild-1
    terms: [fuck]
  - id: guild-2
    terms: [shit]
    whitelist: [shitake]
"#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_tenants_are_isolated() {
        let registry = TenantFilters::from_config(&config()).unwrap();
        assert_eq!(registry.tenant_ids(), vec!["guild-1", "guild-2"]);

        let one = registry.get("guild-1").unwrap();
        let two = registry.get("guild-2").unwrap();
        assert!(one.classify("fuck").await.blocked);
        assert!(!two.classify("fuck").await.blocked);
        assert!(two.classify("shit").await.blocked);
        assert_eq!(two.whitelist(), vec!["shitake"]);
    }

    #[tokio::test]
    async fn test_dictionary_shared() {
        let registry = TenantFilters::from_config(&config()).unwrap();
        let fresh = registry.get_or_create("guild-3").unwrap();
        assert!(fresh.terms().is_empty());
        assert!(Arc::ptr_eq(registry.dictionary(), &SafeDictionary::shared_builtin()));

        let again = registry.get_or_create("guild-3").unwrap();
        assert!(Arc::ptr_eq(&fresh, &again));
    }

    #[tokio::test]
    async fn test_remove_tenant() {
        let registry = TenantFilters::from_config(&config()).unwrap();
        assert!(registry.remove("guild-1").is_some());
        assert!(registry.remove("guild-1").is_none());
        assert!(registry.get("guild-1").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_insert_replaces() {
        let registry = TenantFilters::new(FilterConfig::default()).unwrap();
        assert!(registry.is_empty());

        let mut tenant = TenantConfig::new("guild-9");
        tenant.terms = vec!["damn".to_string()];
        registry.insert(&tenant).unwrap();
        tenant.terms = vec!["crap".to_string()];
        registry.insert(&tenant).unwrap();

        assert_eq!(registry.get("guild-9").unwrap().terms(), vec!["crap"]);
    }
}
