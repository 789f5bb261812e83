use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use constant_time_eq::constant_time_eq;

use crate::errors::{DomainError, DomainResult};

use super::VerificationProvider;

/// Catalogue of available providers and the currently active one
///
/// Switching publishes a new `Arc`; readers holding the previous one finish
/// their call with it.
pub struct ProviderRegistry {
    catalogue: HashMap<String, Arc<dyn VerificationProvider>>,
    active: RwLock<Arc<dyn VerificationProvider>>,
    admin_key: String,
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.provider_names())
            .field("active", &self.active_name())
            .finish()
    }
}

impl ProviderRegistry {
    /// Build a registry activating `default_provider`
    ///
    /// An empty `admin_key` disables switching.
    pub fn new(
        providers: Vec<Arc<dyn VerificationProvider>>,
        default_provider: &str,
        admin_key: impl Into<String>,
    ) -> DomainResult<Self> {
        let catalogue: HashMap<String, Arc<dyn VerificationProvider>> = providers
            .into_iter()
            .map(|p| (p.provider_name().to_string(), p))
            .collect();

        let initial = catalogue
            .get(default_provider)
            .cloned()
            .ok_or_else(|| DomainError::InvalidProvider {
                name: default_provider.to_string(),
            })?;

        Ok(Self {
            catalogue,
            active: RwLock::new(initial),
            admin_key: admin_key.into(),
        })
    }

    /// The provider new calls should use
    pub fn active(&self) -> Arc<dyn VerificationProvider> {
        self.active
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn active_name(&self) -> String {
        self.active().provider_name().to_string()
    }

    pub fn provider_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.catalogue.keys().cloned().collect();
        names.sort();
        names
    }

    /// Make `name` the active provider, authorized by `key`
    pub fn activate(&self, name: &str, key: &str) -> DomainResult<String> {
        if self.admin_key.is_empty()
            || !constant_time_eq(self.admin_key.as_bytes(), key.as_bytes())
        {
            tracing::warn!(provider = name, event = "provider_switch_denied", "Unauthorized provider switch");
            return Err(DomainError::Unauthorized);
        }

        let provider = self
            .catalogue
            .get(name)
            .cloned()
            .ok_or_else(|| DomainError::InvalidProvider {
                name: name.to_string(),
            })?;

        let mut active = self
            .active
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let previous = active.provider_name().to_string();
        *active = provider;
        drop(active);

        tracing::info!(
            previous = %previous,
            provider = name,
            event = "provider_switched",
            "Active provider changed"
        );
        Ok(name.to_string())
    }
}
