//! Optional feature manager

use std::sync::{Arc, PoisonError, RwLock};

use apphost_domain::ports::{Component, OptionalFeatureManager, OptionalFeatureProvider};
use tracing::info;

/// Keeps the active optional feature providers, one per name
#[derive(Default)]
pub struct DefaultFeatureManager {
    providers: RwLock<Vec<Arc<dyn OptionalFeatureProvider>>>,
}

impl DefaultFeatureManager {
    /// Create an empty manager
    pub fn new() -> Self {
        Self::default()
    }
}

impl Component for DefaultFeatureManager {}

impl OptionalFeatureManager for DefaultFeatureManager {
    fn add_providers(&self, providers: Vec<Arc<dyn OptionalFeatureProvider>>) {
        let mut active = self.providers.write().unwrap_or_else(PoisonError::into_inner);
        for provider in providers {
            active.retain(|existing| existing.name() != provider.name());
            info!(provider = provider.name(), "Optional feature provider active");
            active.push(provider);
        }
    }

    fn providers(&self) -> Vec<Arc<dyn OptionalFeatureProvider>> {
        self.providers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn provider(&self, name: &str) -> Option<Arc<dyn OptionalFeatureProvider>> {
        self.providers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|provider| provider.name() == name)
            .cloned()
    }
}
