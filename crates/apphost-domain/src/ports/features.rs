//! Optional feature ports

use super::lifecycle::Component;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// A discovered component offering an installable, non-essential capability
///
/// Mountable-archive support is the canonical example: the provider may
/// need to download a helper before it can be used.
#[async_trait]
pub trait OptionalFeatureProvider: Component {
    /// Provider name
    fn name(&self) -> &str;

    /// Whether the provider needs an installation step
    fn requires_installation(&self) -> bool;

    /// Whether the installation step already ran
    fn is_installed(&self) -> bool;

    /// Perform the installation step
    async fn install(&self, cancellation: CancellationToken) -> Result<()>;
}

/// Consumes the active optional feature providers
pub trait OptionalFeatureManager: Component {
    /// Add providers to the active set
    fn add_providers(&self, providers: Vec<Arc<dyn OptionalFeatureProvider>>);

    /// All active providers
    fn providers(&self) -> Vec<Arc<dyn OptionalFeatureProvider>>;

    /// Find an active provider by name
    fn provider(&self, name: &str) -> Option<Arc<dyn OptionalFeatureProvider>>;
}
