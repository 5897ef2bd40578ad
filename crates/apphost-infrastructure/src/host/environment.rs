//! Host environment extension points
//!
//! What a concrete deployment supplies to the host: where components come
//! from, how the platform services are built, and how process-level
//! operations (autorun, restart, shutdown, updates) are carried out.

use std::sync::Arc;

use apphost_application::{ComponentSource, ServiceRegistry};
use apphost_domain::error::{Error, Result};
use apphost_domain::ports::{ConfigurationManager, HttpClient, LogManager, NetworkManager};
use apphost_domain::value_objects::{
    ApplicationPaths, CheckForUpdateResult, LogSeverity, PackageVersionInfo,
};
use async_trait::async_trait;
use semver::Version;
use tokio_util::sync::CancellationToken;

use crate::config::HttpConfig;
use crate::logging::TracingLogManager;
use crate::services::HttpClientManager;

/// Deployment-specific behavior of the application host
#[async_trait]
pub trait HostEnvironment: Send + Sync + 'static {
    /// Version of the running application
    fn application_version(&self) -> Version;

    /// Directory layout of this deployment
    fn application_paths(&self) -> ApplicationPaths;

    /// Sources scanned for component types
    fn component_sources(&self) -> Vec<Arc<dyn ComponentSource>>;

    /// Build the platform configuration manager
    fn create_configuration_manager(
        &self,
        paths: &ApplicationPaths,
    ) -> Result<Arc<dyn ConfigurationManager>>;

    /// Build the platform network layer
    fn create_network_manager(&self) -> Result<Arc<dyn NetworkManager>>;

    /// Build the log manager
    ///
    /// Defaults to one that records severity without reloading a subscriber.
    fn create_log_manager(&self) -> Result<Arc<dyn LogManager>> {
        Ok(Arc::new(TracingLogManager::detached(LogSeverity::default())))
    }

    /// HTTP settings for the shared client
    fn http_config(&self) -> HttpConfig {
        HttpConfig::default()
    }

    /// Build the shared HTTP client
    fn create_http_client(&self, config: &HttpConfig) -> Result<Arc<dyn HttpClient>> {
        Ok(Arc::new(HttpClientManager::new(config)?))
    }

    /// Register deployment-specific core services
    ///
    /// Runs last while the host registers its core services; a failure
    /// aborts startup like any other mandatory service.
    fn register_services(&self, _registry: &ServiceRegistry) -> Result<()> {
        Ok(())
    }

    /// Enable or disable starting the application at login
    async fn configure_autorun_at_startup(&self, enabled: bool) -> Result<()>;

    /// Whether the process can restart itself
    fn can_self_restart(&self) -> bool;

    /// Restart the process
    async fn restart(&self) -> Result<()>;

    /// Shut the process down
    async fn shutdown(&self) -> Result<()>;

    /// Whether the application can update itself in place
    fn can_self_update(&self) -> bool {
        false
    }

    /// Look for a newer application version
    async fn check_for_application_update(
        &self,
        _current: &Version,
        _cancellation: CancellationToken,
    ) -> Result<CheckForUpdateResult> {
        Ok(CheckForUpdateResult::up_to_date())
    }

    /// Install an application update
    async fn update_application(
        &self,
        _package: &PackageVersionInfo,
        _cancellation: CancellationToken,
    ) -> Result<()> {
        Err(Error::not_supported("self update"))
    }
}
