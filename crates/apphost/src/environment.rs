//! Standalone deployment
//!
//! Used by the `apphost` binary: components come from the binary itself
//! (and from the plugins directory with the `dynamic-sources` feature),
//! configuration is persisted next to the program data, and restart or
//! shutdown requests end the process loop in `main`.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use apphost_application::{ComponentSource, StaticSource};
use apphost_domain::constants::BUILTIN_SOURCE_NAME;
use apphost_domain::error::{Error, Result};
use apphost_domain::ports::{ConfigurationManager, LogManager, NetworkManager};
use apphost_domain::value_objects::{ApplicationPaths, LogSeverity};
use apphost_infrastructure::HostEnvironment;
use apphost_infrastructure::config::{AppConfig, FileConfigurationManager, HttpConfig};
use apphost_infrastructure::constants::DEFAULT_CONFIG_DIR;
use apphost_infrastructure::error_ext::ErrorContext;
use apphost_infrastructure::logging::{FilterHandle, TracingLogManager, parse_log_level, severity_of};
use apphost_infrastructure::services::DefaultNetworkManager;
use async_trait::async_trait;
use semver::Version;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Environment of the `apphost` binary
pub struct StandaloneEnvironment {
    config: AppConfig,
    config_path: Option<PathBuf>,
    paths: ApplicationPaths,
    log_handle: Option<FilterHandle>,
    shutdown: CancellationToken,
    restart_requested: AtomicBool,
}

impl StandaloneEnvironment {
    /// Environment for `config`
    ///
    /// The program data root is `paths.data_dir`, else the platform's local
    /// data directory. Configuration changes are persisted to `config_path`,
    /// else to the system configuration file under the data root.
    pub fn new(config: AppConfig, config_path: Option<PathBuf>) -> Result<Self> {
        let data_dir = match &config.paths.data_dir {
            Some(dir) => dir.clone(),
            None => dirs::data_local_dir()
                .map(|dir| dir.join(DEFAULT_CONFIG_DIR))
                .ok_or_else(|| Error::configuration("No data directory configured and none found for this platform"))?,
        };
        let mut paths = ApplicationPaths::new(data_dir);
        if let Some(plugins_dir) = &config.paths.plugins_dir {
            paths = paths.with_plugins_path(plugins_dir);
        }

        Ok(Self {
            config,
            config_path,
            paths,
            log_handle: None,
            shutdown: CancellationToken::new(),
            restart_requested: AtomicBool::new(false),
        })
    }

    /// Let the log manager reload the subscriber installed by `init_logging`
    #[must_use]
    pub fn with_log_handle(mut self, handle: FilterHandle) -> Self {
        self.log_handle = Some(handle);
        self
    }

    /// Create every directory of the layout
    pub fn ensure_directories(&self) -> Result<()> {
        for directory in self.paths.directories() {
            std::fs::create_dir_all(directory)
                .io_context(format!("Failed to create {}", directory.display()))?;
        }
        Ok(())
    }

    /// Cancelled when a restart or shutdown is requested
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Whether the process should start again after shutting down
    pub fn restart_requested(&self) -> bool {
        self.restart_requested.load(Ordering::Acquire)
    }

    /// File configuration changes are written to
    pub fn configuration_file_path(&self) -> PathBuf {
        self.config_path
            .clone()
            .unwrap_or_else(|| self.paths.system_configuration_file_path())
    }

    fn initial_severity(&self) -> LogSeverity {
        parse_log_level(&self.config.logging.level).map_or(LogSeverity::Info, severity_of)
    }
}

#[async_trait]
impl HostEnvironment for StandaloneEnvironment {
    fn application_version(&self) -> Version {
        Version::parse(env!("CARGO_PKG_VERSION")).unwrap_or_else(|_| Version::new(0, 0, 0))
    }

    fn application_paths(&self) -> ApplicationPaths {
        self.paths.clone()
    }

    fn component_sources(&self) -> Vec<Arc<dyn ComponentSource>> {
        let mut sources: Vec<Arc<dyn ComponentSource>> =
            vec![Arc::new(StaticSource::named(BUILTIN_SOURCE_NAME))];
        sources.extend(plugin_library_sources(&self.paths.plugins_path));
        sources
    }

    fn create_configuration_manager(
        &self,
        _paths: &ApplicationPaths,
    ) -> Result<Arc<dyn ConfigurationManager>> {
        Ok(Arc::new(FileConfigurationManager::new(
            self.config.clone(),
            self.configuration_file_path(),
        )))
    }

    fn create_network_manager(&self) -> Result<Arc<dyn NetworkManager>> {
        Ok(Arc::new(DefaultNetworkManager::new()))
    }

    fn create_log_manager(&self) -> Result<Arc<dyn LogManager>> {
        let severity = self.initial_severity();
        Ok(match &self.log_handle {
            Some(handle) => Arc::new(TracingLogManager::new(handle.clone(), severity)),
            None => Arc::new(TracingLogManager::detached(severity)),
        })
    }

    fn http_config(&self) -> HttpConfig {
        self.config.http.clone()
    }

    async fn configure_autorun_at_startup(&self, enabled: bool) -> Result<()> {
        info!(enabled, "Autorun at login is managed by the service manager in standalone mode");
        Ok(())
    }

    fn can_self_restart(&self) -> bool {
        true
    }

    async fn restart(&self) -> Result<()> {
        self.restart_requested.store(true, Ordering::Release);
        self.shutdown.cancel();
        Ok(())
    }

    async fn shutdown(&self) -> Result<()> {
        self.shutdown.cancel();
        Ok(())
    }
}

#[cfg(feature = "dynamic-sources")]
fn plugin_library_sources(directory: &Path) -> Vec<Arc<dyn ComponentSource>> {
    use apphost_application::catalog::DynamicLibrarySource;

    match DynamicLibrarySource::scan_directory(directory) {
        Ok(sources) => sources
            .into_iter()
            .map(|source| Arc::new(source) as Arc<dyn ComponentSource>)
            .collect(),
        Err(e) => {
            warn!(directory = %directory.display(), error = %e, "Failed to scan plugins directory");
            Vec::new()
        }
    }
}

#[cfg(not(feature = "dynamic-sources"))]
fn plugin_library_sources(directory: &Path) -> Vec<Arc<dyn ComponentSource>> {
    let has_libraries = std::fs::read_dir(directory).is_ok_and(|entries| {
        entries.flatten().any(|entry| {
            entry.path().extension().and_then(|ext| ext.to_str())
                == Some(std::env::consts::DLL_EXTENSION)
        })
    });
    if has_libraries {
        warn!(
            directory = %directory.display(),
            "Plugin libraries are ignored; build with the dynamic-sources feature to load them"
        );
    }
    Vec::new()
}
