//! Startup orchestrator
//!
//! [`AppHost`] drives discovery and composition:
//!
//! 1. **LoadingTypes** builds the configuration manager, derives first-run
//!    and log severity from it, then runs one discovery pass over the
//!    environment's component sources. Source failures are recorded only.
//! 2. **RegisteringCore** registers the mandatory singletons. Any failure
//!    here aborts startup.
//! 3. **DiscoveringPlugins** exports every plugin; broken plugins are
//!    dropped from the published list.
//! 4. **InstallingOptionalFeatures** exports the optional feature providers,
//!    installs the ones that need it and hands the survivors to the
//!    optional feature manager.
//! 5. **Ready** freezes the registry.
//!
//! Scheduled tasks start later, when the embedder calls
//! [`AppHost::run_startup_tasks`].

use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use apphost_application::{
    ComponentExporter, ConstructionFailure, DisposalReport, LifetimeManager, ServiceRegistry,
    TypeCatalog, TypeDescriptor, panic_message,
};
use apphost_domain::error::{Error, Result};
use apphost_domain::events::HostEvent;
use apphost_domain::ports::lifecycle::instance_id;
use apphost_domain::ports::{
    ApplicationHost, ArchiveClient, Component, ConfigurationManager, Disposable, HttpClient,
    InstallationManager, LogManager, NetworkManager, OptionalFeatureManager,
    OptionalFeatureProvider, Plugin, ScheduledTask, SecurityManager, TaskManager,
};
use apphost_domain::value_objects::{
    ApplicationPaths, CheckForUpdateResult, HostState, LogSeverity, PackageVersionInfo,
};
use arc_swap::ArcSwap;
use async_trait::async_trait;
use futures::FutureExt;
use semver::Version;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, mpsc, watch};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, warn};

use super::environment::HostEnvironment;
use super::notifier::RestartNotifier;
use crate::services::{
    DefaultFeatureManager, DefaultInstallationManager, DefaultTaskManager, PluginSecurityManager,
    TarGzArchiver,
};
use crate::utils::TimedOperation;

/// Outcome of the optional feature stage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureInstallReport {
    /// Providers that constructed successfully
    pub discovered: Vec<String>,
    /// Providers handed to the optional feature manager
    pub active: Vec<String>,
    /// Providers whose installation failed
    pub failed: Vec<String>,
    /// Providers whose installation was skipped after cancellation
    pub skipped: Vec<String>,
}

/// Services built while loading types and registered afterwards
struct CoreSeeds {
    paths: ApplicationPaths,
    configuration: Arc<dyn ConfigurationManager>,
    log_manager: Arc<dyn LogManager>,
}

/// The process-wide application host
pub struct AppHost {
    me: Weak<AppHost>,
    environment: Arc<dyn HostEnvironment>,
    version: Version,
    catalog: Arc<TypeCatalog>,
    registry: Arc<ServiceRegistry>,
    lifetimes: Arc<LifetimeManager>,
    exporter: ComponentExporter,
    state: watch::Sender<HostState>,
    notifier: RestartNotifier,
    plugins: ArcSwap<Vec<Arc<dyn Plugin>>>,
    plugin_failures: ArcSwap<Vec<ConstructionFailure>>,
    features: ArcSwap<FeatureInstallReport>,
    is_first_run: AtomicBool,
    background: TaskTracker,
    shutdown: CancellationToken,
}

impl AppHost {
    /// Create an uninitialized host for `environment`
    pub fn new(environment: Arc<dyn HostEnvironment>) -> Arc<Self> {
        Arc::new_cyclic(|me| {
            let lifetimes = Arc::new(LifetimeManager::new());
            let registry = Arc::new(ServiceRegistry::new(Arc::clone(&lifetimes)));
            let catalog = Arc::new(TypeCatalog::new());
            let exporter = ComponentExporter::new(Arc::clone(&catalog), Arc::clone(&registry));
            let (state, _) = watch::channel(HostState::Uninitialized);
            Self {
                me: me.clone(),
                version: environment.application_version(),
                environment,
                catalog,
                registry,
                lifetimes,
                exporter,
                state,
                notifier: RestartNotifier::new(),
                plugins: ArcSwap::from_pointee(Vec::new()),
                plugin_failures: ArcSwap::from_pointee(Vec::new()),
                features: ArcSwap::from_pointee(FeatureInstallReport::default()),
                is_first_run: AtomicBool::new(false),
                background: TaskTracker::new(),
                shutdown: CancellationToken::new(),
            }
        })
    }

    /// Run every startup stage up to `Ready`
    pub async fn init(&self) -> Result<()> {
        self.init_with_cancellation(CancellationToken::new()).await
    }

    /// Run every startup stage up to `Ready`, cancelling optional installs on `cancellation`
    pub async fn init_with_cancellation(&self, cancellation: CancellationToken) -> Result<()> {
        let timer = TimedOperation::start();
        let result = self.run_startup_stages(cancellation).await;
        match &result {
            Ok(()) => info!(
                version = %self.version,
                plugins = self.plugins.load().len(),
                elapsed_ms = timer.elapsed_ms(),
                "Application host ready"
            ),
            Err(e) => error!(state = %self.current_state(), error = %e, "Application host failed to start"),
        }
        result
    }

    async fn run_startup_stages(&self, cancellation: CancellationToken) -> Result<()> {
        self.transition(HostState::LoadingTypes)?;
        let stage = TimedOperation::start();
        let seeds = self.load_types()?;
        debug!(elapsed_ms = stage.elapsed_ms(), "Types loaded");

        self.transition(HostState::RegisteringCore)?;
        let stage = TimedOperation::start();
        self.register_core_services(seeds)?;
        debug!(elapsed_ms = stage.elapsed_ms(), services = self.registry.len(), "Core services registered");

        self.transition(HostState::DiscoveringPlugins)?;
        let stage = TimedOperation::start();
        self.discover_plugins();
        debug!(elapsed_ms = stage.elapsed_ms(), "Plugins discovered");

        self.transition(HostState::InstallingOptionalFeatures)?;
        let stage = TimedOperation::start();
        self.install_optional_features(cancellation).await?;
        debug!(elapsed_ms = stage.elapsed_ms(), "Optional features installed");

        self.registry.freeze();
        self.transition(HostState::Ready)?;
        Ok(())
    }

    fn load_types(&self) -> Result<CoreSeeds> {
        let paths = self.environment.application_paths();
        let configuration = self
            .environment
            .create_configuration_manager(&paths)
            .map_err(|e| Error::mandatory_service("ConfigurationManager", e))?;
        let common = configuration.common_configuration();
        self.is_first_run
            .store(!common.is_startup_wizard_completed, Ordering::Release);

        let log_manager = self
            .environment
            .create_log_manager()
            .map_err(|e| Error::mandatory_service("LogManager", e))?;
        if let Err(e) =
            log_manager.set_severity(LogSeverity::from_debug_flag(common.enable_debug_level_logging))
        {
            warn!(error = %e, "Failed to apply configured log severity");
        }

        let sources = self.environment.component_sources();
        let types = self.catalog.discover(&sources);
        info!(
            version = %self.version,
            sources = sources.len(),
            types = types.all_types().len(),
            concrete = types.concrete_types().len(),
            failed_sources = types.failed_sources().len(),
            "Component types loaded"
        );

        Ok(CoreSeeds {
            paths,
            configuration,
            log_manager,
        })
    }

    fn register_core_services(&self, seeds: CoreSeeds) -> Result<()> {
        let CoreSeeds {
            paths,
            configuration,
            log_manager,
        } = seeds;
        let host: Arc<dyn ApplicationHost> = self.shared()?;

        self.register_core::<dyn ConfigurationManager, _>("ConfigurationManager", || {
            Ok(Arc::clone(&configuration))
        })?;

        self.lifetimes.exclude(&host);
        self.registry
            .register_singleton(Arc::clone(&host), false)
            .map_err(|e| Error::mandatory_service("ApplicationHost", e))?;
        self.registry
            .register_instance(Arc::new(paths))
            .map_err(|e| Error::mandatory_service("ApplicationPaths", e))?;

        self.register_core::<dyn LogManager, _>("LogManager", || Ok(log_manager))?;
        self.register_core::<dyn TaskManager, _>("TaskManager", || {
            Ok(Arc::new(DefaultTaskManager::new()))
        })?;
        self.register_core::<dyn HttpClient, _>("HttpClient", || {
            self.environment
                .create_http_client(&self.environment.http_config())
        })?;
        self.register_core::<dyn NetworkManager, _>("NetworkManager", || {
            self.environment.create_network_manager()
        })?;
        self.register_core::<dyn SecurityManager, _>("SecurityManager", || {
            Ok(Arc::new(PluginSecurityManager::new(Arc::clone(&configuration))))
        })?;
        self.register_core::<dyn InstallationManager, _>("InstallationManager", || {
            Ok(Arc::new(DefaultInstallationManager::new(Arc::downgrade(&host))))
        })?;
        self.register_core::<dyn ArchiveClient, _>("ArchiveClient", || {
            Ok(Arc::new(TarGzArchiver::new()))
        })?;
        self.register_core::<dyn OptionalFeatureManager, _>("OptionalFeatureManager", || {
            Ok(Arc::new(DefaultFeatureManager::new()))
        })?;

        self.environment
            .register_services(&self.registry)
            .map_err(|e| Error::mandatory_service("EnvironmentServices", e))
    }

    fn register_core<T, F>(&self, service: &str, build: F) -> Result<()>
    where
        T: ?Sized + Component,
        F: FnOnce() -> Result<Arc<T>>,
    {
        let instance = build().map_err(|e| Error::mandatory_service(service, e))?;
        self.registry
            .register_singleton(instance, true)
            .map_err(|e| Error::mandatory_service(service, e))?;
        debug!(service, "Core service registered");
        Ok(())
    }

    fn discover_plugins(&self) {
        let outcome = self.exporter.export_all_with_report::<dyn Plugin>(true);
        for plugin in &outcome.instances {
            info!(plugin = plugin.name(), version = %plugin.version(), "Loaded plugin");
        }
        if !outcome.failures.is_empty() {
            let failed: Vec<&str> = outcome
                .failures
                .iter()
                .map(|failure| failure.type_name.as_str())
                .collect();
            warn!(
                loaded = outcome.instances.len(),
                failed = ?failed,
                "Some plugins could not be created"
            );
        }
        self.plugins.store(Arc::new(outcome.instances));
        self.plugin_failures.store(Arc::new(outcome.failures));
    }

    async fn install_optional_features(&self, cancellation: CancellationToken) -> Result<()> {
        let outcome = self
            .exporter
            .export_all_with_report::<dyn OptionalFeatureProvider>(true);
        let mut report = FeatureInstallReport {
            discovered: outcome
                .instances
                .iter()
                .map(|provider| provider.name().to_string())
                .collect(),
            ..FeatureInstallReport::default()
        };

        let mut active = Vec::with_capacity(outcome.instances.len());
        for provider in outcome.instances {
            let name = provider.name().to_string();
            if provider.requires_installation() && !provider.is_installed() {
                if cancellation.is_cancelled() {
                    warn!(provider = %name, "Optional feature installation cancelled");
                    report.skipped.push(name);
                    continue;
                }
                info!(provider = %name, "Installing optional feature");
                let installed = AssertUnwindSafe(provider.install(cancellation.clone()))
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|payload| {
                        Err(Error::installation(
                            &name,
                            format!("installer panicked: {}", panic_message(&*payload)),
                        ))
                    });
                if let Err(e) = installed {
                    error!(provider = %name, error = %e, "Error installing optional feature");
                    report.failed.push(name);
                    continue;
                }
            }
            report.active.push(name);
            active.push(provider);
        }

        self.registry
            .resolve::<dyn OptionalFeatureManager>()?
            .add_providers(active);
        info!(
            discovered = report.discovered.len(),
            active = report.active.len(),
            failed = report.failed.len(),
            "Optional feature providers processed"
        );
        self.features.store(Arc::new(report));
        Ok(())
    }

    /// Hand the discovered scheduled tasks to the task manager and start
    /// background work
    ///
    /// Allowed once, after `Ready`. Autorun is configured in the background
    /// and again on every configuration change until the host is disposed.
    /// Must be called from within a Tokio runtime.
    pub fn run_startup_tasks(&self) -> Result<()> {
        self.transition(HostState::RunningStartupTasks)?;
        let timer = TimedOperation::start();

        let tasks = self.exporter.export_all::<dyn ScheduledTask>(false);
        let task_count = tasks.len();
        self.registry.resolve::<dyn TaskManager>()?.add_tasks(tasks);

        let configuration = self.registry.resolve::<dyn ConfigurationManager>()?;
        let log_manager = self.registry.resolve::<dyn LogManager>()?;
        let environment = Arc::clone(&self.environment);
        let run_at_startup = configuration.common_configuration().run_at_startup;
        self.background
            .spawn(configure_autorun(Arc::clone(&environment), run_at_startup));

        let mut updates = configuration.subscribe();
        let shutdown = self.shutdown.clone();
        self.background.spawn(async move {
            loop {
                tokio::select! {
                    () = shutdown.cancelled() => break,
                    update = updates.recv() => match update {
                        Ok(update) => {
                            let common = update.configuration;
                            if let Err(e) = log_manager
                                .set_severity(LogSeverity::from_debug_flag(common.enable_debug_level_logging))
                            {
                                warn!(error = %e, "Failed to apply configured log severity");
                            }
                            configure_autorun(Arc::clone(&environment), common.run_at_startup).await;
                        }
                        Err(RecvError::Lagged(skipped)) => debug!(skipped, "Configuration updates lagged"),
                        Err(RecvError::Closed) => break,
                    },
                }
            }
        });

        info!(tasks = task_count, elapsed_ms = timer.elapsed_ms(), "Startup tasks running");
        Ok(())
    }

    /// Resolve a registered capability
    pub fn resolve<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<T>> {
        self.registry.resolve::<T>()
    }

    /// Resolve a registered capability if present
    pub fn try_resolve<T: ?Sized + Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.registry.try_resolve::<T>()
    }

    /// Build one catalog type as capability `T`
    pub fn create_instance<T: ?Sized + Component>(&self, descriptor: &TypeDescriptor) -> Result<Arc<T>> {
        self.exporter.create_instance::<T>(descriptor)
    }

    /// Build every catalog type implementing `T`
    pub fn export_all<T: ?Sized + Component>(&self, manage_lifetime: bool) -> Vec<Arc<T>> {
        self.exporter.export_all::<T>(manage_lifetime)
    }

    /// The dependency registry
    pub fn registry(&self) -> &Arc<ServiceRegistry> {
        &self.registry
    }

    /// The type catalog
    pub fn catalog(&self) -> &Arc<TypeCatalog> {
        &self.catalog
    }

    /// Plugin types that failed to construct during startup
    pub fn plugin_failures(&self) -> Arc<Vec<ConstructionFailure>> {
        self.plugin_failures.load_full()
    }

    /// Outcome of the optional feature stage
    pub fn feature_report(&self) -> Arc<FeatureInstallReport> {
        self.features.load_full()
    }

    /// Watch lifecycle state changes
    pub fn subscribe_state(&self) -> watch::Receiver<HostState> {
        self.state.subscribe()
    }

    /// Cancelled when the host starts disposing
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Record that the application now runs `version`; a restart becomes pending
    pub fn on_application_updated(&self, version: Version) {
        self.notifier.on_application_updated(version);
    }

    /// Ask the environment for a newer application version
    pub async fn check_for_application_update(
        &self,
        cancellation: CancellationToken,
    ) -> Result<CheckForUpdateResult> {
        self.environment
            .check_for_application_update(&self.version, cancellation)
            .await
    }

    /// Install an application update through the environment
    pub async fn update_application(
        &self,
        package: &PackageVersionInfo,
        cancellation: CancellationToken,
    ) -> Result<()> {
        if !self.environment.can_self_update() {
            return Err(Error::not_supported("self update"));
        }
        self.environment
            .update_application(package, cancellation)
            .await?;
        self.on_application_updated(package.version.clone());
        Ok(())
    }

    /// Wait for background work spawned by [`AppHost::run_startup_tasks`]
    ///
    /// Returns once the host is disposed and the work has stopped.
    pub async fn wait_for_background_tasks(&self) {
        self.shutdown.cancelled().await;
        self.background.close();
        self.background.wait().await;
    }

    /// Release everything the host created
    ///
    /// Moves to `Disposing`, stops background work, disposes every tracked
    /// resource except the host itself and drops all registrations. A second
    /// call does nothing.
    pub fn dispose(&self) -> DisposalReport {
        let Ok(from) = self.transition(HostState::Disposing) else {
            debug!("Application host already disposing");
            return DisposalReport::default();
        };
        info!(from = %from, "Disposing application host");

        self.shutdown.cancel();
        self.background.close();
        let report = self.lifetimes.dispose_all();
        self.plugins.store(Arc::new(Vec::new()));
        self.registry.clear();
        report
    }

    fn current_state(&self) -> HostState {
        *self.state.borrow()
    }

    fn shared(&self) -> Result<Arc<AppHost>> {
        self.me
            .upgrade()
            .ok_or_else(|| Error::invalid_state("live host", "host being dropped"))
    }

    fn transition(&self, to: HostState) -> Result<HostState> {
        let mut from = None;
        self.state.send_if_modified(|state| {
            if state.can_transition_to(to) {
                from = Some(*state);
                *state = to;
                true
            } else {
                false
            }
        });
        let from = from.ok_or_else(|| {
            Error::invalid_state(format!("a state leading to {to}"), self.current_state())
        })?;
        debug!(from = %from, to = %to, "Host state changed");
        self.notifier.publish(HostEvent::StateChanged { from, to });
        Ok(from)
    }
}

async fn configure_autorun(environment: Arc<dyn HostEnvironment>, enabled: bool) {
    match environment.configure_autorun_at_startup(enabled).await {
        Ok(()) => debug!(enabled, "Autorun configured"),
        Err(e) => error!(enabled, error = %e, "Error configuring autorun"),
    }
}

impl Component for AppHost {
    fn into_disposable(self: Arc<Self>) -> Option<Arc<dyn Disposable>> {
        Some(self)
    }
}

impl Disposable for AppHost {
    fn dispose(&self) -> Result<()> {
        let report = AppHost::dispose(self);
        if report.is_clean() {
            Ok(())
        } else {
            Err(Error::infrastructure(format!(
                "{} resources failed to dispose",
                report.failed.len()
            )))
        }
    }
}

#[async_trait]
impl ApplicationHost for AppHost {
    fn application_version(&self) -> Version {
        self.version.clone()
    }

    fn state(&self) -> HostState {
        self.current_state()
    }

    fn is_first_run(&self) -> bool {
        self.is_first_run.load(Ordering::Acquire)
    }

    fn plugins(&self) -> Vec<Arc<dyn Plugin>> {
        self.plugins.load_full().to_vec()
    }

    fn remove_plugin(&self, plugin: &Arc<dyn Plugin>) -> bool {
        let id = instance_id(plugin);
        let mut removed = false;
        self.plugins.rcu(|current| {
            let remaining: Vec<_> = current
                .iter()
                .filter(|&candidate| instance_id(candidate) != id)
                .cloned()
                .collect();
            removed = remaining.len() != current.len();
            remaining
        });
        if removed {
            info!(plugin = plugin.name(), "Plugin removed");
        }
        removed
    }

    fn failed_sources(&self) -> Vec<String> {
        self.catalog.failed_sources()
    }

    fn has_pending_restart(&self) -> bool {
        self.notifier.has_pending_restart()
    }

    fn notify_pending_restart(&self) {
        self.notifier.notify_pending_restart();
    }

    fn subscribe(&self) -> broadcast::Receiver<HostEvent> {
        self.notifier.subscribe()
    }

    fn subscribe_restart_requests(&self) -> mpsc::UnboundedReceiver<u64> {
        self.notifier.subscribe_restart_requests()
    }

    fn can_self_restart(&self) -> bool {
        self.environment.can_self_restart()
    }

    fn can_self_update(&self) -> bool {
        self.environment.can_self_update()
    }

    async fn restart(&self) -> Result<()> {
        if !self.environment.can_self_restart() {
            return Err(Error::not_supported("restart"));
        }
        info!("Restarting application");
        self.environment.restart().await
    }

    async fn shutdown(&self) -> Result<()> {
        info!("Shutting down application");
        self.environment.shutdown().await
    }
}
