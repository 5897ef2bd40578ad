//! Startup sequence tests

use std::sync::Arc;

use apphost_application::InMemorySource;
use apphost_domain::error::Error;
use apphost_domain::events::HostEvent;
use apphost_domain::ports::{
    ApplicationHost, ArchiveClient, ConfigurationManager, HttpClient, InstallationManager,
    LogManager, NetworkManager, OptionalFeatureManager, SecurityManager, TaskManager,
};
use apphost_domain::value_objects::{ApplicationPaths, CommonConfiguration, HostState, LogSeverity};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

use super::fixtures::{
    BOOKS, BROKEN_PLUGIN, CLEANUP_TASK, FAILING_FEATURE, INSTALLABLE_FEATURE, LogBuffer, MUSIC,
    PANICKING_FEATURE, PHOTOS, READY_FEATURE, TRACKED, TestEnvironment, WEATHER, host,
    plugin_names,
};

#[tokio::test]
async fn test_init_reaches_ready_with_core_services() {
    let dir = TempDir::new().unwrap();
    let (host, _) = host(
        TestEnvironment::new(dir.path())
            .with_types("plugins", &[&WEATHER, &MUSIC])
            .with_types("features", &[&READY_FEATURE])
            .with_types("tasks", &[&CLEANUP_TASK]),
    );

    host.init().await.expect("init should succeed");

    assert_eq!(host.state(), HostState::Ready);
    assert_eq!(plugin_names(&host.plugins()), ["music", "weather"]);
    assert!(host.registry().is_frozen());
    assert!(host.resolve::<dyn ConfigurationManager>().is_ok());
    assert!(host.resolve::<dyn ApplicationHost>().is_ok());
    assert!(host.resolve::<ApplicationPaths>().is_ok());
    assert!(host.resolve::<dyn LogManager>().is_ok());
    assert!(host.resolve::<dyn TaskManager>().is_ok());
    assert!(host.resolve::<dyn HttpClient>().is_ok());
    assert!(host.resolve::<dyn NetworkManager>().is_ok());
    assert!(host.resolve::<dyn SecurityManager>().is_ok());
    assert!(host.resolve::<dyn InstallationManager>().is_ok());
    assert!(host.resolve::<dyn ArchiveClient>().is_ok());
    assert!(host.resolve::<dyn OptionalFeatureManager>().is_ok());
}

#[tokio::test]
async fn test_init_publishes_every_state_transition() {
    let dir = TempDir::new().unwrap();
    let (host, _) = host(TestEnvironment::new(dir.path()));
    let mut events = host.subscribe();

    host.init().await.unwrap();

    let mut transitions = Vec::new();
    while let Ok(event) = events.try_recv() {
        if let HostEvent::StateChanged { to, .. } = event {
            transitions.push(to);
        }
    }
    assert_eq!(
        transitions,
        [
            HostState::LoadingTypes,
            HostState::RegisteringCore,
            HostState::DiscoveringPlugins,
            HostState::InstallingOptionalFeatures,
            HostState::Ready,
        ]
    );
}

#[tokio::test]
async fn test_registered_host_is_the_same_instance() {
    let dir = TempDir::new().unwrap();
    let (host, _) = host(TestEnvironment::new(dir.path()));
    host.init().await.unwrap();

    let resolved = host.resolve::<dyn ApplicationHost>().unwrap();
    assert_eq!(resolved.application_version(), semver::Version::new(1, 4, 0));
    assert_eq!(resolved.state(), HostState::Ready);
}

#[tokio::test]
async fn test_failing_mandatory_service_aborts_startup() {
    let dir = TempDir::new().unwrap();
    let (host, _) = host(
        TestEnvironment::new(dir.path())
            .with_types("plugins", &[&WEATHER])
            .failing_network(),
    );

    let err = host.init().await.unwrap_err();

    match &err {
        Error::MandatoryService { service, .. } => assert_eq!(service, "NetworkManager"),
        other => panic!("expected a mandatory service error, got {other}"),
    }
    assert!(err.to_string().contains("no network stack"));
    assert!(host.plugins().is_empty());
    assert_ne!(host.state(), HostState::Ready);
    assert_eq!(host.state(), HostState::RegisteringCore);
}

#[tokio::test]
async fn test_failing_environment_services_abort_startup() {
    let dir = TempDir::new().unwrap();
    let (host, _) = host(
        TestEnvironment::new(dir.path())
            .with_types("plugins", &[&WEATHER])
            .failing_services(),
    );

    let err = host.init().await.unwrap_err();

    assert!(matches!(err, Error::MandatoryService { .. }));
    assert!(host.plugins().is_empty());
    assert!(!host.state().is_ready());
}

#[tokio::test]
async fn test_broken_plugin_is_dropped_from_the_list() {
    let dir = TempDir::new().unwrap();
    let (host, _) = host(
        TestEnvironment::new(dir.path())
            .with_types("plugins", &[&WEATHER, &MUSIC, &BROKEN_PLUGIN, &PHOTOS, &BOOKS]),
    );

    host.init().await.expect("a broken plugin must not abort startup");

    assert_eq!(
        plugin_names(&host.plugins()),
        ["books", "music", "photos", "weather"]
    );
}

#[tokio::test]
async fn test_broken_plugin_is_reported_by_name() {
    let dir = TempDir::new().unwrap();
    let (host, _) = host(
        TestEnvironment::new(dir.path())
            .with_types("plugins", &[&WEATHER, &MUSIC, &BROKEN_PLUGIN, &PHOTOS, &BOOKS]),
    );
    let logs = LogBuffer::default();
    let _guard = logs.capture();

    host.init().await.unwrap();

    let failures = host.plugin_failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].type_name, "BrokenPlugin");
    assert!(failures[0].message.contains("plugin assembly is corrupt"));
    assert!(logs.contents().contains("BrokenPlugin"));
}

#[tokio::test]
async fn test_plugin_constructors_resolve_core_services() {
    let dir = TempDir::new().unwrap();
    let (host, _) = host(TestEnvironment::new(dir.path()).with_types("plugins", &[&TRACKED]));

    host.init().await.unwrap();

    assert_eq!(plugin_names(&host.plugins()), ["tracked"]);
}

#[tokio::test]
async fn test_failing_source_is_recorded_and_startup_continues() {
    let dir = TempDir::new().unwrap();
    let (host, _) = host(
        TestEnvironment::new(dir.path())
            .with_source(InMemorySource::failing("corrupt.so", "bad image format"))
            .with_types("plugins", &[&WEATHER]),
    );

    host.init().await.unwrap();

    assert_eq!(host.failed_sources(), ["corrupt.so"]);
    assert_eq!(plugin_names(&host.plugins()), ["weather"]);
}

#[tokio::test]
async fn test_failed_feature_install_is_excluded() {
    let dir = TempDir::new().unwrap();
    let (host, _) = host(
        TestEnvironment::new(dir.path())
            .with_types("features", &[&FAILING_FEATURE, &READY_FEATURE]),
    );

    host.init().await.expect("an install failure must not abort startup");

    let report = host.feature_report();
    assert_eq!(report.discovered.len(), 2);
    assert_eq!(report.active, ["ready"]);
    assert_eq!(report.failed, ["failing"]);

    let manager = host.resolve::<dyn OptionalFeatureManager>().unwrap();
    let active: Vec<_> = manager.providers().iter().map(|p| p.name().to_string()).collect();
    assert_eq!(active, ["ready"]);
    assert_eq!(host.state(), HostState::Ready);
}

#[tokio::test]
async fn test_panicking_installer_is_excluded() {
    let dir = TempDir::new().unwrap();
    let (host, _) = host(
        TestEnvironment::new(dir.path())
            .with_types("features", &[&PANICKING_FEATURE, &READY_FEATURE]),
    );

    host.init().await.expect("a panicking installer must not abort startup");

    let report = host.feature_report();
    assert_eq!(report.failed, ["panicking"]);
    assert_eq!(report.active, ["ready"]);
    assert_eq!(host.state(), HostState::Ready);

    let manager = host.resolve::<dyn OptionalFeatureManager>().unwrap();
    assert!(manager.provider("panicking").is_none());
    assert!(manager.provider("ready").is_some());
}

#[tokio::test]
async fn test_installable_feature_is_installed_and_active() {
    let dir = TempDir::new().unwrap();
    let (host, _) = host(
        TestEnvironment::new(dir.path()).with_types("features", &[&INSTALLABLE_FEATURE]),
    );

    host.init().await.unwrap();

    let manager = host.resolve::<dyn OptionalFeatureManager>().unwrap();
    let provider = manager.provider("installable").expect("provider should be active");
    assert!(provider.is_installed());
}

#[tokio::test]
async fn test_cancellation_skips_remaining_installs() {
    let dir = TempDir::new().unwrap();
    let (host, _) = host(
        TestEnvironment::new(dir.path())
            .with_types("features", &[&INSTALLABLE_FEATURE, &READY_FEATURE]),
    );
    let cancellation = CancellationToken::new();
    cancellation.cancel();

    host.init_with_cancellation(cancellation).await.unwrap();

    let report = host.feature_report();
    assert_eq!(report.skipped, ["installable"]);
    assert_eq!(report.active, ["ready"]);
    assert_eq!(host.state(), HostState::Ready);
}

#[tokio::test]
async fn test_second_init_is_rejected() {
    let dir = TempDir::new().unwrap();
    let (host, _) = host(TestEnvironment::new(dir.path()));
    host.init().await.unwrap();

    let err = host.init().await.unwrap_err();

    assert!(matches!(err, Error::InvalidState { .. }));
    assert_eq!(host.state(), HostState::Ready);
}

#[tokio::test]
async fn test_first_run_follows_wizard_flag() {
    let dir = TempDir::new().unwrap();
    let (fresh, _) = host(TestEnvironment::new(dir.path()));
    fresh.init().await.unwrap();
    assert!(fresh.is_first_run());

    let (configured, _) = host(TestEnvironment::new(dir.path()).with_configuration(
        CommonConfiguration {
            is_startup_wizard_completed: true,
            ..CommonConfiguration::default()
        },
    ));
    configured.init().await.unwrap();
    assert!(!configured.is_first_run());
}

#[tokio::test]
async fn test_debug_flag_sets_log_severity() {
    let dir = TempDir::new().unwrap();
    let (host, _) = host(TestEnvironment::new(dir.path()).with_configuration(
        CommonConfiguration {
            enable_debug_level_logging: true,
            ..CommonConfiguration::default()
        },
    ));

    host.init().await.unwrap();

    let log_manager = host.resolve::<dyn LogManager>().unwrap();
    assert_eq!(log_manager.severity(), LogSeverity::Debug);
}

#[tokio::test]
async fn test_concrete_plugin_can_be_created_on_demand() {
    let dir = TempDir::new().unwrap();
    let (host, _) = host(TestEnvironment::new(dir.path()));
    host.init().await.unwrap();

    let plugin = host
        .create_instance::<dyn apphost_domain::ports::Plugin>(&WEATHER)
        .expect("descriptor should construct");
    assert_eq!(plugin.name(), "weather");

    let err = host
        .create_instance::<dyn apphost_domain::ports::Plugin>(&BROKEN_PLUGIN)
        .err()
        .expect("broken descriptor should fail");
    assert_eq!(
        err.to_string(),
        "Error creating BrokenPlugin: Internal error: plugin assembly is corrupt"
    );
}

#[tokio::test]
async fn test_host_can_be_shared_across_tasks() {
    let dir = TempDir::new().unwrap();
    let (host, _) = host(TestEnvironment::new(dir.path()).with_types("plugins", &[&WEATHER]));

    let init = tokio::spawn({
        let host = Arc::clone(&host);
        async move { host.init().await }
    });
    init.await.unwrap().unwrap();

    assert_eq!(host.plugins().len(), 1);
}
