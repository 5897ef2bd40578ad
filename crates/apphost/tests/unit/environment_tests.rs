//! Standalone environment tests

use std::sync::Arc;

use apphost::domain::ports::{ApplicationHost, ConfigurationManager, TaskManager};
use apphost::domain::value_objects::{CommonConfiguration, HostState};
use apphost::infrastructure::config::AppConfig;
use apphost::{AppHost, HostEnvironment, StandaloneEnvironment};
use tempfile::TempDir;

fn config_in(dir: &TempDir) -> AppConfig {
    let mut config = AppConfig::default();
    config.paths.data_dir = Some(dir.path().join("data"));
    config
}

#[test]
fn test_layout_follows_data_dir() {
    let dir = TempDir::new().unwrap();
    let mut config = config_in(&dir);
    config.paths.plugins_dir = Some(dir.path().join("extra-plugins"));

    let environment = StandaloneEnvironment::new(config, None).unwrap();
    let paths = environment.application_paths();

    assert_eq!(paths.program_data_path, dir.path().join("data"));
    assert_eq!(paths.plugins_path, dir.path().join("extra-plugins"));
    assert_eq!(
        environment.configuration_file_path(),
        paths.system_configuration_file_path()
    );

    environment.ensure_directories().unwrap();
    assert!(paths.temp_directory.is_dir());
    assert!(paths.log_directory_path.is_dir());
}

#[test]
fn test_explicit_config_path_is_used_for_persistence() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom.toml");

    let environment = StandaloneEnvironment::new(config_in(&dir), Some(path.clone())).unwrap();

    assert_eq!(environment.configuration_file_path(), path);
}

#[tokio::test]
async fn test_host_starts_with_builtin_components() {
    let dir = TempDir::new().unwrap();
    let environment = Arc::new(StandaloneEnvironment::new(config_in(&dir), None).unwrap());
    environment.ensure_directories().unwrap();
    let host = AppHost::new(Arc::clone(&environment) as Arc<dyn HostEnvironment>);

    host.init().await.expect("init should succeed");
    host.run_startup_tasks().expect("startup tasks should start");

    assert_eq!(host.state(), HostState::RunningStartupTasks);
    assert!(host.failed_sources().is_empty());
    let task_names: Vec<_> = host
        .resolve::<dyn TaskManager>()
        .unwrap()
        .tasks()
        .iter()
        .map(|task| task.name().to_string())
        .collect();
    assert!(task_names.contains(&"temp-cleanup".to_string()));

    host.dispose();
}

#[tokio::test]
async fn test_configuration_changes_are_persisted() {
    let dir = TempDir::new().unwrap();
    let environment = Arc::new(StandaloneEnvironment::new(config_in(&dir), None).unwrap());
    let host = AppHost::new(Arc::clone(&environment) as Arc<dyn HostEnvironment>);
    host.init().await.unwrap();

    host.resolve::<dyn ConfigurationManager>()
        .unwrap()
        .replace_common_configuration(CommonConfiguration {
            is_startup_wizard_completed: true,
            ..CommonConfiguration::default()
        })
        .unwrap();

    let written = std::fs::read_to_string(environment.configuration_file_path()).unwrap();
    assert!(written.contains("is_startup_wizard_completed = true"));
    host.dispose();
}

#[tokio::test]
async fn test_shutdown_and_restart_cancel_the_run_loop() {
    let dir = TempDir::new().unwrap();
    let environment = Arc::new(StandaloneEnvironment::new(config_in(&dir), None).unwrap());
    let host = AppHost::new(Arc::clone(&environment) as Arc<dyn HostEnvironment>);
    let shutdown = environment.shutdown_token();

    assert!(host.can_self_restart());
    host.restart().await.unwrap();

    assert!(shutdown.is_cancelled());
    assert!(environment.restart_requested());
}

#[tokio::test]
async fn test_plain_shutdown_does_not_restart() {
    let dir = TempDir::new().unwrap();
    let environment = StandaloneEnvironment::new(config_in(&dir), None).unwrap();

    environment.shutdown().await.unwrap();

    assert!(environment.shutdown_token().is_cancelled());
    assert!(!environment.restart_requested());
}
