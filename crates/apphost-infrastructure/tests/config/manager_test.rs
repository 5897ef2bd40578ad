//! File-backed configuration manager tests

use apphost_domain::ports::ConfigurationManager;
use apphost_domain::value_objects::CommonConfiguration;
use apphost_infrastructure::config::{AppConfig, ConfigLoader, FileConfigurationManager};
use tempfile::TempDir;

#[test]
fn test_load_missing_file_starts_from_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config").join("system.toml");

    let manager = FileConfigurationManager::load(&path).unwrap();

    assert_eq!(manager.common_configuration(), CommonConfiguration::default());
    assert_eq!(manager.path(), Some(path.as_path()));
    assert!(!path.exists());
}

#[test]
fn test_replace_persists_and_broadcasts() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config").join("system.toml");
    let manager = FileConfigurationManager::load(&path).unwrap();
    let mut updates = manager.subscribe();
    let next = CommonConfiguration {
        is_startup_wizard_completed: true,
        run_at_startup: true,
        ..CommonConfiguration::default()
    };

    manager.replace_common_configuration(next.clone()).unwrap();

    assert_eq!(manager.common_configuration(), next);
    assert_eq!(updates.try_recv().unwrap().configuration, next);

    let reloaded = ConfigLoader::new()
        .with_config_path(&path)
        .with_env_prefix("APPHOST_TEST_MANAGER")
        .load()
        .unwrap();
    assert_eq!(reloaded.common, next);
}

#[test]
fn test_replace_keeps_other_sections() {
    let mut config = AppConfig::default();
    config.logging.level = "warn".to_string();
    let manager = FileConfigurationManager::in_memory(config);

    manager
        .replace_common_configuration(CommonConfiguration {
            enable_debug_level_logging: true,
            ..CommonConfiguration::default()
        })
        .unwrap();

    let snapshot = manager.app_config();
    assert_eq!(snapshot.logging.level, "warn");
    assert!(snapshot.common.enable_debug_level_logging);
    assert!(manager.path().is_none());
}

#[test]
fn test_every_subscriber_sees_each_update() {
    let manager = FileConfigurationManager::in_memory(AppConfig::default());
    let mut first = manager.subscribe();
    let mut second = manager.subscribe();

    for run_at_startup in [true, false] {
        manager
            .replace_common_configuration(CommonConfiguration {
                run_at_startup,
                ..CommonConfiguration::default()
            })
            .unwrap();
    }

    for receiver in [&mut first, &mut second] {
        assert!(receiver.try_recv().unwrap().configuration.run_at_startup);
        assert!(!receiver.try_recv().unwrap().configuration.run_at_startup);
    }
}
