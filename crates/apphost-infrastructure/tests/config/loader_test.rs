//! Configuration Loader Tests

use std::env;

use apphost_domain::constants::MIN_HTTP_CONNECTION_LIMIT;
use apphost_domain::error::Error;
use apphost_infrastructure::config::{AppConfig, ConfigLoader, HttpConfig};
use apphost_infrastructure::constants::DEFAULT_LOG_LEVEL;
use tempfile::TempDir;

/// Loader reading `path` and an environment prefix no other test uses
fn loader(path: &std::path::Path, prefix: &str) -> ConfigLoader {
    ConfigLoader::new().with_config_path(path).with_env_prefix(prefix)
}

#[test]
fn test_missing_file_yields_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config = loader(&temp_dir.path().join("absent.toml"), "APPHOST_TEST_DEFAULTS")
        .load()
        .unwrap();

    assert_eq!(config, AppConfig::default());
    assert_eq!(config.logging.level, DEFAULT_LOG_LEVEL);
    assert_eq!(config.http.connection_limit, MIN_HTTP_CONNECTION_LIMIT);
}

#[test]
fn test_file_values_override_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("apphost.toml");
    std::fs::write(
        &path,
        r#"
[common]
run_at_startup = true
supporter_key = "KEY-1"

[logging]
level = "debug"

[http]
timeout_secs = 5
"#,
    )
    .unwrap();

    let config = loader(&path, "APPHOST_TEST_FILE").load().unwrap();

    assert!(config.common.run_at_startup);
    assert_eq!(config.common.supporter_key.as_deref(), Some("KEY-1"));
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.http.timeout_secs, 5);
    assert_eq!(config.http.connection_limit, MIN_HTTP_CONNECTION_LIMIT);
}

#[test]
fn test_save_then_load() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("apphost.toml");
    let mut config = AppConfig::default();
    config.common.is_startup_wizard_completed = true;
    config.http.connection_limit = 96;

    let loader = loader(&path, "APPHOST_TEST_SAVE");
    loader.save_to_file(&config, &path).unwrap();
    let loaded = loader.load().unwrap();

    assert_eq!(loaded, config);
}

#[test]
fn test_zero_connection_limit_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("apphost.toml");
    std::fs::write(&path, "[http]\nconnection_limit = 0\n").unwrap();

    let err = loader(&path, "APPHOST_TEST_LIMIT").load().unwrap_err();

    assert!(matches!(err, Error::Configuration { .. }));
    assert!(err.to_string().contains("connection limit"));
}

#[test]
fn test_unknown_log_level_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("apphost.toml");
    std::fs::write(&path, "[logging]\nlevel = \"chatty\"\n").unwrap();

    let err = loader(&path, "APPHOST_TEST_LEVEL").load().unwrap_err();

    assert!(err.to_string().contains("chatty"));
}

#[test]
fn test_malformed_file_is_a_configuration_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("apphost.toml");
    std::fs::write(&path, "[http\nconnection_limit = ").unwrap();

    let err = loader(&path, "APPHOST_TEST_MALFORMED").load().unwrap_err();

    assert!(matches!(err, Error::Configuration { .. }));
}

#[test]
fn test_connection_limit_is_raised_to_minimum() {
    let config = HttpConfig {
        connection_limit: 4,
        ..HttpConfig::default()
    };
    assert_eq!(config.effective_connection_limit(), MIN_HTTP_CONNECTION_LIMIT);

    let config = HttpConfig {
        connection_limit: MIN_HTTP_CONNECTION_LIMIT * 2,
        ..HttpConfig::default()
    };
    assert_eq!(config.effective_connection_limit(), MIN_HTTP_CONNECTION_LIMIT * 2);
}

/// Environment variables override the file
///
/// Run with: `cargo test -p apphost-infrastructure --test integration -- --test-threads=1 --ignored`
#[test]
#[ignore = "requires --test-threads=1 due to env var mutations"]
fn test_env_vars_override_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("apphost.toml");
    std::fs::write(&path, "[common]\nrun_at_startup = false\n").unwrap();

    // SAFETY: Tests must run with --test-threads=1
    unsafe {
        env::set_var("APPHOST_TEST_ENV_COMMON__RUN_AT_STARTUP", "true");
        env::set_var("APPHOST_TEST_ENV_HTTP__TIMEOUT_SECS", "12");
    }

    let config = loader(&path, "APPHOST_TEST_ENV").load();

    // SAFETY: Tests must run with --test-threads=1
    unsafe {
        env::remove_var("APPHOST_TEST_ENV_COMMON__RUN_AT_STARTUP");
        env::remove_var("APPHOST_TEST_ENV_HTTP__TIMEOUT_SECS");
    }

    let config = config.unwrap();
    assert!(config.common.run_at_startup);
    assert_eq!(config.http.timeout_secs, 12);
}
