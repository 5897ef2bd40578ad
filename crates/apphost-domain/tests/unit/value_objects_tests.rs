//! Value object tests

use apphost_domain::value_objects::{
    ApplicationPaths, CheckForUpdateResult, CommonConfiguration, LogSeverity,
};
use std::path::Path;

#[test]
fn test_paths_derive_from_program_data() {
    let paths = ApplicationPaths::new("/var/lib/apphost");

    assert_eq!(paths.plugins_path, Path::new("/var/lib/apphost/plugins"));
    assert_eq!(paths.temp_directory, Path::new("/var/lib/apphost/temp"));
    assert_eq!(
        paths.system_configuration_file_path(),
        Path::new("/var/lib/apphost/config/system.toml")
    );
}

#[test]
fn test_paths_overrides() {
    let paths = ApplicationPaths::new("/data").with_plugins_path("/opt/plugins");
    assert_eq!(paths.plugins_path, Path::new("/opt/plugins"));
    assert_eq!(paths.cache_path, Path::new("/data/cache"));
}

#[test]
fn test_log_severity_from_debug_flag() {
    assert_eq!(LogSeverity::from_debug_flag(true), LogSeverity::Debug);
    assert_eq!(LogSeverity::from_debug_flag(false), LogSeverity::Info);
    assert_eq!(LogSeverity::Warn.as_directive(), "warn");
}

#[test]
fn test_common_configuration_defaults() {
    let config = CommonConfiguration::default();
    assert!(!config.enable_debug_level_logging);
    assert!(!config.is_startup_wizard_completed);
    assert!(!config.run_at_startup);
    assert!(config.supporter_key.is_none());
}

#[test]
fn test_common_configuration_partial_json() {
    let config: CommonConfiguration =
        serde_json::from_str(r#"{"run_at_startup": true}"#).expect("valid json");
    assert!(config.run_at_startup);
    assert!(!config.enable_debug_level_logging);
}

#[test]
fn test_up_to_date_result() {
    let result = CheckForUpdateResult::up_to_date();
    assert!(!result.is_update_available);
    assert!(result.package.is_none());
}
