//! Infrastructure layer constants
//!
//! Contains constants that are part of the infrastructure implementation.
//! Host-wide constants are defined in `apphost_domain::constants`.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "apphost.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "apphost";

/// Environment variable prefix for configuration
pub const CONFIG_ENV_PREFIX: &str = "APPHOST";

/// Separator between nested keys in configuration environment variables
pub const CONFIG_ENV_SEPARATOR: &str = "__";

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Environment variable overriding the log filter
pub const LOG_ENV_VAR: &str = "APPHOST_LOG";

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// File name prefix of rolling log files
pub const LOG_FILE_PREFIX: &str = "apphost";

// ============================================================================
// HTTP CONSTANTS
// ============================================================================

/// Default request timeout in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// User agent sent by the shared HTTP client
pub const HTTP_USER_AGENT: &str = concat!("apphost/", env!("CARGO_PKG_VERSION"));
