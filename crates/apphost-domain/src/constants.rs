//! Domain layer constants
//!
//! Constants shared by the host and by component authors.
//! Infrastructure-specific constants live in `apphost_infrastructure::constants`.

// ============================================================================
// DISCOVERY CONSTANTS
// ============================================================================

/// Source name used by components compiled into the host binary
pub const BUILTIN_SOURCE_NAME: &str = "builtin";

/// Symbol exported by shared libraries that carry component types
pub const COMPONENT_ENTRY_SYMBOL: &str = "apphost_component_types";

// ============================================================================
// HOST CONSTANTS
// ============================================================================

/// Minimum number of concurrent HTTP connections per host
pub const MIN_HTTP_CONNECTION_LIMIT: usize = 48;

/// Capacity of the host event channel
pub const HOST_EVENT_CHANNEL_CAPACITY: usize = 256;

/// Capacity of the configuration change channel
pub const CONFIG_EVENT_CHANNEL_CAPACITY: usize = 64;

// ============================================================================
// APPLICATION PATH CONSTANTS
// ============================================================================

/// Plugins directory name under the program data path
pub const PLUGINS_DIR_NAME: &str = "plugins";

/// Configuration directory name under the program data path
pub const CONFIGURATION_DIR_NAME: &str = "config";

/// Log directory name under the program data path
pub const LOG_DIR_NAME: &str = "logs";

/// Cache directory name under the program data path
pub const CACHE_DIR_NAME: &str = "cache";

/// Temp directory name under the program data path
pub const TEMP_DIR_NAME: &str = "temp";

/// Configuration file name inside the configuration directory
pub const SYSTEM_CONFIGURATION_FILE_NAME: &str = "system.toml";
