//! Log severity levels

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity threshold applied by the log manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogSeverity {
    /// Everything, including fine-grained tracing
    Trace,
    /// Diagnostic output
    Debug,
    /// Normal operation
    #[default]
    Info,
    /// Recoverable problems
    Warn,
    /// Failures
    Error,
}

impl LogSeverity {
    /// Severity derived from the configuration's debug flag
    pub fn from_debug_flag(enable_debug_level_logging: bool) -> Self {
        if enable_debug_level_logging {
            Self::Debug
        } else {
            Self::Info
        }
    }

    /// Filter directive understood by `tracing-subscriber`
    pub fn as_directive(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LogSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_directive())
    }
}
