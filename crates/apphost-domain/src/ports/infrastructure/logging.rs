//! Logger port

use crate::error::Result;
use crate::ports::lifecycle::Component;
use crate::value_objects::LogSeverity;

/// Controls the process-wide log severity
pub trait LogManager: Component {
    /// Current severity threshold
    fn severity(&self) -> LogSeverity;

    /// Change the severity threshold
    fn set_severity(&self, severity: LogSeverity) -> Result<()>;
}
