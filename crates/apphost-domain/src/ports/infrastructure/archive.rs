//! Archive/compression port

use crate::error::Result;
use crate::ports::lifecycle::Component;
use std::path::Path;

/// Extracts compressed archives (plugin packages, updates)
pub trait ArchiveClient: Component {
    /// Extract every entry of `source` into `target_directory`
    fn extract_all(&self, source: &Path, target_directory: &Path, overwrite: bool) -> Result<()>;
}
