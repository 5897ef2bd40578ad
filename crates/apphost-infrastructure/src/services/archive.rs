//! Archive/compression helper

use std::fs::File;
use std::path::Path;

use apphost_domain::error::{Error, Result};
use apphost_domain::ports::{ArchiveClient, Component};
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use tracing::debug;

use crate::error_ext::ErrorContext;

/// Extracts and packs `.tar.gz` packages
#[derive(Debug, Default)]
pub struct TarGzArchiver;

impl TarGzArchiver {
    /// Create the archiver
    pub fn new() -> Self {
        Self
    }

    /// Pack the contents of `source_directory` into a `.tar.gz` at `archive_path`
    pub fn pack_directory(&self, source_directory: &Path, archive_path: &Path) -> Result<()> {
        let file = File::create(archive_path)
            .io_context(format!("Failed to create {}", archive_path.display()))?;
        let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
        builder
            .append_dir_all(".", source_directory)
            .io_context(format!("Failed to pack {}", source_directory.display()))?;
        builder
            .into_inner()
            .and_then(GzEncoder::finish)
            .io_context(format!("Failed to finish {}", archive_path.display()))?;
        Ok(())
    }
}

impl Component for TarGzArchiver {}

impl ArchiveClient for TarGzArchiver {
    fn extract_all(&self, source: &Path, target_directory: &Path, overwrite: bool) -> Result<()> {
        let file = File::open(source).io_context(format!("Failed to open {}", source.display()))?;
        std::fs::create_dir_all(target_directory)
            .io_context(format!("Failed to create {}", target_directory.display()))?;

        let mut archive = tar::Archive::new(GzDecoder::new(file));
        let entries = archive
            .entries()
            .io_context(format!("Failed to read {}", source.display()))?;
        let mut extracted = 0usize;
        for entry in entries {
            let mut entry = entry.io_context(format!("Corrupt entry in {}", source.display()))?;
            let relative = entry
                .path()
                .io_context("Invalid entry path")?
                .into_owned();
            if !overwrite && target_directory.join(&relative).is_file() {
                debug!(entry = %relative.display(), "Keeping existing file");
                continue;
            }
            let unpacked = entry
                .unpack_in(target_directory)
                .io_context(format!("Failed to extract {}", relative.display()))?;
            if !unpacked {
                return Err(Error::io(format!(
                    "Entry {} escapes the target directory",
                    relative.display()
                )));
            }
            extracted += 1;
        }
        debug!(source = %source.display(), extracted, "Archive extracted");
        Ok(())
    }
}
