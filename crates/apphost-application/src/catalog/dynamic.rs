//! Shared-library component sources
//!
//! A component library exports [`COMPONENT_ENTRY_SYMBOL`] returning the
//! descriptors it contributes:
//!
//! ```ignore
//! #[unsafe(no_mangle)]
//! pub fn apphost_component_types() -> &'static [TypeDescriptor] {
//!     &WEATHER_TYPES
//! }
//! ```

use std::path::{Path, PathBuf};

use apphost_domain::constants::COMPONENT_ENTRY_SYMBOL;
use apphost_domain::error::{Error, Result};
use libloading::Library;
use once_cell::sync::OnceCell;
use tracing::debug;

use super::descriptor::TypeDescriptor;
use super::source::{ComponentSource, TypeResolution};

/// Signature of the component library entry point
pub type ComponentEntryFn = unsafe fn() -> &'static [TypeDescriptor];

/// Component types loaded from one shared library
pub struct DynamicLibrarySource {
    name: String,
    path: PathBuf,
    // Descriptors point into the library image, so it is opened once and
    // stays loaded for the life of the source
    library: OnceCell<Library>,
}

impl DynamicLibrarySource {
    /// Source for the library at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_stem()
            .map_or_else(|| path.display().to_string(), |stem| stem.to_string_lossy().into_owned());
        Self {
            name,
            path,
            library: OnceCell::new(),
        }
    }

    /// One source per shared library found directly in `directory`
    ///
    /// A missing directory yields no sources.
    pub fn scan_directory(directory: &Path) -> Result<Vec<Self>> {
        if !directory.exists() {
            return Ok(Vec::new());
        }
        let mut sources = Vec::new();
        for entry in std::fs::read_dir(directory)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) == Some(std::env::consts::DLL_EXTENSION) {
                sources.push(Self::new(path));
            }
        }
        sources.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(sources)
    }

    /// Library path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the library has been opened by a previous load
    pub fn is_loaded(&self) -> bool {
        self.library.get().is_some()
    }
}

impl ComponentSource for DynamicLibrarySource {
    fn name(&self) -> &str {
        &self.name
    }

    #[allow(unsafe_code)]
    fn load(&self) -> Result<Vec<TypeResolution>> {
        // SAFETY: component libraries are trusted to export the entry symbol
        // with the `ComponentEntryFn` signature and to be built against the
        // same host crates. Type sets hold their sources, so the library stays
        // loaded while any of its descriptors is reachable.
        let library = self.library.get_or_try_init(|| unsafe {
            Library::new(&self.path).map_err(|e| {
                Error::source_load(&self.name, format!("failed to load {}: {e}", self.path.display()))
            })
        })?;
        let descriptors = unsafe {
            let entry: libloading::Symbol<ComponentEntryFn> = library
                .get(COMPONENT_ENTRY_SYMBOL.as_bytes())
                .map_err(|e| {
                    Error::source_load(
                        &self.name,
                        format!("missing entry point '{COMPONENT_ENTRY_SYMBOL}': {e}"),
                    )
                })?;
            entry()
        };
        debug!(source = %self.name, types = descriptors.len(), "Loaded component library");
        Ok(descriptors.iter().map(TypeResolution::Resolved).collect())
    }
}
