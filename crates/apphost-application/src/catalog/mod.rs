//! Type Catalog
//!
//! Loads component sources and partitions their types into "all types" and
//! "concrete, instantiable types". Every later capability lookup queries the
//! concrete view of the latest discovery pass.
//!
//! ## Failure tolerance
//!
//! | Failure | Effect |
//! |---------|--------|
//! | Source fails to load | Recorded in [`TypeSet::failed_sources`], source skipped |
//! | Type fails to resolve | Recorded in [`TypeSet::unresolved_types`], the rest of the source kept |
//!
//! Neither aborts the pass.

pub mod descriptor;
#[cfg(feature = "dynamic-sources")]
pub mod dynamic;
pub mod source;
pub mod type_set;

use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::{debug, info, warn};

pub use descriptor::{CapabilityKey, Export, Instance, TypeDescriptor, TypeKind};
#[cfg(feature = "dynamic-sources")]
pub use dynamic::DynamicLibrarySource;
pub use source::{ComponentSource, InMemorySource, StaticSource, TypeResolution};
pub use type_set::{FailedSource, TypeSet, UnresolvedType};

/// Component types registered at build time
///
/// Crates contribute types with
/// `#[linkme::distributed_slice(COMPONENT_TYPES)]`.
#[linkme::distributed_slice]
pub static COMPONENT_TYPES: [TypeDescriptor] = [..];

/// Holds the result of the latest discovery pass
///
/// Reads are lock-free snapshots; [`TypeCatalog::discover`] swaps in a
/// freshly built [`TypeSet`].
pub struct TypeCatalog {
    types: ArcSwap<TypeSet>,
}

impl TypeCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self {
            types: ArcSwap::from_pointee(TypeSet::default()),
        }
    }

    /// Load every source and replace the current type set
    ///
    /// The pass is destructive, not additive: running it twice over the
    /// same sources yields the same membership.
    pub fn discover(&self, sources: &[Arc<dyn ComponentSource>]) -> Arc<TypeSet> {
        let mut all = Vec::new();
        let mut failed_sources = Vec::new();
        let mut unresolved = Vec::new();

        for source in sources {
            let name = source.name().to_string();
            match source.load() {
                Ok(resolutions) => {
                    let before = all.len();
                    for resolution in resolutions {
                        match resolution {
                            TypeResolution::Resolved(descriptor) => all.push(descriptor),
                            TypeResolution::Unresolved { type_name, reason } => {
                                let dropped = UnresolvedType {
                                    source: name.clone(),
                                    type_name,
                                    reason,
                                };
                                warn!(source = %name, error = %dropped.to_error(), "Type could not be resolved, skipping");
                                unresolved.push(dropped);
                            }
                        }
                    }
                    info!(source = %name, types = all.len() - before, "Loaded component source");
                }
                Err(e) => {
                    warn!(source = %name, error = %e, "Failed to load component source, skipping");
                    failed_sources.push(FailedSource {
                        name,
                        reason: e.to_string(),
                    });
                }
            }
        }

        let set = Arc::new(TypeSet::new(
            all,
            failed_sources,
            unresolved,
            sources.to_vec(),
        ));
        debug!(
            all = set.all_types().len(),
            concrete = set.concrete_types().len(),
            failed = set.failed_sources().len(),
            "Discovery pass complete"
        );
        self.types.store(Arc::clone(&set));
        set
    }

    /// Snapshot of the latest discovery pass
    pub fn type_set(&self) -> Arc<TypeSet> {
        self.types.load_full()
    }

    /// Names of the sources that failed to load in the latest pass
    pub fn failed_sources(&self) -> Vec<String> {
        self.types
            .load()
            .failed_sources()
            .iter()
            .map(|failed| failed.name.clone())
            .collect()
    }

    /// Types dropped in the latest pass
    pub fn unresolved_types(&self) -> Vec<UnresolvedType> {
        self.types.load().unresolved_types().to_vec()
    }

    /// Concrete types constructible as capability `key`
    pub fn export_types(&self, key: CapabilityKey) -> Vec<(&'static TypeDescriptor, &'static Export)> {
        self.types.load().exports_of(key)
    }
}

impl Default for TypeCatalog {
    fn default() -> Self {
        Self::new()
    }
}
