//! Discovered type set

use std::sync::Arc;

use apphost_domain::error::Error;

use super::descriptor::{CapabilityKey, Export, TypeDescriptor};
use super::source::ComponentSource;

/// A source that failed to load during a discovery pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedSource {
    /// Source name
    pub name: String,
    /// Load failure
    pub reason: String,
}

/// A type dropped from a loaded source because it did not resolve
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedType {
    /// Source the type belongs to
    pub source: String,
    /// Type name
    pub type_name: String,
    /// Resolution failure
    pub reason: String,
}

impl UnresolvedType {
    /// The failure as a host error
    pub fn to_error(&self) -> Error {
        Error::type_resolution(&self.type_name, &self.reason)
    }
}

/// Result of one discovery pass
///
/// Immutable once built. A new pass builds a new set.
#[derive(Default)]
pub struct TypeSet {
    all: Vec<&'static TypeDescriptor>,
    concrete: Vec<&'static TypeDescriptor>,
    failed_sources: Vec<FailedSource>,
    unresolved: Vec<UnresolvedType>,
    // Keeps sources that own the descriptor memory (shared libraries) alive
    sources: Vec<Arc<dyn ComponentSource>>,
}

impl TypeSet {
    pub(super) fn new(
        all: Vec<&'static TypeDescriptor>,
        failed_sources: Vec<FailedSource>,
        unresolved: Vec<UnresolvedType>,
        sources: Vec<Arc<dyn ComponentSource>>,
    ) -> Self {
        let concrete = all
            .iter()
            .copied()
            .filter(|descriptor| descriptor.is_concrete())
            .collect();
        Self {
            all,
            concrete,
            failed_sources,
            unresolved,
            sources,
        }
    }

    /// Every resolved type
    pub fn all_types(&self) -> &[&'static TypeDescriptor] {
        &self.all
    }

    /// Instantiable types: class kind, not abstract, not generic
    pub fn concrete_types(&self) -> &[&'static TypeDescriptor] {
        &self.concrete
    }

    /// Sources that failed to load
    pub fn failed_sources(&self) -> &[FailedSource] {
        &self.failed_sources
    }

    /// Types dropped because they did not resolve
    pub fn unresolved_types(&self) -> &[UnresolvedType] {
        &self.unresolved
    }

    /// Number of sources the pass was run over
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Whether a concrete type with this name is present
    pub fn contains_concrete(&self, type_name: &str) -> bool {
        self.concrete.iter().any(|descriptor| descriptor.name == type_name)
    }

    /// Concrete types that can be constructed as `key`, with the matching export
    pub fn exports_of(&self, key: CapabilityKey) -> Vec<(&'static TypeDescriptor, &'static Export)> {
        use rayon::prelude::*;

        self.concrete
            .par_iter()
            .filter_map(|&descriptor| descriptor.export_for(key).map(|export| (descriptor, export)))
            .collect()
    }
}

impl std::fmt::Debug for TypeSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeSet")
            .field("all", &self.all.len())
            .field("concrete", &self.concrete.len())
            .field("failed_sources", &self.failed_sources)
            .field("unresolved", &self.unresolved)
            .finish_non_exhaustive()
    }
}
