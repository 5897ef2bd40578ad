//! Component sources
//!
//! A component source is the unit the catalog loads: a named group of type
//! descriptors. Loading a source may fail as a whole (recorded, the source
//! is skipped) or partially (individual types come back unresolved).

use apphost_domain::error::{Error, Result};

use super::descriptor::TypeDescriptor;
use super::COMPONENT_TYPES;

/// Outcome of resolving one type inside a loaded source
#[derive(Debug, Clone)]
pub enum TypeResolution {
    /// The type resolved and can be queried
    Resolved(&'static TypeDescriptor),
    /// The type could not be resolved and is dropped from the catalog
    Unresolved {
        /// Name of the type
        type_name: String,
        /// Why resolution failed
        reason: String,
    },
}

impl TypeResolution {
    /// Build an unresolved outcome
    pub fn unresolved(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unresolved {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }
}

/// A loadable group of component types
pub trait ComponentSource: Send + Sync {
    /// Source name used in diagnostics
    fn name(&self) -> &str;

    /// Enumerate the types of this source
    fn load(&self) -> Result<Vec<TypeResolution>>;
}

/// Types registered at build time in [`COMPONENT_TYPES`]
#[derive(Debug, Clone)]
pub struct StaticSource {
    name: String,
    filter: Option<String>,
}

impl StaticSource {
    /// Only the registered types contributed under `source`
    pub fn named(source: impl Into<String>) -> Self {
        let source = source.into();
        Self {
            name: source.clone(),
            filter: Some(source),
        }
    }

    /// Every registered type, whatever source contributed it
    pub fn all() -> Self {
        Self {
            name: "static".to_string(),
            filter: None,
        }
    }
}

impl ComponentSource for StaticSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<Vec<TypeResolution>> {
        Ok(COMPONENT_TYPES
            .iter()
            .filter(|descriptor| {
                self.filter
                    .as_deref()
                    .is_none_or(|source| descriptor.source == source)
            })
            .map(TypeResolution::Resolved)
            .collect())
    }
}

/// An explicit list of type outcomes
///
/// Used by embedders that assemble their catalog by hand.
#[derive(Debug, Clone)]
pub struct InMemorySource {
    name: String,
    types: Vec<TypeResolution>,
    load_error: Option<String>,
}

impl InMemorySource {
    /// Create an empty source
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            types: Vec::new(),
            load_error: None,
        }
    }

    /// A source whose load always fails with `message`
    pub fn failing(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            load_error: Some(message.into()),
            ..Self::new(name)
        }
    }

    /// Add a resolved type
    #[must_use]
    pub fn with_type(mut self, descriptor: &'static TypeDescriptor) -> Self {
        self.types.push(TypeResolution::Resolved(descriptor));
        self
    }

    /// Add several resolved types
    #[must_use]
    pub fn with_types(mut self, descriptors: &'static [TypeDescriptor]) -> Self {
        self.types
            .extend(descriptors.iter().map(TypeResolution::Resolved));
        self
    }

    /// Add a type that fails to resolve
    #[must_use]
    pub fn with_unresolved(mut self, type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        self.types.push(TypeResolution::unresolved(type_name, reason));
        self
    }
}

impl ComponentSource for InMemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<Vec<TypeResolution>> {
        match &self.load_error {
            Some(message) => Err(Error::source_load(&self.name, message.as_str())),
            None => Ok(self.types.clone()),
        }
    }
}
