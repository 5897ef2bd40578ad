//! Type descriptors and capability keys
//!
//! A [`TypeDescriptor`] is the build-time registration record of one
//! implementation type. Each [`Export`] on it says "this type can be built
//! as capability X" and carries the constructor that does it.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use apphost_domain::error::Result;

use crate::registry::ServiceRegistry;

/// Identity of an abstract capability (usually a trait object type)
///
/// Equality and hashing use only the [`TypeId`]; the name is carried for
/// diagnostics.
#[derive(Clone, Copy)]
pub struct CapabilityKey {
    id: TypeId,
    name: &'static str,
}

impl CapabilityKey {
    /// Key for capability `T`, e.g. `CapabilityKey::of::<dyn Plugin>()`
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Readable capability name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Underlying type identity
    pub fn type_id(&self) -> TypeId {
        self.id
    }
}

impl PartialEq for CapabilityKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for CapabilityKey {}

impl Hash for CapabilityKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for CapabilityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CapabilityKey").field(&self.name).finish()
    }
}

impl fmt::Display for CapabilityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A type-erased, shared component instance
///
/// Holds an `Arc<T>` where `T` is the capability the instance was built as.
pub struct Instance {
    value: Box<dyn Any + Send + Sync>,
    capability: CapabilityKey,
}

impl Instance {
    /// Erase an instance built as capability `T`
    pub fn new<T: ?Sized + Send + Sync + 'static>(value: Arc<T>) -> Self {
        Self {
            value: Box::new(value),
            capability: CapabilityKey::of::<T>(),
        }
    }

    /// The capability this instance was built as
    pub fn capability(&self) -> CapabilityKey {
        self.capability
    }

    /// Recover the instance as capability `T`
    ///
    /// Returns the untouched instance when it was built as another capability.
    pub fn downcast<T: ?Sized + Send + Sync + 'static>(self) -> std::result::Result<Arc<T>, Self> {
        let capability = self.capability;
        match self.value.downcast::<Arc<T>>() {
            Ok(value) => Ok(*value),
            Err(value) => Err(Self { value, capability }),
        }
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("capability", &self.capability)
            .finish_non_exhaustive()
    }
}

/// One capability a type can be constructed as
pub struct Export {
    /// Capability produced by [`Export::construct`]
    pub capability: fn() -> CapabilityKey,
    /// Build the instance, resolving dependencies from the registry
    pub construct: fn(&ServiceRegistry) -> Result<Instance>,
}

impl Export {
    /// Whether this export produces capability `key`
    pub fn provides(&self, key: CapabilityKey) -> bool {
        (self.capability)() == key
    }
}

impl fmt::Debug for Export {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Export")
            .field("capability", &(self.capability)())
            .finish_non_exhaustive()
    }
}

/// Kind of a described type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// A constructible implementation type
    Class,
    /// An abstract capability definition
    Interface,
    /// A plain value type
    Value,
}

/// Registration record of one type contributed by a component source
///
/// ```ignore
/// #[linkme::distributed_slice(COMPONENT_TYPES)]
/// static WEATHER_PLUGIN: TypeDescriptor = TypeDescriptor {
///     name: "WeatherPlugin",
///     source: "weather",
///     kind: TypeKind::Class,
///     is_abstract: false,
///     is_generic_definition: false,
///     exports: &[Export {
///         capability: CapabilityKey::of::<dyn Plugin>,
///         construct: |registry| Ok(Instance::new::<dyn Plugin>(Arc::new(WeatherPlugin::new(registry)?))),
///     }],
/// };
/// ```
#[derive(Debug)]
pub struct TypeDescriptor {
    /// Type name, used in logs and diagnostics
    pub name: &'static str,
    /// Name of the component source that contributes the type
    pub source: &'static str,
    /// Kind of type
    pub kind: TypeKind,
    /// Abstract types are never instantiated
    pub is_abstract: bool,
    /// Open generic definitions are never instantiated
    pub is_generic_definition: bool,
    /// Capabilities the type can be constructed as
    pub exports: &'static [Export],
}

impl TypeDescriptor {
    /// Class kind, not abstract, not an open generic definition
    pub fn is_concrete(&self) -> bool {
        self.kind == TypeKind::Class && !self.is_abstract && !self.is_generic_definition
    }

    /// The export producing capability `key`, if any
    pub fn export_for(&self, key: CapabilityKey) -> Option<&Export> {
        self.exports.iter().find(|export| export.provides(key))
    }

    /// Whether the type can be constructed as capability `key`
    pub fn implements(&self, key: CapabilityKey) -> bool {
        self.export_for(key).is_some()
    }
}
