//! # Application Layer
//!
//! The composition machinery of the application host:
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`catalog`] | Component sources, type descriptors and the discovered type set |
//! | [`registry`] | Dependency registry keyed by capability |
//! | [`exporter`] | Builds every catalog type implementing a capability |
//! | [`lifecycle`] | Tracks releasable resources and disposes them exactly once |
//!
//! ## Data Flow
//!
//! ```text
//! ComponentSource ─load()─▶ TypeCatalog ─concrete types─▶ ComponentExporter
//!                                                             │
//!                              ServiceRegistry ◀──resolve─────┤
//!                                     │                       │
//!                                     └──track──▶ LifetimeManager ◀──track──┘
//! ```

pub mod catalog;
pub mod exporter;
pub mod lifecycle;
pub mod registry;

pub use catalog::{
    COMPONENT_TYPES, CapabilityKey, ComponentSource, Export, InMemorySource, Instance,
    StaticSource, TypeCatalog, TypeDescriptor, TypeKind, TypeResolution, TypeSet,
};
pub use exporter::{ComponentExporter, ConstructionFailure, ExportOutcome, panic_message};
pub use lifecycle::{DisposalReport, LifetimeManager};
pub use registry::ServiceRegistry;
