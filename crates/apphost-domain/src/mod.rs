//! # Domain Layer
//!
//! Core types shared by every layer of the application host.
//!
//! The domain layer holds no wiring logic. It defines what the host talks
//! about: the error taxonomy, host events, value objects, and the capability
//! ports that discoverable components and core services implement.
//!
//! ## Module Categories
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`error`] | Error taxonomy and `Result` alias |
//! | [`events`] | Host events (pending restart, update, state transitions) |
//! | [`ports`] | Capability traits (plugins, tasks, optional features, core services) |
//! | [`value_objects`] | Paths, configuration snapshots, plugin and update records |
//! | [`constants`] | Domain constants |

pub mod constants;
pub mod error;
pub mod events;
pub mod ports;
pub mod value_objects;

pub use error::{Error, Result};
pub use events::HostEvent;
pub use value_objects::HostState;
