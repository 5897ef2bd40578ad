//! Shared infrastructure helpers

pub mod timing;

pub use timing::TimedOperation;
