//! Foundation layer for Lens
//!
//! This crate provides the building blocks shared by every other workspace
//! crate: the error vocabulary, the transport result types, the JSON-RPC
//! message model, and filesystem path utilities. It has no dependencies on
//! other lens-* crates to prevent circular dependencies.

pub mod error;
pub mod paths;
pub mod protocol;

pub use error::{LensError, LensResult};
