//! Query layer: symbol resolution, reference search, read operations,
//! and the result formatter
//!
//! Every operation here is read-only. A request acquires a solution handle
//! from the workspace cache, walks the symbol graph (and asks the provider
//! for whole-solution searches), shapes transport values, and renders them
//! as compact line-oriented text.

pub mod format;
pub mod queries;
pub mod references;
pub mod resolver;

pub use queries::QueryEngine;
pub use references::{ReferenceMode, ReferenceQuery};
