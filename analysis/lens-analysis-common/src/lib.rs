//! Shared analysis types and filters
//!
//! Both analyzers (code smells, unused code) exclude the same classes of
//! types: generated code, non-source symbols, attribute-marked framework
//! artifacts, and the program entry point.

pub mod filters;
pub mod types;

pub use filters::{has_excluded_attribute, is_excluded_type, ENTRY_POINT_TYPE};
pub use types::{Smell, SmellSeverity};
