//! Refactoring engine
//!
//! Write operations over a solution: rename, extract-interface,
//! implement-interface, change-signature. Rename goes through the
//! provider's rename service; the other three are text splices located
//! with the lightweight syntax facility. Every operation publishes
//! atomically through the workspace manager (or writes and invalidates,
//! for operations that create files) so the next read reloads from disk.

pub mod change_signature;
pub mod extract_interface;
pub mod implement_interface;
pub mod params;
pub mod rename;

pub use change_signature::{change_signature, ChangeSignatureRequest};
pub use extract_interface::{extract_interface, ExtractInterfaceRequest};
pub use implement_interface::{implement_interface, ImplementInterfaceRequest};
pub use rename::{rename, RenameRequest};

use once_cell::sync::Lazy;
use regex::Regex;

/// Identifier grammar: one optional leading `@`, a letter or underscore,
/// then letters / decimal digits / underscores.
static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^@?[A-Za-z_][A-Za-z0-9_]*$").expect("identifier regex"));

pub(crate) fn is_valid_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}
