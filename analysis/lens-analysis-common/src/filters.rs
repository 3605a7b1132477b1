//! Type-exclusion filters shared by all analyzers

use lens_semantic::{Symbol, SymbolKind};
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Name of the program entry-point type; never analyzed.
pub const ENTRY_POINT_TYPE: &str = "Program";

/// Attributes that exclude a type or member from analysis: test
/// frameworks, serialization markers, API-framework route markers, the
/// obsolete marker, and this tool's own registration attributes. The set
/// is fixed at build time.
static EXCLUDED_ATTRIBUTES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // Test frameworks
        "TestClass",
        "TestMethod",
        "TestFixture",
        "Test",
        "Fact",
        "Theory",
        "SetUp",
        "TearDown",
        // Serialization markers
        "Serializable",
        "DataContract",
        "DataMember",
        "JsonConverter",
        // API-framework route markers
        "ApiController",
        "Controller",
        "Route",
        "HttpGet",
        "HttpPost",
        "HttpPut",
        "HttpDelete",
        "HttpPatch",
        // Deprecation and generated code
        "Obsolete",
        "GeneratedCode",
        "CompilerGenerated",
        // Lens tool registration
        "LensTool",
        "LensToolType",
    ]
    .into_iter()
    .collect()
});

/// Attribute names may arrive with or without the `Attribute` suffix.
pub fn has_excluded_attribute(symbol: &Symbol) -> bool {
    symbol.attributes.iter().any(|attribute| {
        let bare = attribute.strip_suffix("Attribute").unwrap_or(attribute);
        EXCLUDED_ATTRIBUTES.contains(bare)
    })
}

/// A type is excluded from every check when any of: not source-defined,
/// implicitly declared, kind is enum / delegate / interface, it is the
/// entry-point type, or it carries an excluded attribute.
pub fn is_excluded_type(symbol: &Symbol) -> bool {
    if !symbol.is_in_source() || symbol.is_compiler_generated() {
        return true;
    }
    if matches!(
        symbol.kind,
        SymbolKind::Enum | SymbolKind::Delegate | SymbolKind::Interface
    ) {
        return true;
    }
    if symbol.name == ENTRY_POINT_TYPE {
        return true;
    }
    has_excluded_attribute(symbol)
}
