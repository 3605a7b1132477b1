//! Tool handlers
//!
//! Each handler owns a family of tools from the request surface and maps
//! tool arguments onto the query / refactor / analysis engines. The
//! registry is a hand-registered table; there is no runtime discovery.

pub mod handlers;
pub mod tool_definitions;
pub mod tool_registry;
pub mod tools;

pub use tool_definitions::tool_definitions;
pub use tool_registry::ToolRegistry;
pub use tools::{ToolHandler, ToolHandlerContext};

use handlers::{
    AnalysisHandler, HierarchyHandler, ProjectHandler, ReferencesHandler, RefactorHandler,
    SourceHandler, SymbolsHandler,
};
use std::sync::Arc;

/// Build the registry with every handler the server exposes.
pub fn default_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register_with_name(Arc::new(ProjectHandler), "ProjectHandler");
    registry.register_with_name(Arc::new(SymbolsHandler), "SymbolsHandler");
    registry.register_with_name(Arc::new(HierarchyHandler), "HierarchyHandler");
    registry.register_with_name(Arc::new(ReferencesHandler), "ReferencesHandler");
    registry.register_with_name(Arc::new(SourceHandler), "SourceHandler");
    registry.register_with_name(Arc::new(RefactorHandler), "RefactorHandler");
    registry.register_with_name(Arc::new(AnalysisHandler), "AnalysisHandler");
    registry
}
