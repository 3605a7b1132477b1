//! Handler implementations, grouped by tool family

mod analysis_handler;
mod hierarchy_handler;
mod project_handler;
mod refactor_handler;
mod references_handler;
mod source_handler;
mod symbols_handler;

pub use analysis_handler::AnalysisHandler;
pub use hierarchy_handler::HierarchyHandler;
pub use project_handler::ProjectHandler;
pub use refactor_handler::RefactorHandler;
pub use references_handler::ReferencesHandler;
pub use source_handler::SourceHandler;
pub use symbols_handler::SymbolsHandler;

use lens_foundation::protocol::mcp::ToolCall;
use lens_foundation::LensResult;
use serde::de::DeserializeOwned;

/// Deserialize a tool call's arguments; missing arguments behave like an
/// empty object so required-field errors stay readable.
pub(crate) fn parse_args<T: DeserializeOwned>(tool_call: &ToolCall) -> LensResult<T> {
    let value = tool_call
        .arguments
        .clone()
        .unwrap_or_else(|| serde_json::Value::Object(Default::default()));
    Ok(serde_json::from_value(value)?)
}
