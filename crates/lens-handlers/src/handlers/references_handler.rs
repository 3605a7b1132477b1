//! References tool handler
//!
//! Handles: findReferences (modes: all, callers, usages)

use super::parse_args;
use crate::tools::{ToolHandler, ToolHandlerContext};
use async_trait::async_trait;
use lens_foundation::protocol::mcp::ToolCall;
use lens_foundation::protocol::Detail;
use lens_foundation::{LensError, LensResult};
use lens_query::references::{self, ReferenceMode, ReferenceQuery};
use lens_query::format;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FindReferencesRequest {
    path: PathBuf,
    symbol_name: String,
    #[serde(default)]
    containing_type: Option<String>,
    #[serde(default)]
    project_scope: Option<String>,
    #[serde(default)]
    detail: Detail,
    #[serde(default = "default_mode")]
    mode: String,
}

fn default_mode() -> String {
    "all".to_string()
}

pub struct ReferencesHandler;

#[async_trait]
impl ToolHandler for ReferencesHandler {
    fn tool_names(&self) -> &[&str] {
        &["findReferences"]
    }

    async fn handle_tool_call(
        &self,
        context: &ToolHandlerContext,
        tool_call: &ToolCall,
    ) -> LensResult<String> {
        match tool_call.name.as_str() {
            "findReferences" => {
                let request: FindReferencesRequest = parse_args(tool_call)?;
                let query = ReferenceQuery {
                    symbol_name: request.symbol_name.clone(),
                    containing_type: request.containing_type,
                    project_scope: request.project_scope,
                    detail: request.detail,
                    mode: ReferenceMode::parse(&request.mode)?,
                };
                let results = references::find_references(
                    &context.cache,
                    &request.path,
                    &query,
                    &context.cancel,
                )
                .await?;
                if results.is_empty() {
                    return Ok(format!(
                        "No references found for '{}'.\n",
                        request.symbol_name
                    ));
                }
                let mut out = format!(
                    "References to '{}' ({} hits):\n",
                    request.symbol_name,
                    results.len()
                );
                out.push_str(&format::format_reference_list(&results));
                Ok(out)
            }
            other => Err(LensError::invalid_input(format!("unexpected tool {other}"))),
        }
    }
}
