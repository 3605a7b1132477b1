//! Hierarchy tool handler
//!
//! Handles: findDerivedTypes, typeHierarchy, findOverrides

use super::parse_args;
use crate::tools::{ToolHandler, ToolHandlerContext};
use async_trait::async_trait;
use lens_foundation::protocol::mcp::ToolCall;
use lens_foundation::{LensError, LensResult};
use lens_query::format;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TypeRequest {
    path: PathBuf,
    type_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OverridesRequest {
    path: PathBuf,
    type_name: String,
    method_name: String,
}

pub struct HierarchyHandler;

#[async_trait]
impl ToolHandler for HierarchyHandler {
    fn tool_names(&self) -> &[&str] {
        &["findDerivedTypes", "typeHierarchy", "findOverrides"]
    }

    async fn handle_tool_call(
        &self,
        context: &ToolHandlerContext,
        tool_call: &ToolCall,
    ) -> LensResult<String> {
        match tool_call.name.as_str() {
            "findDerivedTypes" => {
                let request: TypeRequest = parse_args(tool_call)?;
                let results = context
                    .query
                    .find_derived_types(&request.path, &request.type_name, &context.cancel)
                    .await?;
                if results.is_empty() {
                    return Ok(format!(
                        "No derived types found for '{}'.\n",
                        request.type_name
                    ));
                }
                Ok(format::format_symbol_list(&results))
            }
            "typeHierarchy" => {
                let request: TypeRequest = parse_args(tool_call)?;
                let hierarchy = context
                    .query
                    .type_hierarchy(&request.path, &request.type_name, &context.cancel)
                    .await?;
                let mut out = format!("{} ({})\n", hierarchy.type_name, hierarchy.kind);
                if hierarchy.base_types.is_empty() {
                    out.push_str("  base: (none)\n");
                } else {
                    out.push_str(&format!("  base: {}\n", hierarchy.base_types.join(" -> ")));
                }
                if hierarchy.interfaces.is_empty() {
                    out.push_str("  interfaces: (none)\n");
                } else {
                    out.push_str(&format!(
                        "  interfaces: {}\n",
                        hierarchy.interfaces.join(", ")
                    ));
                }
                Ok(out)
            }
            "findOverrides" => {
                let request: OverridesRequest = parse_args(tool_call)?;
                let results = context
                    .query
                    .find_overrides(
                        &request.path,
                        &request.type_name,
                        &request.method_name,
                        &context.cancel,
                    )
                    .await?;
                if results.is_empty() {
                    return Ok(format!(
                        "No overrides found for '{}.{}'.\n",
                        request.type_name, request.method_name
                    ));
                }
                Ok(format::format_symbol_list(&results))
            }
            other => Err(LensError::invalid_input(format!("unexpected tool {other}"))),
        }
    }
}
