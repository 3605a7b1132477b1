//! Symbol tool handler
//!
//! Handles: findSymbols, fileSymbols, typeMembers, listNamespaces

use super::parse_args;
use crate::tools::{ToolHandler, ToolHandlerContext};
use async_trait::async_trait;
use lens_foundation::protocol::mcp::ToolCall;
use lens_foundation::protocol::Detail;
use lens_foundation::{LensError, LensResult};
use lens_query::format;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FindSymbolsRequest {
    path: PathBuf,
    query: String,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    exact: bool,
    #[serde(default)]
    detail: Detail,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileSymbolsRequest {
    path: PathBuf,
    file_path: String,
    #[serde(default)]
    depth: u8,
    #[serde(default)]
    detail: Detail,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TypeMembersRequest {
    path: PathBuf,
    type_name: String,
    #[serde(default)]
    detail: Detail,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListNamespacesRequest {
    path: PathBuf,
}

pub struct SymbolsHandler;

#[async_trait]
impl ToolHandler for SymbolsHandler {
    fn tool_names(&self) -> &[&str] {
        &["findSymbols", "fileSymbols", "typeMembers", "listNamespaces"]
    }

    async fn handle_tool_call(
        &self,
        context: &ToolHandlerContext,
        tool_call: &ToolCall,
    ) -> LensResult<String> {
        match tool_call.name.as_str() {
            "findSymbols" => {
                let request: FindSymbolsRequest = parse_args(tool_call)?;
                let results = context
                    .query
                    .find_symbols(
                        &request.path,
                        &request.query,
                        request.kind.as_deref(),
                        request.exact,
                        request.detail,
                        &context.cancel,
                    )
                    .await?;
                if results.is_empty() {
                    return Ok(format!("No symbols found matching '{}'.\n", request.query));
                }
                Ok(format::format_symbol_list(&results))
            }
            "fileSymbols" => {
                let request: FileSymbolsRequest = parse_args(tool_call)?;
                if request.depth > 1 {
                    return Err(LensError::invalid_input("depth must be 0 or 1"));
                }
                let results = context
                    .query
                    .file_symbols(
                        &request.path,
                        &request.file_path,
                        request.depth,
                        request.detail,
                        &context.cancel,
                    )
                    .await?;
                if results.is_empty() {
                    return Ok(format!(
                        "No symbols found in '{}'.\n",
                        request.file_path
                    ));
                }
                Ok(format::format_symbol_list(&results))
            }
            "typeMembers" => {
                let request: TypeMembersRequest = parse_args(tool_call)?;
                let results = context
                    .query
                    .type_members(
                        &request.path,
                        &request.type_name,
                        request.detail,
                        &context.cancel,
                    )
                    .await?;
                if results.is_empty() {
                    return Ok(format!(
                        "Type '{}' has no listable members.\n",
                        request.type_name
                    ));
                }
                Ok(format::format_symbol_list(&results))
            }
            "listNamespaces" => {
                let request: ListNamespacesRequest = parse_args(tool_call)?;
                let namespaces = context
                    .query
                    .list_namespaces(&request.path, &context.cancel)
                    .await?;
                if namespaces.is_empty() {
                    return Ok("No namespaces declared.\n".to_string());
                }
                let mut out = String::new();
                for namespace in &namespaces {
                    out.push_str(namespace);
                    out.push('\n');
                }
                Ok(out)
            }
            other => Err(LensError::invalid_input(format!("unexpected tool {other}"))),
        }
    }
}
