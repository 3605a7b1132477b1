//! Refactor tool handler
//!
//! Handles: rename, extractInterface, implementInterface, changeSignature

use super::parse_args;
use crate::tools::{ToolHandler, ToolHandlerContext};
use async_trait::async_trait;
use lens_foundation::protocol::mcp::ToolCall;
use lens_foundation::{LensError, LensResult};
use lens_refactor::{
    change_signature, extract_interface, implement_interface, rename, ChangeSignatureRequest,
    ExtractInterfaceRequest, ImplementInterfaceRequest, RenameRequest,
};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenameArgs {
    path: PathBuf,
    symbol_name: String,
    new_name: String,
    #[serde(default)]
    containing_type: Option<String>,
    #[serde(default)]
    rename_in_strings: bool,
    #[serde(default)]
    rename_in_comments: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExtractInterfaceArgs {
    path: PathBuf,
    type_name: String,
    #[serde(default)]
    interface_name: Option<String>,
    #[serde(default)]
    apply: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImplementInterfaceArgs {
    path: PathBuf,
    type_name: String,
    #[serde(default)]
    interface_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChangeSignatureArgs {
    path: PathBuf,
    method_name: String,
    #[serde(default)]
    containing_type: Option<String>,
    #[serde(default)]
    add_parameters: Option<String>,
    #[serde(default)]
    remove_parameters: Option<String>,
    #[serde(default)]
    reorder_parameters: Option<String>,
}

pub struct RefactorHandler;

#[async_trait]
impl ToolHandler for RefactorHandler {
    fn tool_names(&self) -> &[&str] {
        &["rename", "extractInterface", "implementInterface", "changeSignature"]
    }

    async fn handle_tool_call(
        &self,
        context: &ToolHandlerContext,
        tool_call: &ToolCall,
    ) -> LensResult<String> {
        match tool_call.name.as_str() {
            "rename" => {
                let args: RenameArgs = parse_args(tool_call)?;
                rename(
                    &context.cache,
                    &args.path,
                    &RenameRequest {
                        symbol_name: args.symbol_name,
                        containing_type: args.containing_type,
                        new_name: args.new_name,
                        rename_in_strings: args.rename_in_strings,
                        rename_in_comments: args.rename_in_comments,
                    },
                    &context.cancel,
                )
                .await
            }
            "extractInterface" => {
                let args: ExtractInterfaceArgs = parse_args(tool_call)?;
                extract_interface(
                    &context.cache,
                    &args.path,
                    &ExtractInterfaceRequest {
                        type_name: args.type_name,
                        interface_name: args.interface_name,
                        apply: args.apply,
                    },
                    &context.cancel,
                )
                .await
            }
            "implementInterface" => {
                let args: ImplementInterfaceArgs = parse_args(tool_call)?;
                implement_interface(
                    &context.cache,
                    &args.path,
                    &ImplementInterfaceRequest {
                        type_name: args.type_name,
                        interface_name: args.interface_name,
                    },
                    &context.cancel,
                )
                .await
            }
            "changeSignature" => {
                let args: ChangeSignatureArgs = parse_args(tool_call)?;
                change_signature(
                    &context.cache,
                    &args.path,
                    &ChangeSignatureRequest {
                        method_name: args.method_name,
                        containing_type: args.containing_type,
                        add_parameters: args.add_parameters,
                        remove_parameters: args.remove_parameters,
                        reorder_parameters: args.reorder_parameters,
                    },
                    &context.cancel,
                )
                .await
            }
            other => Err(LensError::invalid_input(format!("unexpected tool {other}"))),
        }
    }
}
