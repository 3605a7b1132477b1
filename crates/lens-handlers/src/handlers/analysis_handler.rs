//! Analysis tool handler
//!
//! Handles: findUnusedCode, findCodeSmells

use super::parse_args;
use crate::tools::{ToolHandler, ToolHandlerContext};
use async_trait::async_trait;
use lens_analysis_dead_code::{find_unused_code, UnusedCodeConfig, UnusedScope};
use lens_analysis_smells::{find_code_smells, SmellCategory, SmellConfig};
use lens_foundation::protocol::mcp::ToolCall;
use lens_foundation::{LensError, LensResult};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UnusedCodeArgs {
    path: PathBuf,
    #[serde(default = "default_scope")]
    scope: String,
    #[serde(default)]
    project_name: Option<String>,
}

fn default_scope() -> String {
    "all".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CodeSmellsArgs {
    path: PathBuf,
    #[serde(default = "default_category")]
    category: String,
    #[serde(default)]
    project_name: Option<String>,
    #[serde(default)]
    deep: bool,
}

fn default_category() -> String {
    "all".to_string()
}

pub struct AnalysisHandler;

#[async_trait]
impl ToolHandler for AnalysisHandler {
    fn tool_names(&self) -> &[&str] {
        &["findUnusedCode", "findCodeSmells"]
    }

    async fn handle_tool_call(
        &self,
        context: &ToolHandlerContext,
        tool_call: &ToolCall,
    ) -> LensResult<String> {
        match tool_call.name.as_str() {
            "findUnusedCode" => {
                let args: UnusedCodeArgs = parse_args(tool_call)?;
                let config = UnusedCodeConfig {
                    scope: UnusedScope::parse(&args.scope)?,
                    project: args.project_name,
                };
                find_unused_code(&context.cache, &args.path, &config, &context.cancel).await
            }
            "findCodeSmells" => {
                let args: CodeSmellsArgs = parse_args(tool_call)?;
                let config = SmellConfig {
                    category: SmellCategory::parse(&args.category)?,
                    project: args.project_name,
                    deep: args.deep,
                };
                find_code_smells(&context.cache, &args.path, &config, &context.cancel).await
            }
            other => Err(LensError::invalid_input(format!("unexpected tool {other}"))),
        }
    }
}
