//! Source tool handler
//!
//! Handles: symbolSource, fileContent

use super::parse_args;
use crate::tools::{ToolHandler, ToolHandlerContext};
use async_trait::async_trait;
use lens_foundation::paths::normalize_path;
use lens_foundation::protocol::mcp::ToolCall;
use lens_foundation::{LensError, LensResult};
use serde::Deserialize;
use std::path::PathBuf;

/// Hard ceiling for raw file reads.
const MAX_FILE_CONTENT_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SymbolSourceRequest {
    path: PathBuf,
    symbol_name: String,
    #[serde(default)]
    containing_type: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileContentRequest {
    #[serde(default)]
    path: Option<PathBuf>,
    file_path: PathBuf,
    /// 1-based, inclusive
    #[serde(default)]
    start_line: Option<u32>,
    /// 1-based, inclusive
    #[serde(default)]
    end_line: Option<u32>,
}

pub struct SourceHandler;

#[async_trait]
impl ToolHandler for SourceHandler {
    fn tool_names(&self) -> &[&str] {
        &["symbolSource", "fileContent"]
    }

    async fn handle_tool_call(
        &self,
        context: &ToolHandlerContext,
        tool_call: &ToolCall,
    ) -> LensResult<String> {
        match tool_call.name.as_str() {
            "symbolSource" => {
                let request: SymbolSourceRequest = parse_args(tool_call)?;
                let result = context
                    .query
                    .symbol_source(
                        &request.path,
                        &request.symbol_name,
                        request.containing_type.as_deref(),
                        &context.cancel,
                    )
                    .await?;
                let mut out = format!(
                    "{} [{}:{}]\n",
                    result.signature, result.file_path, result.line
                );
                match result.source_body {
                    Some(body) => {
                        out.push_str(&body);
                        if !body.ends_with('\n') {
                            out.push('\n');
                        }
                    }
                    None => out.push_str("(no source body recorded)\n"),
                }
                Ok(out)
            }
            "fileContent" => {
                let request: FileContentRequest = parse_args(tool_call)?;
                file_content(&request).await
            }
            other => Err(LensError::invalid_input(format!("unexpected tool {other}"))),
        }
    }
}

/// Raw file read with 1-based line numbers prepended to each line.
async fn file_content(request: &FileContentRequest) -> LensResult<String> {
    let resolved = if request.file_path.is_absolute() {
        request.file_path.clone()
    } else {
        match &request.path {
            Some(solution_path) => {
                let normalized = normalize_path(solution_path);
                normalized
                    .parent()
                    .map(|dir| dir.join(&request.file_path))
                    .unwrap_or_else(|| request.file_path.clone())
            }
            None => request.file_path.clone(),
        }
    };

    let metadata = tokio::fs::metadata(&resolved).await.map_err(|e| {
        LensError::not_found(format!("file {} not found: {}", resolved.display(), e))
    })?;
    if metadata.len() > MAX_FILE_CONTENT_BYTES {
        return Err(LensError::too_large(format!(
            "file {} is {} bytes; the limit is {} bytes (5 MiB)",
            resolved.display(),
            metadata.len(),
            MAX_FILE_CONTENT_BYTES
        )));
    }

    let text = tokio::fs::read_to_string(&resolved).await.map_err(|e| {
        LensError::analysis_failed(format!("cannot read {}: {}", resolved.display(), e))
    })?;

    let start = request.start_line.unwrap_or(1);
    if start < 1 {
        return Err(LensError::invalid_input("startLine must be >= 1"));
    }
    let end = request.end_line;
    if let Some(end_line) = end {
        if end_line < start {
            return Err(LensError::invalid_input(
                "endLine must be greater than or equal to startLine",
            ));
        }
    }

    let mut out = String::new();
    for (index, line) in text.lines().enumerate() {
        let line_number = (index + 1) as u32;
        if line_number < start {
            continue;
        }
        if let Some(end_line) = end {
            if line_number > end_line {
                break;
            }
        }
        out.push_str(&format!("{line_number}: {line}\n"));
    }
    Ok(out)
}
