//! Project tool handler
//!
//! Handles: listProjects, projectInfo, listSourceFiles, diagnostics

use super::parse_args;
use crate::tools::{ToolHandler, ToolHandlerContext};
use async_trait::async_trait;
use lens_foundation::protocol::mcp::ToolCall;
use lens_foundation::protocol::ProjectInfo;
use lens_foundation::{LensError, LensResult};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SolutionRequest {
    path: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectScopedRequest {
    path: PathBuf,
    #[serde(default)]
    project_name: Option<String>,
}

pub struct ProjectHandler;

#[async_trait]
impl ToolHandler for ProjectHandler {
    fn tool_names(&self) -> &[&str] {
        &["listProjects", "projectInfo", "listSourceFiles", "diagnostics"]
    }

    async fn handle_tool_call(
        &self,
        context: &ToolHandlerContext,
        tool_call: &ToolCall,
    ) -> LensResult<String> {
        match tool_call.name.as_str() {
            "listProjects" => {
                let request: SolutionRequest = parse_args(tool_call)?;
                let (solution_name, projects) = context
                    .query
                    .list_projects(&request.path, &context.cancel)
                    .await?;
                let mut out = format!(
                    "Solution {solution_name} ({} projects)\n",
                    projects.len()
                );
                for project in &projects {
                    out.push_str(&format!(
                        "  {} ({}, {}) [{}]\n",
                        project.name,
                        project.target_framework,
                        project.output_type,
                        project.file_path
                    ));
                }
                Ok(out)
            }
            "projectInfo" => {
                let request: ProjectScopedRequest = parse_args(tool_call)?;
                let info = context
                    .query
                    .project_info(
                        &request.path,
                        request.project_name.as_deref(),
                        &context.cancel,
                    )
                    .await?;
                Ok(render_project_info(&info))
            }
            "listSourceFiles" => {
                let request: ProjectScopedRequest = parse_args(tool_call)?;
                let files = context
                    .query
                    .source_files(
                        &request.path,
                        request.project_name.as_deref(),
                        &context.cancel,
                    )
                    .await?;
                let mut out = format!("Source files ({}):\n", files.len());
                for file in &files {
                    out.push_str(&format!("  {file}\n"));
                }
                Ok(out)
            }
            "diagnostics" => {
                let request: ProjectScopedRequest = parse_args(tool_call)?;
                let diagnostics = context
                    .query
                    .diagnostics(
                        &request.path,
                        request.project_name.as_deref(),
                        &context.cancel,
                    )
                    .await?;
                if diagnostics.is_empty() {
                    return Ok("No diagnostics (warning or higher).\n".to_string());
                }
                let mut out = String::new();
                for diagnostic in &diagnostics {
                    out.push_str(&format!(
                        "{} {}: {} [{}:{}]\n",
                        diagnostic.severity,
                        diagnostic.id,
                        diagnostic.message,
                        diagnostic.file_path,
                        diagnostic.line
                    ));
                }
                Ok(out)
            }
            other => Err(LensError::invalid_input(format!("unexpected tool {other}"))),
        }
    }
}

fn render_project_info(info: &ProjectInfo) -> String {
    let mut out = format!(
        "Project {}\n  file: {}\n  framework: {}\n  output type: {}\n  source files: {}\n",
        info.name,
        info.file_path,
        info.target_framework,
        info.output_type,
        info.source_file_count
    );
    if info.project_references.is_empty() {
        out.push_str("  project references: (none)\n");
    } else {
        out.push_str(&format!(
            "  project references: {}\n",
            info.project_references.join(", ")
        ));
    }
    if info.package_references.is_empty() {
        out.push_str("  packages: (none)\n");
    } else {
        out.push_str("  packages:\n");
        for package in &info.package_references {
            out.push_str(&format!("    {} {}\n", package.name, package.version));
        }
    }
    out
}
