//! Dispatcher: maps JSON-RPC methods onto the tool registry
//!
//! `initialize`, `tools/list` and `tools/call` are the protocol surface.
//! Handler failures become successful responses whose tool result is
//! flagged as an error and carries `Error: <message>` text; only protocol
//! failures (unknown method, malformed params) become JSON-RPC errors.

use async_trait::async_trait;
use lens_config::AppConfig;
use lens_foundation::protocol::mcp::{
    McpError, McpMessage, McpRequest, McpTool, McpToolResult, ToolCall, MCP_PROTOCOL_VERSION,
};
use lens_foundation::{LensError, LensResult};
use lens_handlers::{default_registry, ToolHandlerContext, ToolRegistry};
use lens_semantic::SemanticProvider;
use lens_transport::McpDispatcher;
use lens_workspace::SolutionCache;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub struct Dispatcher {
    cache: Arc<SolutionCache>,
    registry: ToolRegistry,
    tools: Vec<McpTool>,
}

impl Dispatcher {
    pub fn new(cache: Arc<SolutionCache>) -> Self {
        Self {
            cache,
            registry: default_registry(),
            tools: lens_handlers::tool_definitions(),
        }
    }

    async fn handle_request(&self, request: McpRequest) -> LensResult<McpMessage> {
        match request.method.as_str() {
            "initialize" => Ok(McpMessage::success_response(
                request.id,
                json!({
                    "protocolVersion": MCP_PROTOCOL_VERSION,
                    "capabilities": { "tools": {} },
                    "serverInfo": {
                        "name": "lens-server",
                        "version": env!("CARGO_PKG_VERSION"),
                    },
                }),
            )),
            "tools/list" => Ok(McpMessage::success_response(
                request.id,
                json!({ "tools": self.tools }),
            )),
            "tools/call" => {
                let params = request.params.clone().ok_or_else(|| {
                    LensError::invalid_input("tools/call requires params")
                })?;
                let tool_call: ToolCall = serde_json::from_value(params)?;
                debug!(tool = %tool_call.name, "Dispatching tool call");

                let context =
                    ToolHandlerContext::new(self.cache.clone(), CancellationToken::new());
                let result = match self.registry.handle_tool(tool_call, &context).await {
                    Ok(text) => McpToolResult::text(text),
                    Err(e) => McpToolResult::error_text(format!("Error: {e}")),
                };
                Ok(McpMessage::success_response(
                    request.id,
                    serde_json::to_value(result)
                        .map_err(|e| LensError::analysis_failed(e.to_string()))?,
                ))
            }
            other => Ok(McpMessage::error_response(
                request.id,
                McpError::method_not_found(other),
            )),
        }
    }
}

#[async_trait]
impl McpDispatcher for Dispatcher {
    async fn dispatch(&self, message: McpMessage) -> LensResult<McpMessage> {
        match message {
            McpMessage::Request(request) => self.handle_request(request).await,
            other => Err(LensError::invalid_input(format!(
                "expected a request, got: {other:?}"
            ))),
        }
    }
}

/// Wire the provider, workspace cache and registry into a dispatcher.
pub fn create_dispatcher(
    provider: Arc<dyn SemanticProvider>,
    config: &AppConfig,
) -> Arc<Dispatcher> {
    let cache = Arc::new(SolutionCache::new(
        provider,
        Duration::from_secs(config.workspace.staleness_window_secs),
    ));
    Arc::new(Dispatcher::new(cache))
}
