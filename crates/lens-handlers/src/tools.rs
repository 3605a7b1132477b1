//! Handler trait and per-request context

use async_trait::async_trait;
use lens_foundation::protocol::mcp::ToolCall;
use lens_foundation::LensResult;
use lens_query::QueryEngine;
use lens_workspace::SolutionCache;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Context handed to a handler for one request.
pub struct ToolHandlerContext {
    pub cache: Arc<SolutionCache>,
    pub query: QueryEngine,
    /// Cancellation signal for this request, checked at suspension points
    pub cancel: CancellationToken,
}

impl ToolHandlerContext {
    pub fn new(cache: Arc<SolutionCache>, cancel: CancellationToken) -> Self {
        Self {
            query: QueryEngine::new(cache.clone()),
            cache,
            cancel,
        }
    }
}

/// Unified trait for all tool handlers. Handlers return the plain-text
/// body of a successful tool result; failures are `LensError` values the
/// dispatcher renders as `Error: <message>`.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// The tool names this handler is responsible for.
    fn tool_names(&self) -> &[&str];

    /// Handle one tool call.
    async fn handle_tool_call(
        &self,
        context: &ToolHandlerContext,
        tool_call: &ToolCall,
    ) -> LensResult<String>;
}
