//! Transport layer
//!
//! One JSON message per line on stdin/stdout; logs go to stderr so the
//! protocol channel stays clean. One request is in flight at a time.

pub mod stdio;

pub use stdio::{start_stdio_server, StdioTransport};

use async_trait::async_trait;
use lens_foundation::protocol::mcp::McpMessage;
use lens_foundation::LensResult;

/// Message dispatcher the transport hands requests to.
#[async_trait]
pub trait McpDispatcher: Send + Sync {
    /// Dispatch one request and produce the response message.
    async fn dispatch(&self, message: McpMessage) -> LensResult<McpMessage>;
}
