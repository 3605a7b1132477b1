//! In-process client over the dispatcher

use lens_config::AppConfig;
use lens_foundation::protocol::mcp::{McpContentItem, McpMessage, McpRequest, McpToolResult};
use lens_provider::SnapshotProvider;
use lens_server::Dispatcher;
use lens_transport::McpDispatcher;
use serde_json::{json, Value};
use std::sync::Arc;

/// Drives the dispatcher exactly like the stdio loop would.
pub struct TestClient {
    dispatcher: Arc<Dispatcher>,
    next_id: i64,
}

impl TestClient {
    pub fn new(provider: Arc<SnapshotProvider>) -> Self {
        Self::with_config(provider, AppConfig::default())
    }

    pub fn with_config(provider: Arc<SnapshotProvider>, config: AppConfig) -> Self {
        Self {
            dispatcher: lens_server::create_dispatcher(provider, &config),
            next_id: 1,
        }
    }

    async fn request(&mut self, method: &str, params: Value) -> McpMessage {
        let id = self.next_id;
        self.next_id += 1;
        let request = McpMessage::Request(McpRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(json!(id)),
            method: method.to_string(),
            params: Some(params),
        });
        self.dispatcher
            .dispatch(request)
            .await
            .expect("dispatch should not fail at the protocol level")
    }

    /// Call one tool; returns `(text, is_error)`.
    pub async fn call_tool(&mut self, name: &str, arguments: Value) -> (String, bool) {
        let response = self
            .request("tools/call", json!({ "name": name, "arguments": arguments }))
            .await;
        let McpMessage::Response(response) = response else {
            panic!("expected a response");
        };
        let result: McpToolResult =
            serde_json::from_value(response.result.expect("tool result")).unwrap();
        let McpContentItem::Text { text } = result.content.into_iter().next().expect("content")
        else {
            panic!("expected text content");
        };
        (text, result.is_error.unwrap_or(false))
    }

    /// Call one tool and expect success.
    pub async fn call_tool_ok(&mut self, name: &str, arguments: Value) -> String {
        let (text, is_error) = self.call_tool(name, arguments).await;
        assert!(!is_error, "tool {name} failed: {text}");
        text
    }

    pub async fn initialize(&mut self) -> Value {
        let response = self.request("initialize", json!({})).await;
        let McpMessage::Response(response) = response else {
            panic!("expected a response");
        };
        response.result.expect("initialize result")
    }

    pub async fn list_tools(&mut self) -> Vec<String> {
        let response = self.request("tools/list", json!({})).await;
        let McpMessage::Response(response) = response else {
            panic!("expected a response");
        };
        let tools = response.result.expect("tools result");
        tools["tools"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap().to_string())
            .collect()
    }
}
