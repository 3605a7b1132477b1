//! Tool handler registry
//!
//! Central table mapping tool names to handlers with automatic routing.

use crate::tools::{ToolHandler, ToolHandlerContext};
use lens_foundation::protocol::mcp::ToolCall;
use lens_foundation::{LensError, LensResult};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Registry for tool handlers providing automatic routing.
pub struct ToolRegistry {
    handlers: HashMap<String, Arc<dyn ToolHandler>>,
    handler_names: HashMap<String, String>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            handler_names: HashMap::new(),
        }
    }

    /// Register every tool of a handler, with the handler type name kept
    /// for diagnostics. Duplicate registrations replace and warn.
    pub fn register_with_name(&mut self, handler: Arc<dyn ToolHandler>, handler_name: &str) {
        for tool_name in handler.tool_names() {
            debug!(
                tool_name = %tool_name,
                handler_name = %handler_name,
                "Registering tool handler"
            );
            if self
                .handlers
                .insert(tool_name.to_string(), handler.clone())
                .is_some()
            {
                warn!(
                    tool_name = %tool_name,
                    "Tool handler replaced (duplicate registration)"
                );
            }
            self.handler_names
                .insert(tool_name.to_string(), handler_name.to_string());
        }
    }

    /// Route a tool call to its handler.
    pub async fn handle_tool(
        &self,
        tool_call: ToolCall,
        context: &ToolHandlerContext,
    ) -> LensResult<String> {
        match self.handlers.get(&tool_call.name) {
            Some(handler) => handler.handle_tool_call(context, &tool_call).await,
            None => Err(LensError::invalid_input(format!(
                "no handler for tool: {}",
                tool_call.name
            ))),
        }
    }

    pub fn has_tool(&self, tool_name: &str) -> bool {
        self.handlers.contains_key(tool_name)
    }

    /// All registered tool names, sorted alphabetically.
    pub fn list_tools(&self) -> Vec<String> {
        let mut tools: Vec<String> = self.handlers.keys().cloned().collect();
        tools.sort();
        tools
    }

    /// `(tool, handler type)` pairs for diagnostics, sorted by tool name.
    pub fn list_tools_with_handlers(&self) -> Vec<(String, String)> {
        let mut result: Vec<(String, String)> = self
            .handlers
            .keys()
            .map(|tool_name| {
                let handler_name = self
                    .handler_names
                    .get(tool_name)
                    .cloned()
                    .unwrap_or_else(|| "UnknownHandler".to_string());
                (tool_name.clone(), handler_name)
            })
            .collect();
        result.sort_by(|a, b| a.0.cmp(&b.0));
        result
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct TestHandler {
        tools: Vec<&'static str>,
    }

    #[async_trait]
    impl ToolHandler for TestHandler {
        fn tool_names(&self) -> &[&str] {
            &self.tools
        }

        async fn handle_tool_call(
            &self,
            _context: &ToolHandlerContext,
            tool_call: &ToolCall,
        ) -> LensResult<String> {
            Ok(format!("handled {}", tool_call.name))
        }
    }

    #[test]
    fn registration_and_lookup() {
        let mut registry = ToolRegistry::new();
        registry.register_with_name(
            Arc::new(TestHandler {
                tools: vec!["b_tool", "a_tool"],
            }),
            "TestHandler",
        );
        assert!(registry.has_tool("a_tool"));
        assert!(!registry.has_tool("c_tool"));
        assert_eq!(registry.list_tools(), vec!["a_tool", "b_tool"]);
        let with_handlers = registry.list_tools_with_handlers();
        assert_eq!(with_handlers[0].1, "TestHandler");
    }
}
