//! Tool definitions surfaced by `tools/list`
//!
//! Input schemas are plain JSON Schema objects. Every tool takes the
//! solution (or project) entry-point path; write operations are explicit
//! about what they touch.

use lens_foundation::protocol::mcp::McpTool;
use serde_json::{json, Value};

fn tool(name: &str, description: &str, properties: Value, required: &[&str]) -> McpTool {
    McpTool {
        name: name.to_string(),
        description: description.to_string(),
        input_schema: Some(json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })),
    }
}

fn path_property() -> Value {
    json!({ "type": "string", "description": "Solution (.sln) or project (.csproj) path" })
}

/// All tools the server exposes, in listing order.
pub fn tool_definitions() -> Vec<McpTool> {
    vec![
        tool(
            "listProjects",
            "List the projects of a solution",
            json!({ "path": path_property() }),
            &["path"],
        ),
        tool(
            "projectInfo",
            "Show one project's framework, output type, references and packages",
            json!({
                "path": path_property(),
                "projectName": { "type": "string" },
            }),
            &["path"],
        ),
        tool(
            "listSourceFiles",
            "List source files, optionally scoped to one project",
            json!({
                "path": path_property(),
                "projectName": { "type": "string" },
            }),
            &["path"],
        ),
        tool(
            "diagnostics",
            "Compiler diagnostics (warning or higher), errors first",
            json!({
                "path": path_property(),
                "projectName": { "type": "string" },
            }),
            &["path"],
        ),
        tool(
            "findSymbols",
            "Search symbols by name (case-insensitive substring, or exact)",
            json!({
                "path": path_property(),
                "query": { "type": "string" },
                "kind": { "type": "string", "description": "class, struct, interface, enum, delegate, type, method, property, field, event" },
                "exact": { "type": "boolean", "default": false },
                "detail": { "type": "string", "enum": ["compact", "full"], "default": "compact" },
            }),
            &["path", "query"],
        ),
        tool(
            "fileSymbols",
            "Top-level types of a file; depth 1 adds their members",
            json!({
                "path": path_property(),
                "filePath": { "type": "string" },
                "depth": { "type": "integer", "enum": [0, 1], "default": 0 },
                "detail": { "type": "string", "enum": ["compact", "full"], "default": "compact" },
            }),
            &["path", "filePath"],
        ),
        tool(
            "typeMembers",
            "Members of a named type",
            json!({
                "path": path_property(),
                "typeName": { "type": "string" },
                "detail": { "type": "string", "enum": ["compact", "full"], "default": "compact" },
            }),
            &["path", "typeName"],
        ),
        tool(
            "listNamespaces",
            "Distinct namespaces declaring source types",
            json!({ "path": path_property() }),
            &["path"],
        ),
        tool(
            "findDerivedTypes",
            "Implementations of an interface, or classes derived from a class",
            json!({
                "path": path_property(),
                "typeName": { "type": "string" },
            }),
            &["path", "typeName"],
        ),
        tool(
            "typeHierarchy",
            "Base-type chain and transitive interfaces of a type",
            json!({
                "path": path_property(),
                "typeName": { "type": "string" },
            }),
            &["path", "typeName"],
        ),
        tool(
            "findOverrides",
            "Overrides of a virtual or abstract method",
            json!({
                "path": path_property(),
                "typeName": { "type": "string" },
                "methodName": { "type": "string" },
            }),
            &["path", "typeName", "methodName"],
        ),
        tool(
            "findReferences",
            "References, callers, or usages of a symbol",
            json!({
                "path": path_property(),
                "symbolName": { "type": "string" },
                "containingType": { "type": "string" },
                "projectScope": { "type": "string", "description": "Keep only hits in this project" },
                "detail": { "type": "string", "enum": ["compact", "full"], "default": "compact" },
                "mode": { "type": "string", "enum": ["all", "callers", "usages"], "default": "all" },
            }),
            &["path", "symbolName"],
        ),
        tool(
            "symbolSource",
            "Full declaration source of one symbol",
            json!({
                "path": path_property(),
                "symbolName": { "type": "string" },
                "containingType": { "type": "string" },
            }),
            &["path", "symbolName"],
        ),
        tool(
            "fileContent",
            "Raw file content with 1-based line numbers (5 MiB ceiling)",
            json!({
                "path": path_property(),
                "filePath": { "type": "string" },
                "startLine": { "type": "integer", "minimum": 1 },
                "endLine": { "type": "integer", "minimum": 1 },
            }),
            &["filePath"],
        ),
        tool(
            "rename",
            "Rename a symbol across all references, including its file",
            json!({
                "path": path_property(),
                "symbolName": { "type": "string" },
                "containingType": { "type": "string" },
                "newName": { "type": "string" },
                "renameInStrings": { "type": "boolean", "default": false },
                "renameInComments": { "type": "boolean", "default": false },
            }),
            &["path", "symbolName", "newName"],
        ),
        tool(
            "extractInterface",
            "Generate an interface from a type's public members",
            json!({
                "path": path_property(),
                "typeName": { "type": "string" },
                "interfaceName": { "type": "string", "description": "Defaults to I{TypeName}" },
                "apply": { "type": "boolean", "default": false, "description": "Write the interface file and update the base list" },
            }),
            &["path", "typeName"],
        ),
        tool(
            "implementInterface",
            "Insert stubs for unimplemented interface members",
            json!({
                "path": path_property(),
                "typeName": { "type": "string" },
                "interfaceName": { "type": "string" },
            }),
            &["path", "typeName"],
        ),
        tool(
            "changeSignature",
            "Add, remove, or reorder parameters, updating all call sites",
            json!({
                "path": path_property(),
                "methodName": { "type": "string" },
                "containingType": { "type": "string" },
                "addParameters": { "type": "string", "description": "Comma-separated 'type name', optional '= default'" },
                "removeParameters": { "type": "string", "description": "Comma-separated parameter names" },
                "reorderParameters": { "type": "string", "description": "Comma-separated parameter names in their new order" },
            }),
            &["path", "methodName"],
        ),
        tool(
            "findUnusedCode",
            "Report symbols with zero references (public symbols excluded)",
            json!({
                "path": path_property(),
                "scope": { "type": "string", "enum": ["all", "types", "methods", "properties", "fields"], "default": "all" },
                "projectName": { "type": "string" },
            }),
            &["path"],
        ),
        tool(
            "findCodeSmells",
            "Run the code-smell analyzer",
            json!({
                "path": path_property(),
                "category": { "type": "string", "enum": ["all", "complexity", "design", "inheritance"], "default": "all" },
                "projectName": { "type": "string" },
                "deep": { "type": "boolean", "default": false, "description": "Enable the semantic feature-envy pass" },
            }),
            &["path"],
        ),
    ]
}
