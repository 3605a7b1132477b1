//! Read-side scenarios through the dispatcher

use crate::harness::TestClient;
use lens_provider::SnapshotProvider;
use lens_test_support::{Anchor, SolutionBuilder};
use serde_json::json;
use std::sync::Arc;

fn greeter_client() -> (TestClient, String) {
    let mut builder = SolutionBuilder::new("/virtual/e2e/App.sln");
    builder.project("App").document(
        "Greeter.cs",
        "namespace App\n{\n    public class Greeter\n    {\n        public void Hello() { }\n    }\n}\n",
    );
    let greeter = builder
        .class("Greeter")
        .namespace("App")
        .at("Greeter.cs", Anchor::after("public class "))
        .key();
    builder
        .method(greeter, "Hello")
        .returns("void")
        .at("Greeter.cs", Anchor::after("public void "))
        .key();
    let fixture = builder.into_fixture();
    let provider = Arc::new(SnapshotProvider::new());
    fixture.install(&provider);
    (
        TestClient::new(provider),
        fixture.path().display().to_string(),
    )
}

#[tokio::test]
async fn initialize_reports_server_info() {
    let (mut client, _path) = greeter_client();
    let result = client.initialize().await;
    assert_eq!(result["serverInfo"]["name"], "lens-server");
    assert!(result["capabilities"]["tools"].is_object());
}

#[tokio::test]
async fn tools_list_covers_the_request_surface() {
    let (mut client, _path) = greeter_client();
    let tools = client.list_tools().await;
    for expected in [
        "listProjects",
        "projectInfo",
        "listSourceFiles",
        "diagnostics",
        "findSymbols",
        "fileSymbols",
        "typeMembers",
        "listNamespaces",
        "findDerivedTypes",
        "typeHierarchy",
        "findOverrides",
        "findReferences",
        "symbolSource",
        "fileContent",
        "rename",
        "extractInterface",
        "implementInterface",
        "changeSignature",
        "findUnusedCode",
        "findCodeSmells",
    ] {
        assert!(tools.contains(&expected.to_string()), "missing {expected}");
    }
}

// S1: exact symbol search finds the single declaration
#[tokio::test]
async fn scenario_find_symbols_exact() {
    let (mut client, path) = greeter_client();
    let text = client
        .call_tool_ok(
            "findSymbols",
            json!({ "path": path, "query": "Hello", "exact": true }),
        )
        .await;
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 1, "one result: {text}");
    assert!(lines[0].starts_with("public"));
    assert!(lines[0].contains("[Greeter.cs:5]"));
}

// S2: hierarchy of A : B ends at the object label
#[tokio::test]
async fn scenario_type_hierarchy() {
    let mut builder = SolutionBuilder::new("/virtual/e2e-hier/App.sln");
    builder.project("App").document(
        "Types.cs",
        "namespace App\n{\n    public class B { }\n    public class A : B { }\n}\n",
    );
    let b = builder
        .class("B")
        .namespace("App")
        .at("Types.cs", Anchor::nth(0))
        .key();
    builder
        .class("A")
        .namespace("App")
        .at("Types.cs", Anchor::nth(0))
        .base(b)
        .key();
    let fixture = builder.into_fixture();
    let provider = Arc::new(SnapshotProvider::new());
    fixture.install(&provider);
    let mut client = TestClient::new(provider);

    let text = client
        .call_tool_ok(
            "typeHierarchy",
            json!({ "path": fixture.path().display().to_string(), "typeName": "A" }),
        )
        .await;
    assert!(text.contains("base: B -> object"), "{text}");
    assert!(text.contains("interfaces: (none)"));
}

// S5 (with the normative < 20% threshold): refused bequest carries the
// override rate in its detail
#[tokio::test]
async fn scenario_refused_bequest_detail() {
    let mut builder = SolutionBuilder::new("/virtual/e2e-rb/App.sln");
    builder.project("App").document(
        "Bequest.cs",
        "namespace App\n{\n    public class Widget { }\n    public class Panel : Widget\n    {\n        public override void V0() { }\n    }\n}\n",
    );
    let widget = builder
        .class("Widget")
        .namespace("App")
        .at("Bequest.cs", Anchor::nth(0))
        .key();
    for i in 0..6 {
        builder
            .method(widget, &format!("V{i}"))
            .returns("void")
            .virtual_()
            .key();
    }
    let panel = builder
        .class("Panel")
        .namespace("App")
        .base(widget)
        .at("Bequest.cs", Anchor::nth(0))
        .key();
    builder
        .method(panel, "V0")
        .returns("void")
        .override_()
        .at("Bequest.cs", Anchor::after("public override void "))
        .key();
    let fixture = builder.into_fixture();
    let provider = Arc::new(SnapshotProvider::new());
    fixture.install(&provider);
    let mut client = TestClient::new(provider);

    let text = client
        .call_tool_ok(
            "findCodeSmells",
            json!({
                "path": fixture.path().display().to_string(),
                "category": "inheritance",
            }),
        )
        .await;
    assert!(text.contains("Refused bequest"), "{text}");
    assert!(text.contains("App.Panel"));
    assert!(text.contains("overrides 1/6 base members (17%)"));
}

// S6: oversized fileContent requests fail with TooLarge
#[tokio::test]
async fn scenario_file_content_too_large() {
    let dir = tempfile::tempdir().unwrap();
    let big = dir.path().join("big.txt");
    std::fs::write(&big, vec![b'x'; 6 * 1024 * 1024]).unwrap();

    let (mut client, _path) = greeter_client();
    let (text, is_error) = client
        .call_tool(
            "fileContent",
            json!({ "filePath": big.display().to_string() }),
        )
        .await;
    assert!(is_error);
    assert!(text.starts_with("Error: TooLarge"), "{text}");
}

#[tokio::test]
async fn file_content_numbers_lines_and_slices_ranges() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("notes.txt");
    std::fs::write(&file, "alpha\nbeta\ngamma\n").unwrap();

    let (mut client, _path) = greeter_client();
    let text = client
        .call_tool_ok(
            "fileContent",
            json!({ "filePath": file.display().to_string() }),
        )
        .await;
    assert_eq!(text, "1: alpha\n2: beta\n3: gamma\n");

    let sliced = client
        .call_tool_ok(
            "fileContent",
            json!({
                "filePath": file.display().to_string(),
                "startLine": 2,
                "endLine": 2,
            }),
        )
        .await;
    assert_eq!(sliced, "2: beta\n");
}

#[tokio::test]
async fn unknown_tools_and_missing_solutions_render_error_text() {
    let (mut client, _path) = greeter_client();

    let (text, is_error) = client.call_tool("explodeProject", json!({})).await;
    assert!(is_error);
    assert!(text.starts_with("Error: InvalidInput"), "{text}");

    let (text, is_error) = client
        .call_tool(
            "listProjects",
            json!({ "path": "/virtual/e2e/Missing.sln" }),
        )
        .await;
    assert!(is_error);
    assert!(text.starts_with("Error: NotFound"), "{text}");
}

#[tokio::test]
async fn list_projects_header_counts_projects() {
    let (mut client, path) = greeter_client();
    let text = client
        .call_tool_ok("listProjects", json!({ "path": path }))
        .await;
    assert!(text.starts_with("Solution App (1 projects)"), "{text}");
}

#[tokio::test]
async fn solutions_without_projects_answer_empty_results() {
    let builder = SolutionBuilder::new("/virtual/e2e-none/App.sln");
    let fixture = builder.into_fixture();
    let provider = Arc::new(SnapshotProvider::new());
    fixture.install(&provider);
    let mut client = TestClient::new(provider);
    let path = fixture.path().display().to_string();

    let text = client
        .call_tool_ok("listProjects", json!({ "path": path }))
        .await;
    assert!(text.starts_with("Solution App (0 projects)"), "{text}");

    let files = client
        .call_tool_ok("listSourceFiles", json!({ "path": path }))
        .await;
    assert!(files.starts_with("Source files (0):"), "{files}");

    let symbols = client
        .call_tool_ok(
            "findSymbols",
            json!({ "path": path, "query": "anything" }),
        )
        .await;
    assert!(symbols.contains("No symbols found"), "{symbols}");
}
