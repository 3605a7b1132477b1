//! Write-operation scenarios through the dispatcher

use crate::harness::TestClient;
use lens_provider::SnapshotProvider;
use lens_test_support::{Anchor, SolutionBuilder, SolutionFixture};
use serde_json::json;
use std::path::Path;
use std::sync::Arc;

fn on_disk_client(
    dir: &Path,
    build: impl FnOnce(&mut SolutionBuilder),
) -> (TestClient, SolutionFixture) {
    let sln = dir.join("App.sln");
    let mut builder = SolutionBuilder::new(&sln);
    build(&mut builder);
    let fixture = builder.into_fixture();
    fixture.write_to_disk().unwrap();
    let provider = Arc::new(SnapshotProvider::new());
    fixture.install(&provider);
    (TestClient::new(provider), fixture)
}

// S3: rename propagates to both call sites; the old name is gone after
// the reload
#[tokio::test]
async fn scenario_rename_method() {
    let dir = tempfile::tempdir().unwrap();
    let (mut client, fixture) = on_disk_client(dir.path(), |builder| {
        builder
            .project("App")
            .document(
                "Calc.cs",
                "namespace App\n{\n    public class Calc\n    {\n        public int Foo(int a, int b)\n        {\n            return a + b;\n        }\n    }\n}\n",
            )
            .document(
                "First.cs",
                "namespace App\n{\n    public class First\n    {\n        public int Go(Calc c) { return c.Foo(1, 2); }\n    }\n}\n",
            )
            .document(
                "Second.cs",
                "namespace App\n{\n    public class Second\n    {\n        public int Go(Calc c) { return c.Foo(3, 4); }\n    }\n}\n",
            );
        let calc = builder
            .class("Calc")
            .namespace("App")
            .at("Calc.cs", Anchor::after("public class "))
            .key();
        let foo = builder
            .method(calc, "Foo")
            .returns("int")
            .param("int", "a")
            .param("int", "b")
            .at("Calc.cs", Anchor::after("public int "))
            .key();
        for (doc, name) in [("First.cs", "First"), ("Second.cs", "Second")] {
            let ty = builder
                .class(name)
                .namespace("App")
                .at(doc, Anchor::after("public class "))
                .key();
            builder
                .method(ty, "Go")
                .returns("int")
                .param("Calc", "c")
                .at(doc, Anchor::after("public int "))
                .key();
            builder.reference(foo, doc, 0);
        }
    });
    let path = fixture.path().display().to_string();

    let summary = client
        .call_tool_ok(
            "rename",
            json!({ "path": path, "symbolName": "Foo", "newName": "Bar" }),
        )
        .await;
    assert!(summary.contains("3 files changed"), "{summary}");
    assert!(summary.contains("Calc.cs"));
    assert!(summary.contains("First.cs"));
    assert!(summary.contains("Second.cs"));

    // Sentinel: the old name resolves to nothing, the new one to one hit
    let old = client
        .call_tool_ok(
            "findSymbols",
            json!({ "path": path, "query": "Foo", "exact": true }),
        )
        .await;
    assert!(old.contains("No symbols found"), "{old}");

    let new = client
        .call_tool_ok(
            "findSymbols",
            json!({ "path": path, "query": "Bar", "exact": true }),
        )
        .await;
    assert_eq!(new.lines().count(), 1, "{new}");
    assert!(new.contains("Bar"));
}

// S4: reordering parameters leaves a correctly-named call site untouched
#[tokio::test]
async fn scenario_change_signature_named_arguments() {
    let dir = tempfile::tempdir().unwrap();
    let (mut client, fixture) = on_disk_client(dir.path(), |builder| {
        builder
            .project("App")
            .document(
                "Calc.cs",
                "namespace App\n{\n    public class Calc\n    {\n        public int M(int x, string y)\n        {\n            return x;\n        }\n    }\n}\n",
            )
            .document(
                "Caller.cs",
                "namespace App\n{\n    public class Caller\n    {\n        public int Go(Calc c) { return c.M(y: \"z\", x: 1); }\n    }\n}\n",
            );
        let calc = builder
            .class("Calc")
            .namespace("App")
            .at("Calc.cs", Anchor::after("public class "))
            .key();
        let m = builder
            .method(calc, "M")
            .returns("int")
            .param("int", "x")
            .param("string", "y")
            .at("Calc.cs", Anchor::after("public int "))
            .key();
        let caller = builder
            .class("Caller")
            .namespace("App")
            .at("Caller.cs", Anchor::after("public class "))
            .key();
        builder
            .method(caller, "Go")
            .returns("int")
            .param("Calc", "c")
            .at("Caller.cs", Anchor::after("public int "))
            .key();
        builder.reference(m, "Caller.cs", 0);
    });
    let path = fixture.path().display().to_string();
    let caller_before = std::fs::read_to_string(dir.path().join("Caller.cs")).unwrap();

    client
        .call_tool_ok(
            "changeSignature",
            json!({
                "path": path,
                "methodName": "M",
                "reorderParameters": "y,x",
            }),
        )
        .await;

    let calc_text = std::fs::read_to_string(dir.path().join("Calc.cs")).unwrap();
    assert!(calc_text.contains("public int M(string y, int x)"), "{calc_text}");
    // The named-argument call needs no text change
    let caller_after = std::fs::read_to_string(dir.path().join("Caller.cs")).unwrap();
    assert_eq!(caller_before, caller_after);
}

#[tokio::test]
async fn extract_interface_preview_through_the_dispatcher() {
    let dir = tempfile::tempdir().unwrap();
    let (mut client, fixture) = on_disk_client(dir.path(), |builder| {
        builder.project("App").document(
            "Service.cs",
            "namespace App\n{\n    public class Service\n    {\n        public void Send(string payload) { }\n    }\n}\n",
        );
        let service = builder
            .class("Service")
            .namespace("App")
            .at("Service.cs", Anchor::after("public class "))
            .key();
        builder
            .method(service, "Send")
            .returns("void")
            .param("string", "payload")
            .at("Service.cs", Anchor::after("public void "))
            .key();
    });
    let path = fixture.path().display().to_string();

    let preview = client
        .call_tool_ok(
            "extractInterface",
            json!({ "path": path, "typeName": "Service" }),
        )
        .await;
    assert!(preview.contains("public interface IService"));
    assert!(preview.contains("void Send(string payload);"));
    assert!(!dir.path().join("IService.cs").exists());
}

// Staleness: editing a file on disk after the freshness window forces a
// reload with a higher generation (observable through changed results)
#[tokio::test]
async fn stale_solutions_reload_after_disk_edits() {
    let dir = tempfile::tempdir().unwrap();
    let sln = dir.path().join("App.sln");
    let mut builder = SolutionBuilder::new(&sln);
    builder.project("App").document(
        "Thing.cs",
        "namespace App\n{\n    public class Thing\n    {\n        public void One() { }\n    }\n}\n",
    );
    let thing = builder
        .class("Thing")
        .namespace("App")
        .at("Thing.cs", Anchor::after("public class "))
        .key();
    builder
        .method(thing, "One")
        .returns("void")
        .at("Thing.cs", Anchor::after("public void "))
        .key();
    let fixture = builder.into_fixture();
    fixture.write_to_disk().unwrap();
    let provider = Arc::new(SnapshotProvider::new());
    fixture.install(&provider);
    let mut config = lens_config::AppConfig::default();
    config.workspace.staleness_window_secs = 0;
    let mut client = TestClient::with_config(provider, config);
    let path = fixture.path().display().to_string();

    let before = client
        .call_tool_ok(
            "findSymbols",
            json!({ "path": path, "query": "One", "exact": true }),
        )
        .await;
    assert!(before.contains("One"));

    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    std::fs::write(
        dir.path().join("Thing.cs"),
        "namespace App\n{\n    public class Thing\n    {\n        public void Two() { }\n    }\n}\n",
    )
    .unwrap();

    let after = client
        .call_tool_ok(
            "findSymbols",
            json!({ "path": path, "query": "Two", "exact": true }),
        )
        .await;
    assert!(after.contains("Two"), "{after}");
}
