//! Query engine tests over fixture snapshots

use lens_foundation::protocol::Detail;
use lens_foundation::LensError;
use lens_provider::SnapshotProvider;
use lens_query::references::{find_references, ReferenceMode, ReferenceQuery};
use lens_query::QueryEngine;
use lens_test_support::{Anchor, SolutionBuilder};
use lens_workspace::SolutionCache;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const GREETER_CS: &str = "namespace App\n{\n    public class Greeter\n    {\n        public void Hello() { }\n    }\n}\n";

const PROGRAM_CS: &str = "namespace App\n{\n    public class Program\n    {\n        public void Run()\n        {\n            var greeter = new Greeter();\n            greeter.Hello();\n            greeter.Hello();\n        }\n    }\n}\n";

fn engine_for(builder: SolutionBuilder) -> (QueryEngine, PathBuf) {
    let fixture = builder.into_fixture();
    let provider = SnapshotProvider::new();
    fixture.install(&provider);
    let cache = Arc::new(SolutionCache::new(
        Arc::new(provider),
        Duration::from_secs(60),
    ));
    (QueryEngine::new(cache), fixture.path().to_path_buf())
}

fn greeter_builder() -> SolutionBuilder {
    let mut builder = SolutionBuilder::new("/virtual/app/App.sln");
    builder
        .project("App")
        .framework("net8.0")
        .output_type("Exe")
        .document("Greeter.cs", GREETER_CS)
        .document("Program.cs", PROGRAM_CS);
    let greeter = builder
        .class("Greeter")
        .namespace("App")
        .at("Greeter.cs", Anchor::after("class "))
        .key();
    let hello = builder
        .method(greeter, "Hello")
        .returns("void")
        .at("Greeter.cs", Anchor::after("public void "))
        .key();
    let program = builder
        .class("Program")
        .namespace("App")
        .at("Program.cs", Anchor::after("class "))
        .key();
    builder
        .method(program, "Run")
        .returns("void")
        .at("Program.cs", Anchor::after("public void "))
        .key();
    builder
        .reference(hello, "Program.cs", 0)
        .reference(hello, "Program.cs", 1)
        .reference(greeter, "Program.cs", 0);
    builder
}

#[tokio::test]
async fn exact_symbol_search_finds_the_declaration() {
    let (engine, path) = engine_for(greeter_builder());
    let cancel = CancellationToken::new();

    let results = engine
        .find_symbols(&path, "Hello", None, true, Detail::Compact, &cancel)
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    let hello = &results[0];
    assert_eq!(hello.kind, "method");
    assert!(hello.signature.starts_with("public"));
    assert!(hello.file_path.ends_with("Greeter.cs"));
    // Declaration is on the 5th line of Greeter.cs
    assert_eq!(hello.line, 5);
}

#[tokio::test]
async fn substring_search_is_case_insensitive_and_kind_filtered() {
    let (engine, path) = engine_for(greeter_builder());
    let cancel = CancellationToken::new();

    let all = engine
        .find_symbols(&path, "greet", None, false, Detail::Compact, &cancel)
        .await
        .unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].fully_qualified_name, "App.Greeter");

    let methods_only = engine
        .find_symbols(&path, "r", Some("method"), false, Detail::Compact, &cancel)
        .await
        .unwrap();
    assert!(methods_only.iter().all(|r| r.kind == "method"));

    let err = engine
        .find_symbols(&path, "x", Some("gadget"), false, Detail::Compact, &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, LensError::InvalidInput(_)));
}

#[tokio::test]
async fn full_detail_attaches_source_body() {
    let (engine, path) = engine_for(greeter_builder());
    let cancel = CancellationToken::new();

    let results = engine
        .find_symbols(&path, "Hello", None, true, Detail::Full, &cancel)
        .await
        .unwrap();
    let body = results[0].source_body.as_deref().unwrap();
    assert!(body.contains("public void Hello() { }"));
}

#[tokio::test]
async fn file_symbols_lists_top_level_types_and_members() {
    let (engine, path) = engine_for(greeter_builder());
    let cancel = CancellationToken::new();

    let shallow = engine
        .file_symbols(&path, "Greeter.cs", 0, Detail::Compact, &cancel)
        .await
        .unwrap();
    assert_eq!(shallow.len(), 1);
    assert_eq!(shallow[0].name, "Greeter");

    let deep = engine
        .file_symbols(&path, "Greeter.cs", 1, Detail::Compact, &cancel)
        .await
        .unwrap();
    assert_eq!(deep.len(), 2);
    assert_eq!(deep[1].name, "Hello");

    let missing = engine
        .file_symbols(&path, "Nope.cs", 0, Detail::Compact, &cancel)
        .await
        .unwrap_err();
    assert!(matches!(missing, LensError::NotFound(_)));
}

#[tokio::test]
async fn type_members_and_namespaces() {
    let (engine, path) = engine_for(greeter_builder());
    let cancel = CancellationToken::new();

    let members = engine
        .type_members(&path, "Greeter", Detail::Compact, &cancel)
        .await
        .unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].name, "Hello");

    let namespaces = engine.list_namespaces(&path, &cancel).await.unwrap();
    assert_eq!(namespaces, vec!["App"]);
}

#[tokio::test]
async fn global_namespace_types_are_not_listed() {
    let mut builder = SolutionBuilder::new("/virtual/global/App.sln");
    builder
        .project("App")
        .document("Loose.cs", "public class Loose { }\n");
    builder
        .class("Loose")
        .at("Loose.cs", Anchor::after("class "))
        .key();
    let (engine, path) = engine_for(builder);
    let cancel = CancellationToken::new();

    let namespaces = engine.list_namespaces(&path, &cancel).await.unwrap();
    assert!(namespaces.is_empty());
}

#[tokio::test]
async fn hierarchy_walks_bases_and_appends_object() {
    let mut builder = SolutionBuilder::new("/virtual/hier/App.sln");
    builder.project("App").document(
        "Types.cs",
        "namespace App\n{\n    public class B { }\n    public class A : B { }\n}\n",
    );
    let b = builder
        .class("B")
        .namespace("App")
        .at("Types.cs", Anchor::nth(0))
        .key();
    let _a = builder
        .class("A")
        .namespace("App")
        .at("Types.cs", Anchor::nth(0))
        .base(b)
        .key();
    let (engine, path) = engine_for(builder);
    let cancel = CancellationToken::new();

    let hierarchy = engine.type_hierarchy(&path, "A", &cancel).await.unwrap();
    assert_eq!(hierarchy.base_types, vec!["B", "object"]);
    assert!(hierarchy.interfaces.is_empty());
}

#[tokio::test]
async fn ambiguous_type_names_enumerate_candidates() {
    let mut builder = SolutionBuilder::new("/virtual/amb/App.sln");
    builder
        .project("App")
        .document("One.cs", "namespace One { public class Widget { } }\n")
        .document("Two.cs", "namespace Two { public class Widget { } }\n");
    builder
        .class("Widget")
        .namespace("One")
        .at("One.cs", Anchor::after("class "))
        .key();
    builder
        .class("Widget")
        .namespace("Two")
        .at("Two.cs", Anchor::after("class "))
        .key();
    let (engine, path) = engine_for(builder);
    let cancel = CancellationToken::new();

    let err = engine
        .type_members(&path, "Widget", Detail::Compact, &cancel)
        .await
        .unwrap_err();
    match err {
        LensError::Ambiguous(message) => {
            assert!(message.contains("One.Widget"));
            assert!(message.contains("Two.Widget"));
        }
        other => panic!("expected Ambiguous, got {other}"),
    }

    // The fully qualified form disambiguates
    let members = engine
        .type_members(&path, "One.Widget", Detail::Compact, &cancel)
        .await
        .unwrap();
    assert!(members.is_empty());
}

#[tokio::test]
async fn references_are_sorted_with_one_based_positions() {
    let (engine, path) = engine_for(greeter_builder());
    let cancel = CancellationToken::new();
    let query = ReferenceQuery {
        symbol_name: "Hello".to_string(),
        containing_type: None,
        project_scope: None,
        detail: Detail::Compact,
        mode: ReferenceMode::All,
    };

    let results = find_references(engine.cache(), &path, &query, &cancel)
        .await
        .unwrap();
    assert_eq!(results.len(), 2);
    // Call sites are on lines 8 and 9 of Program.cs
    assert_eq!(results[0].line, 8);
    assert_eq!(results[1].line, 9);
    assert!(results[0].column >= 1);
    assert_eq!(results[0].code_snippet, "greeter.Hello();");
    assert_eq!(results[0].containing_symbol.as_deref(), Some("Program.Run"));
}

#[tokio::test]
async fn full_detail_references_carry_context_lines() {
    let (engine, path) = engine_for(greeter_builder());
    let cancel = CancellationToken::new();
    let query = ReferenceQuery {
        symbol_name: "Hello".to_string(),
        containing_type: None,
        project_scope: None,
        detail: Detail::Full,
        mode: ReferenceMode::Usages,
    };

    let results = find_references(engine.cache(), &path, &query, &cancel)
        .await
        .unwrap();
    assert_eq!(results[0].context_before.len(), 2);
    assert_eq!(results[0].context_after.len(), 2);
}

#[tokio::test]
async fn callers_mode_requires_a_method() {
    let (engine, path) = engine_for(greeter_builder());
    let cancel = CancellationToken::new();
    let query = ReferenceQuery {
        symbol_name: "Greeter".to_string(),
        containing_type: None,
        project_scope: None,
        detail: Detail::Compact,
        mode: ReferenceMode::Callers,
    };

    let err = find_references(engine.cache(), &path, &query, &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, LensError::InvalidInput(_)));
}

#[tokio::test]
async fn project_scope_filters_hits() {
    let (engine, path) = engine_for(greeter_builder());
    let cancel = CancellationToken::new();
    let query = ReferenceQuery {
        symbol_name: "Hello".to_string(),
        containing_type: None,
        project_scope: Some("Other".to_string()),
        detail: Detail::Compact,
        mode: ReferenceMode::All,
    };

    let results = find_references(engine.cache(), &path, &query, &cancel)
        .await
        .unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn overrides_and_derived_types() {
    let mut builder = SolutionBuilder::new("/virtual/ovr/App.sln");
    builder.project("App").document(
        "Shapes.cs",
        "namespace App\n{\n    public interface IShape { }\n    public abstract class Shape\n    {\n        public virtual void Draw() { }\n    }\n    public class Circle : Shape\n    {\n        public override void Draw() { }\n    }\n}\n",
    );
    let ishape = builder
        .interface_("IShape")
        .namespace("App")
        .at("Shapes.cs", Anchor::after("interface "))
        .key();
    let shape = builder
        .class("Shape")
        .namespace("App")
        .abstract_()
        .at("Shapes.cs", Anchor::after("abstract class "))
        .key();
    builder
        .method(shape, "Draw")
        .returns("void")
        .virtual_()
        .at("Shapes.cs", Anchor::after("public virtual void "))
        .key();
    let circle = builder
        .class("Circle")
        .namespace("App")
        .base(shape)
        .implements(ishape)
        .at("Shapes.cs", Anchor::after("public class "))
        .key();
    builder
        .method(circle, "Draw")
        .returns("void")
        .override_()
        .at("Shapes.cs", Anchor::after("public override void "))
        .key();
    let (engine, path) = engine_for(builder);
    let cancel = CancellationToken::new();

    let overrides = engine
        .find_overrides(&path, "Shape", "Draw", &cancel)
        .await
        .unwrap();
    assert_eq!(overrides.len(), 1);
    assert_eq!(overrides[0].fully_qualified_name, "App.Circle.Draw()");

    let derived = engine
        .find_derived_types(&path, "Shape", &cancel)
        .await
        .unwrap();
    assert_eq!(derived.len(), 1);
    assert_eq!(derived[0].name, "Circle");

    let implementations = engine
        .find_derived_types(&path, "IShape", &cancel)
        .await
        .unwrap();
    assert_eq!(implementations.len(), 1);

    // A non-virtual method is rejected
    let err = engine
        .find_overrides(&path, "Circle", "Missing", &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, LensError::NotFound(_)));
}

#[tokio::test]
async fn diagnostics_sort_errors_first() {
    let mut builder = SolutionBuilder::new("/virtual/diag/App.sln");
    builder
        .project("App")
        .document("A.cs", "public class A { }\n")
        .diagnostic(
            "CS0168",
            lens_semantic::DiagnosticSeverity::Warning,
            "variable declared but never used",
            Some(("A.cs", 4)),
        )
        .diagnostic(
            "CS0103",
            lens_semantic::DiagnosticSeverity::Error,
            "name does not exist in the current context",
            Some(("A.cs", 2)),
        )
        .diagnostic(
            "CS9999",
            lens_semantic::DiagnosticSeverity::Info,
            "informational",
            None,
        );
    builder.class("A").at("A.cs", Anchor::after("class ")).key();
    let (engine, path) = engine_for(builder);
    let cancel = CancellationToken::new();

    let diagnostics = engine.diagnostics(&path, None, &cancel).await.unwrap();
    // Info is filtered; error sorts before warning
    assert_eq!(diagnostics.len(), 2);
    assert_eq!(diagnostics[0].id, "CS0103");
    assert_eq!(diagnostics[0].severity, "error");
    assert_eq!(diagnostics[0].line, 3);
    assert_eq!(diagnostics[1].id, "CS0168");
}

#[tokio::test]
async fn empty_solution_lists_no_projects() {
    let builder = {
        let mut b = SolutionBuilder::new("/virtual/empty/App.sln");
        b.project("App");
        // remove the implicit project by building a fresh one without docs
        b
    };
    let (engine, path) = engine_for(builder);
    let cancel = CancellationToken::new();

    let (name, projects) = engine.list_projects(&path, &cancel).await.unwrap();
    assert_eq!(name, "App");
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].source_file_count, 0);

    let files = engine.source_files(&path, None, &cancel).await.unwrap();
    assert!(files.is_empty());
}

#[tokio::test]
async fn project_info_reports_metadata() {
    let mut builder = greeter_builder();
    builder
        .project("App")
        .project_reference("Lib")
        .package("Newtonsoft.Json", "13.0.3");
    let (engine, path) = engine_for(builder);
    let cancel = CancellationToken::new();

    let info = engine
        .project_info(&path, Some("App"), &cancel)
        .await
        .unwrap();
    assert_eq!(info.name, "App");
    assert_eq!(info.target_framework, "net8.0");
    assert_eq!(info.output_type, "Exe");
    assert_eq!(info.source_file_count, 2);
    assert_eq!(info.project_references, vec!["Lib"]);
    assert_eq!(info.package_references[0].name, "Newtonsoft.Json");

    let err = engine
        .project_info(&path, Some("Nope"), &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, LensError::NotFound(_)));
}

#[tokio::test]
async fn symbol_source_returns_declaration_text() {
    let (engine, path) = engine_for(greeter_builder());
    let cancel = CancellationToken::new();

    let result = engine
        .symbol_source(&path, "Hello", Some("Greeter"), &cancel)
        .await
        .unwrap();
    assert!(result.source_body.unwrap().contains("Hello()"));
}

#[tokio::test]
async fn relative_paths_use_the_solution_directory() {
    let (engine, path) = engine_for(greeter_builder());
    let cancel = CancellationToken::new();

    let results = engine
        .find_symbols(&path, "Hello", None, true, Detail::Compact, &cancel)
        .await
        .unwrap();
    assert_eq!(results[0].file_path, "Greeter.cs");
    assert!(!Path::new(&results[0].file_path).is_absolute());
}
