//! Unused-code analyzer tests

use lens_analysis_dead_code::{find_unused_code, UnusedCodeConfig, UnusedScope};
use lens_provider::SnapshotProvider;
use lens_test_support::{Anchor, SolutionBuilder};
use lens_workspace::SolutionCache;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn cache_for(builder: SolutionBuilder) -> (SolutionCache, PathBuf) {
    let fixture = builder.into_fixture();
    let provider = SnapshotProvider::new();
    fixture.install(&provider);
    (
        SolutionCache::new(Arc::new(provider), Duration::from_secs(60)),
        fixture.path().to_path_buf(),
    )
}

const SERVICE_CS: &str = "namespace App\n{\n    public class Service\n    {\n        public void Used() { }\n        private void Orphan() { }\n        private void Called() { }\n        public void Run()\n        {\n            Called();\n        }\n    }\n    internal class Dormant { }\n}\n";

fn service_builder() -> SolutionBuilder {
    let mut builder = SolutionBuilder::new("/virtual/unused/App.sln");
    builder.project("App").document("Service.cs", SERVICE_CS);
    let service = builder
        .class("Service")
        .namespace("App")
        .at("Service.cs", Anchor::after("public class "))
        .key();
    builder
        .method(service, "Used")
        .returns("void")
        .at("Service.cs", Anchor::nth(0))
        .key();
    builder
        .method(service, "Orphan")
        .returns("void")
        .private()
        .at("Service.cs", Anchor::nth(0))
        .key();
    let called = builder
        .method(service, "Called")
        .returns("void")
        .private()
        .at("Service.cs", Anchor::nth(0))
        .key();
    builder
        .method(service, "Run")
        .returns("void")
        .at("Service.cs", Anchor::nth(0))
        .key();
    builder
        .class("Dormant")
        .namespace("App")
        .internal()
        .at("Service.cs", Anchor::after("internal class "))
        .key();
    builder.reference(called, "Service.cs", 1);
    builder
}

#[tokio::test]
async fn unreferenced_private_members_are_reported() {
    let (cache, path) = cache_for(service_builder());
    let report = find_unused_code(
        &cache,
        &path,
        &UnusedCodeConfig::default(),
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert!(report.contains("App.Service.Orphan()"), "{report}");
    assert!(report.contains("no references found"));
    // Referenced private method is alive
    assert!(!report.contains("App.Service.Called()"));
    // Public members are conservatively excluded
    assert!(!report.contains("App.Service.Used()"));
    // Unreferenced internal type is dead
    assert!(report.contains("class App.Dormant"));
}

#[tokio::test]
async fn scope_limits_the_symbol_kinds() {
    let (cache, path) = cache_for(service_builder());
    let report = find_unused_code(
        &cache,
        &path,
        &UnusedCodeConfig {
            scope: UnusedScope::Types,
            project: None,
        },
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert!(report.contains("scope: types"));
    assert!(report.contains("App.Dormant"));
    assert!(!report.contains("Orphan"));
}

#[tokio::test]
async fn entry_point_and_attribute_marked_symbols_are_skipped() {
    let mut builder = SolutionBuilder::new("/virtual/skip/App.sln");
    builder.project("App").document(
        "Program.cs",
        "namespace App\n{\n    public class Program\n    {\n        private void Main2() { }\n    }\n    internal class Legacy\n    {\n    }\n}\n",
    );
    let program = builder
        .class("Program")
        .namespace("App")
        .at("Program.cs", Anchor::after("public class "))
        .key();
    builder
        .method(program, "Main2")
        .returns("void")
        .private()
        .at("Program.cs", Anchor::after("private void "))
        .key();
    builder
        .class("Legacy")
        .namespace("App")
        .internal()
        .attribute("Obsolete")
        .at("Program.cs", Anchor::after("internal class "))
        .key();

    let (cache, path) = cache_for(builder);
    let report = find_unused_code(
        &cache,
        &path,
        &UnusedCodeConfig::default(),
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert!(!report.contains("Main2"), "entry-point members skipped");
    assert!(!report.contains("Legacy"), "obsolete-marked type skipped");
    assert!(report.contains("Unused code: 0 symbols"));
}

#[tokio::test]
async fn report_runs_are_stable() {
    let (cache, path) = cache_for(service_builder());
    let cancel = CancellationToken::new();
    let config = UnusedCodeConfig::default();
    let first = find_unused_code(&cache, &path, &config, &cancel)
        .await
        .unwrap();
    let second = find_unused_code(&cache, &path, &config, &cancel)
        .await
        .unwrap();
    // Timing varies; the symbol lines do not
    let lines = |s: &str| {
        s.lines()
            .filter(|l| l.starts_with("  "))
            .map(String::from)
            .collect::<Vec<_>>()
    };
    assert_eq!(lines(&first), lines(&second));
}
