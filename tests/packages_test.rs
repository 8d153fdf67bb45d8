use modgraph::backend::MetadataGraph;
use modgraph::errors::ModGraphError;
use modgraph::graph::PackageGraphNavigator;
use modgraph::types::{DependencyEdge, PackageRecord};

const MAIN: &str = "example.com/app";

fn pkg(path: &str, imports: &[&str]) -> PackageRecord {
    let name = path.rsplit('/').next().unwrap_or(path);
    let module = if path.starts_with(MAIN) {
        MAIN
    } else {
        path
    };
    PackageRecord::new(path, name)
        .with_module(module)
        .with_imports(imports)
}

/// Helper: an intermediate test variant of `path` with its own id.
fn test_variant(path: &str, imports: &[&str]) -> PackageRecord {
    let mut record = pkg(path, imports);
    record.id = format!("{} [{}.test]", path, path);
    record.is_intermediate_test_variant = true;
    record
}

fn depths(edges: &[DependencyEdge]) -> Vec<(&str, u32)> {
    edges.iter().map(|e| (e.path.as_str(), e.depth)).collect()
}

/// app -> {a, b}; a -> {c}; b -> {c, d}; c -> {e}
fn chain_graph() -> MetadataGraph {
    MetadataGraph::new(vec![
        pkg(MAIN, &["example.com/app/a", "example.com/app/b"]),
        pkg("example.com/app/a", &["example.com/app/c"]),
        pkg("example.com/app/b", &["example.com/app/c", "example.com/app/d"]),
        pkg("example.com/app/c", &["example.com/app/e"]),
        pkg("example.com/app/d", &[]),
        pkg("example.com/app/e", &[]),
    ])
}

fn navigator(graph: &MetadataGraph) -> PackageGraphNavigator<'_> {
    PackageGraphNavigator::new(graph).with_main_module(Some(MAIN))
}

// ---------------------------------------------------------------------------
// Forward dependencies
// ---------------------------------------------------------------------------

#[test]
fn test_direct_dependencies_only() {
    let graph = chain_graph();
    let edges = navigator(&graph).dependencies(MAIN, false, 0).unwrap();
    assert_eq!(
        depths(&edges),
        vec![("example.com/app/a", 0), ("example.com/app/b", 0)]
    );
}

#[test]
fn test_transitive_unbounded() {
    let graph = chain_graph();
    let edges = navigator(&graph).dependencies(MAIN, true, 0).unwrap();
    assert_eq!(
        depths(&edges),
        vec![
            ("example.com/app/a", 0),
            ("example.com/app/b", 0),
            ("example.com/app/c", 1),
            ("example.com/app/d", 1),
            ("example.com/app/e", 2),
        ]
    );
}

/// app -> {a, b}; a -> a1 -> x; b -> x; x -> y
fn diamond_graph() -> MetadataGraph {
    MetadataGraph::new(vec![
        pkg(MAIN, &["example.com/app/a", "example.com/app/b"]),
        pkg("example.com/app/a", &["example.com/app/a1"]),
        pkg("example.com/app/a1", &["example.com/app/x"]),
        pkg("example.com/app/b", &["example.com/app/x"]),
        pkg("example.com/app/x", &["example.com/app/y"]),
        pkg("example.com/app/y", &[]),
    ])
}

#[test]
fn test_package_recorded_at_shallowest_depth() {
    let graph = diamond_graph();
    let edges = navigator(&graph).dependencies(MAIN, true, 0).unwrap();
    assert_eq!(
        depths(&edges),
        vec![
            ("example.com/app/a", 0),
            ("example.com/app/b", 0),
            ("example.com/app/a1", 1),
            ("example.com/app/x", 1),
            ("example.com/app/y", 2),
        ]
    );
}

#[test]
fn test_max_depth_keeps_packages_within_bound() {
    let graph = diamond_graph();
    let edges = navigator(&graph).dependencies(MAIN, true, 3).unwrap();
    assert!(edges.iter().any(|e| e.path == "example.com/app/y" && e.depth == 2));
    assert_eq!(edges.len(), 5);

    let edges = navigator(&graph).dependencies(MAIN, true, 2).unwrap();
    assert!(!edges.iter().any(|e| e.path == "example.com/app/y"));
    assert!(edges.iter().any(|e| e.path == "example.com/app/x" && e.depth == 1));
}

#[test]
fn test_max_depth_one_returns_direct_only() {
    let graph = chain_graph();
    let edges = navigator(&graph).dependencies(MAIN, true, 1).unwrap();
    assert!(edges.iter().all(|e| e.depth == 0));
    assert_eq!(edges.len(), 2);
}

#[test]
fn test_max_depth_bounds_levels() {
    let graph = chain_graph();
    let edges = navigator(&graph).dependencies(MAIN, true, 2).unwrap();
    assert!(edges.iter().all(|e| e.depth < 2));
    assert!(!edges.iter().any(|e| e.path == "example.com/app/e"));
    assert_eq!(edges.len(), 4);
}

#[test]
fn test_negative_max_depth_is_unbounded() {
    let graph = chain_graph();
    let bounded = navigator(&graph).dependencies(MAIN, true, 0).unwrap();
    let negative = navigator(&graph).dependencies(MAIN, true, -3).unwrap();
    assert_eq!(bounded, negative);
}

#[test]
fn test_each_package_reported_once() {
    let graph = chain_graph();
    let edges = navigator(&graph).dependencies(MAIN, true, 0).unwrap();
    let mut paths: Vec<&str> = edges.iter().map(|e| e.path.as_str()).collect();
    let total = paths.len();
    paths.sort();
    paths.dedup();
    assert_eq!(paths.len(), total);
}

#[test]
fn test_cycle_terminates_without_target() {
    let graph = MetadataGraph::new(vec![
        pkg("example.com/app/a", &["example.com/app/b"]),
        pkg("example.com/app/b", &["example.com/app/a"]),
    ]);
    let edges = navigator(&graph)
        .dependencies("example.com/app/a", true, 0)
        .unwrap();
    assert_eq!(depths(&edges), vec![("example.com/app/b", 0)]);
}

#[test]
fn test_self_import_is_not_reported() {
    let graph = MetadataGraph::new(vec![pkg("example.com/app/a", &["example.com/app/a"])]);
    let edges = navigator(&graph)
        .dependencies("example.com/app/a", true, 0)
        .unwrap();
    assert!(edges.is_empty());
}

#[test]
fn test_intermediate_test_variants_are_skipped() {
    let mut app = pkg(MAIN, &["example.com/app/a"]);
    let variant = test_variant("example.com/app/b", &["example.com/app/d"]);
    app.imports
        .insert("example.com/app/b".to_string(), variant.id.clone());

    let graph = MetadataGraph::new(vec![
        app,
        pkg("example.com/app/a", &["example.com/app/b"]),
        pkg("example.com/app/b", &[]),
        variant,
        pkg("example.com/app/d", &[]),
    ]);
    let edges = navigator(&graph).dependencies(MAIN, true, 0).unwrap();

    // The variant is skipped without being marked visited, so the real b is
    // still reached through a.
    assert_eq!(
        depths(&edges),
        vec![("example.com/app/a", 0), ("example.com/app/b", 1)]
    );
}

#[test]
fn test_missing_import_is_ignored() {
    let graph = MetadataGraph::new(vec![pkg(MAIN, &["example.com/app/ghost"])]);
    let edges = navigator(&graph).dependencies(MAIN, true, 0).unwrap();
    assert!(edges.is_empty());
}

#[test]
fn test_stdlib_and_external_classification() {
    let prefixes = vec!["golang.org/x/".to_string()];
    let graph = MetadataGraph::new(vec![
        pkg(
            MAIN,
            &[
                "fmt",
                "golang.org/x/sync/errgroup",
                "github.com/pkg/errors",
                "example.com/app/internal/db",
            ],
        ),
        pkg("fmt", &[]),
        pkg("golang.org/x/sync/errgroup", &[]),
        pkg("github.com/pkg/errors", &[]),
        pkg("example.com/app/internal/db", &[]),
    ]);
    let edges = PackageGraphNavigator::new(&graph)
        .with_main_module(Some(MAIN))
        .with_stdlib_prefixes(&prefixes)
        .dependencies(MAIN, false, 0)
        .unwrap();

    let flags: Vec<(&str, bool, bool)> = edges
        .iter()
        .map(|e| (e.path.as_str(), e.is_stdlib, e.is_external))
        .collect();
    assert_eq!(
        flags,
        vec![
            ("example.com/app/internal/db", false, false),
            ("fmt", true, false),
            ("github.com/pkg/errors", false, true),
            ("golang.org/x/sync/errgroup", true, false),
        ]
    );
    assert_eq!(edges[2].module, "github.com/pkg/errors");
}

#[test]
fn test_unknown_main_module_never_external() {
    let graph = MetadataGraph::new(vec![
        pkg("github.com/a/a", &["github.com/b/b"]),
        pkg("github.com/b/b", &[]),
    ]);
    let edges = PackageGraphNavigator::new(&graph)
        .dependencies("github.com/a/a", false, 0)
        .unwrap();
    assert_eq!(edges.len(), 1);
    assert!(!edges[0].is_external);
    assert!(!edges[0].is_stdlib);
}

#[test]
fn test_unknown_package_is_not_found() {
    let graph = chain_graph();
    let err = navigator(&graph)
        .dependencies("example.com/app/missing", false, 0)
        .unwrap_err();
    assert!(matches!(err, ModGraphError::NotFound { .. }));

    let err = navigator(&graph)
        .dependents("example.com/app/missing")
        .unwrap_err();
    assert!(matches!(err, ModGraphError::NotFound { .. }));
}

// ---------------------------------------------------------------------------
// Reverse dependents
// ---------------------------------------------------------------------------

#[test]
fn test_dependents_sorted_with_test_flag() {
    let graph = MetadataGraph::new(vec![
        pkg("example.com/app/b", &["example.com/app/c"]),
        pkg("example.com/app/a", &["example.com/app/c"]),
        pkg("example.com/app/c", &[]),
        pkg("example.com/app/c_test", &["example.com/app/c"]),
        test_variant("example.com/app/z", &["example.com/app/c"]),
    ]);

    let dependents = navigator(&graph).dependents("example.com/app/c").unwrap();
    let summary: Vec<(&str, bool)> = dependents
        .iter()
        .map(|d| (d.path.as_str(), d.is_test))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("example.com/app/a", false),
            ("example.com/app/b", false),
            ("example.com/app/c_test", true),
        ]
    );
}

#[test]
fn test_dependents_are_direct_only() {
    let graph = chain_graph();
    let dependents = navigator(&graph).dependents("example.com/app/e").unwrap();
    assert_eq!(dependents.len(), 1);
    assert_eq!(dependents[0].path, "example.com/app/c");
}

#[test]
fn test_package_by_path_prefers_real_package() {
    let graph = MetadataGraph::new(vec![
        test_variant("example.com/app/a", &[]),
        pkg("example.com/app/a", &["example.com/app/b"]),
        pkg("example.com/app/b", &[]),
    ]);
    let target = navigator(&graph).target("example.com/app/a").unwrap();
    assert!(!target.is_intermediate_test_variant);
    assert_eq!(target.id, "example.com/app/a");
}
