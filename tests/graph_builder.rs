use gorefs::core::{Declaration, DeclarationKind, ReferenceGraph};
use std::collections::BTreeSet;
use std::path::PathBuf;

fn decl(file: &str, name: &str) -> Declaration {
    Declaration::new(
        PathBuf::from(file),
        name.to_string(),
        DeclarationKind::Function,
    )
}

#[test]
fn add_node_reports_new_nodes_only() {
    let mut graph = ReferenceGraph::new();
    assert!(graph.add_node(decl("/p/a.go", "a")));
    assert!(!graph.add_node(decl("/p/a.go", "a")));
    assert!(graph.contains_node(&decl("/p/a.go", "a")));
    assert!(!graph.contains_node(&decl("/p/b.go", "a")));
    assert_eq!(graph.node_count(), 1);
}

#[test]
fn add_edge_is_idempotent_and_adds_missing_nodes() {
    let mut graph = ReferenceGraph::new();
    let a = decl("/p/a.go", "a");
    let b = decl("/p/a.go", "b");

    assert!(graph.add_edge(a.clone(), b.clone()));
    assert!(!graph.add_edge(a.clone(), b.clone()));

    assert!(graph.contains_edge(&a, &b));
    assert!(!graph.contains_edge(&b, &a));
    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.edge_count(), 1);
}

#[test]
fn self_edges_are_never_recorded() {
    let mut graph = ReferenceGraph::new();
    let a = decl("/p/a.go", "a");
    assert!(!graph.add_edge(a.clone(), a.clone()));
    assert!(!graph.contains_edge(&a, &a));
    assert_eq!(graph.edge_count(), 0);
}

#[test]
fn identity_ignores_kind_and_span() {
    let function = decl("/p/a.go", "thing");
    let value = Declaration::new(
        PathBuf::from("/p/a.go"),
        "thing".to_string(),
        DeclarationKind::Value,
    );
    assert_eq!(function, value);

    let mut graph = ReferenceGraph::new();
    graph.add_node(function);
    assert!(!graph.add_node(value));
}

#[test]
fn dfs_visits_everything_reachable_from_all_roots_once() {
    let mut graph = ReferenceGraph::new();
    let [a, b, c, d, e, f] = ["a", "b", "c", "d", "e", "f"].map(|name| decl("/p/x.go", name));
    graph.add_edge(a.clone(), b.clone());
    graph.add_edge(b.clone(), c.clone());
    graph.add_edge(a.clone(), d.clone());
    graph.add_edge(c.clone(), a.clone());
    graph.add_edge(e.clone(), f.clone());

    let mut visited = Vec::new();
    graph.dfs(&[a.clone(), b.clone()], |node| visited.push(node.name.clone()));

    let unique: BTreeSet<_> = visited.iter().cloned().collect();
    assert_eq!(unique.len(), visited.len());
    assert_eq!(
        unique,
        ["a", "b", "c", "d"]
            .iter()
            .map(|s| s.to_string())
            .collect::<BTreeSet<_>>()
    );
}

#[test]
fn dfs_ignores_roots_outside_the_graph() {
    let mut graph = ReferenceGraph::new();
    graph.add_node(decl("/p/x.go", "a"));

    let mut visited = 0;
    graph.dfs(&[decl("/p/x.go", "missing")], |_| visited += 1);
    assert_eq!(visited, 0);
}

#[test]
fn targets_lists_direct_references() {
    let mut graph = ReferenceGraph::new();
    let a = decl("/p/x.go", "a");
    graph.add_edge(a.clone(), decl("/p/x.go", "b"));
    graph.add_edge(a.clone(), decl("/p/y.go", "c"));

    let mut names: Vec<_> = graph.targets(&a).into_iter().map(|d| d.name.clone()).collect();
    names.sort();
    assert_eq!(names, vec!["b", "c"]);
    assert!(graph.targets(&decl("/p/x.go", "nope")).is_empty());
}

#[test]
fn display_name_is_relative_to_root() {
    let root = PathBuf::from("/project");
    let declaration = Declaration::new(
        PathBuf::from("/project/pkg/util.go"),
        "Server::Start".to_string(),
        DeclarationKind::Method,
    );
    assert_eq!(
        declaration.display_name(&root).unwrap(),
        "pkg/util.go::Server::Start"
    );
    assert_eq!(declaration.qualified_name(), "/project/pkg/util.go::Server::Start");
    assert!(declaration.display_name(&PathBuf::from("/elsewhere")).is_err());

    let file_root = Declaration::file_root(PathBuf::from("/project/main.go"));
    assert!(file_root.is_file_root());
    assert_eq!(file_root.display_name(&root).unwrap(), "main.go");
}
