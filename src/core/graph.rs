use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use super::AnalysisError;

/// Separator between a file and a declaration, and between a receiver and its method.
pub const QUALIFIER: &str = "::";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Copy)]
pub enum DeclarationKind {
    Function,
    Method,
    Type,
    Value,
    FileRoot,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Copy)]
pub struct Span {
    pub start_line: usize,
    pub start_column: usize,
    pub end_line: usize,
    pub end_column: usize,
}

/// A named top-level definition in one source file.
///
/// Identity is the `(file_path, name)` pair; `kind` and `span` are carried
/// along for entrypoint detection and rendering but never compared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Declaration {
    pub file_path: PathBuf,
    pub name: String,
    pub kind: DeclarationKind,
    pub span: Option<Span>,
}

impl Declaration {
    pub fn new(file_path: PathBuf, name: String, kind: DeclarationKind) -> Self {
        Self {
            file_path,
            name,
            kind,
            span: None,
        }
    }

    /// Sentinel standing for code at file scope, outside any named declaration.
    pub fn file_root(file_path: PathBuf) -> Self {
        Self::new(file_path, String::new(), DeclarationKind::FileRoot)
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn is_file_root(&self) -> bool {
        self.name.is_empty()
    }

    pub fn qualified_name(&self) -> String {
        let file = self.file_path.to_string_lossy();
        if self.is_file_root() {
            return file.into_owned();
        }
        qualify(&[&file, &self.name])
    }

    /// `<relative-file-path>::<name>`, relative to the project root.
    pub fn display_name(&self, root: &Path) -> Result<String, AnalysisError> {
        let relative = self.relative_path(root)?;
        let relative = relative.to_string_lossy();
        if self.is_file_root() {
            return Ok(relative.into_owned());
        }
        Ok(qualify(&[&relative, &self.name]))
    }

    pub fn relative_path(&self, root: &Path) -> Result<PathBuf, AnalysisError> {
        self.file_path
            .strip_prefix(root)
            .map(Path::to_path_buf)
            .map_err(|_| AnalysisError::PathOutsideRoot {
                path: self.file_path.clone(),
                root: root.to_path_buf(),
            })
    }
}

impl PartialEq for Declaration {
    fn eq(&self, other: &Self) -> bool {
        self.file_path == other.file_path && self.name == other.name
    }
}

impl Eq for Declaration {}

impl Hash for Declaration {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.file_path.hash(state);
        self.name.hash(state);
    }
}

impl PartialOrd for Declaration {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Declaration {
    fn cmp(&self, other: &Self) -> Ordering {
        self.file_path
            .cmp(&other.file_path)
            .then_with(|| self.name.cmp(&other.name))
    }
}

/// One import statement. `alias` defaults to the last segment of `path`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Import {
    pub alias: String,
    pub path: String,
}

impl Import {
    pub fn new(path: String, alias: Option<String>) -> Self {
        let alias = alias.unwrap_or_else(|| {
            path.rsplit('/')
                .next()
                .unwrap_or(path.as_str())
                .to_string()
        });
        Self { alias, path }
    }
}

pub fn qualify(parts: &[&str]) -> String {
    parts.join(QUALIFIER)
}

/// Directed "references" graph between declarations.
///
/// Edges are deduplicated and self-edges are never stored.
#[derive(Debug, Default)]
pub struct ReferenceGraph {
    graph: DiGraph<Declaration, ()>,
    node_map: HashMap<Declaration, NodeIndex>,
}

impl ReferenceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the node was already present.
    pub fn add_node(&mut self, declaration: Declaration) -> bool {
        if self.node_map.contains_key(&declaration) {
            return false;
        }
        self.insert_node(declaration);
        true
    }

    /// Returns `false` for self-edges and edges that already exist.
    pub fn add_edge(&mut self, from: Declaration, to: Declaration) -> bool {
        if from == to || self.contains_edge(&from, &to) {
            return false;
        }
        let source = self.index_of_or_insert(from);
        let target = self.index_of_or_insert(to);
        self.graph.add_edge(source, target, ());
        true
    }

    pub fn contains_node(&self, declaration: &Declaration) -> bool {
        self.node_map.contains_key(declaration)
    }

    pub fn contains_edge(&self, from: &Declaration, to: &Declaration) -> bool {
        match (self.node_map.get(from), self.node_map.get(to)) {
            (Some(&source), Some(&target)) => self.graph.contains_edge(source, target),
            _ => false,
        }
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Declaration> {
        self.graph.node_weights()
    }

    pub fn edges(&self) -> impl Iterator<Item = (&Declaration, &Declaration)> {
        self.graph
            .raw_edges()
            .iter()
            .map(|edge| (&self.graph[edge.source()], &self.graph[edge.target()]))
    }

    /// Direct targets of `declaration`; empty when it is not a node.
    pub fn targets<'a>(&'a self, declaration: &Declaration) -> Vec<&'a Declaration> {
        match self.node_map.get(declaration) {
            Some(&index) => self
                .graph
                .neighbors(index)
                .map(|target| &self.graph[target])
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Depth-first traversal from every root at once; each reachable node is
    /// visited exactly once. Roots that are not nodes are ignored.
    pub fn dfs<F>(&self, roots: &[Declaration], mut visitor: F)
    where
        F: FnMut(&Declaration),
    {
        let mut dfs = Dfs::empty(&self.graph);
        for root in roots {
            let Some(&start) = self.node_map.get(root) else {
                continue;
            };
            dfs.move_to(start);
            while let Some(index) = dfs.next(&self.graph) {
                visitor(&self.graph[index]);
            }
        }
    }

    fn index_of_or_insert(&mut self, declaration: Declaration) -> NodeIndex {
        match self.node_map.get(&declaration) {
            Some(&index) => index,
            None => self.insert_node(declaration),
        }
    }

    fn insert_node(&mut self, declaration: Declaration) -> NodeIndex {
        let index = self.graph.add_node(declaration.clone());
        self.node_map.insert(declaration, index);
        index
    }
}
