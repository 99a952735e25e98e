use std::path::Path;
use tree_sitter::{Language, Node as TSNode, Parser, Tree};

use crate::core::{AnalysisError, Span};

pub struct TreeSitterParser {
    parser: Parser,
}

impl TreeSitterParser {
    pub fn new(language: Language, file_path: &Path) -> Result<Self, AnalysisError> {
        let mut parser = Parser::new();
        parser
            .set_language(language)
            .map_err(|err| AnalysisError::Parse {
                path: file_path.to_path_buf(),
                message: format!("incompatible grammar: {err}"),
            })?;
        Ok(Self { parser })
    }

    /// Parses `source`, rejecting trees that contain syntax errors.
    pub fn parse(&mut self, source: &str, file_path: &Path) -> Result<Tree, AnalysisError> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| AnalysisError::Parse {
                path: file_path.to_path_buf(),
                message: "parser produced no tree".to_string(),
            })?;

        if let Some(error_node) = first_error(tree.root_node()) {
            let position = error_node.start_position();
            let what = if error_node.is_missing() {
                format!("missing {}", error_node.kind())
            } else {
                "syntax error".to_string()
            };
            return Err(AnalysisError::Parse {
                path: file_path.to_path_buf(),
                message: format!("{what} at {}:{}", position.row + 1, position.column + 1),
            });
        }

        Ok(tree)
    }
}

/// First error or missing node in document order.
fn first_error(root: TSNode) -> Option<TSNode> {
    if !root.has_error() {
        return None;
    }
    let mut node = root;
    'descend: loop {
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.has_error() || child.is_missing() {
                node = child;
                continue 'descend;
            }
        }
        return Some(node);
    }
}

pub fn extract_text<'a>(node: &TSNode, source: &'a [u8]) -> &'a str {
    std::str::from_utf8(&source[node.byte_range()]).unwrap_or("")
}

pub fn node_span(node: &TSNode) -> Span {
    let start = node.start_position();
    let end = node.end_position();
    Span {
        start_line: start.row + 1,
        start_column: start.column + 1,
        end_line: end.row + 1,
        end_column: end.column + 1,
    }
}

pub fn find_child_by_kind<'a>(node: &TSNode<'a>, kind: &str) -> Option<TSNode<'a>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|child| child.kind() == kind);
    found
}

/// Pre-order walk over `root` that hands the visitor the ancestor path of
/// every node (outermost first, excluding the node itself).
///
/// The path is an explicit stack pushed on descent and popped on ascent, so
/// a visitor error stops the walk without unwinding any recursion.
pub fn walk_with_ancestors<'tree, F, E>(root: TSNode<'tree>, mut visit: F) -> Result<(), E>
where
    F: FnMut(&[TSNode<'tree>], TSNode<'tree>) -> Result<(), E>,
{
    let mut ancestors: Vec<TSNode<'tree>> = Vec::new();
    let mut cursor = root.walk();

    loop {
        let node = cursor.node();
        visit(&ancestors, node)?;

        if cursor.goto_first_child() {
            ancestors.push(node);
            continue;
        }

        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return Ok(());
            }
            ancestors.pop();
        }
    }
}
