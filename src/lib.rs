//! # gorefs
//!
//! Reference graph construction and dead declaration detection for Go projects.
//!
//! gorefs parses every Go file of a module with tree-sitter, indexes the
//! top-level declarations of each directory, resolves identifiers and
//! `import.Member` accesses into declaration-to-declaration edges, and marks
//! everything not reachable from an entrypoint (`main`, `init`, `TestXxx`).
//!
//! ## Outputs
//!
//! - **Unreachable**: sorted `<relative-file>::<declaration>` lines
//! - **DOT**: Graphviz rendering of the reference graph, one cluster per file
//! - **JSON-Compact**: machine-readable summary of entrypoints and dead declarations

pub mod core;
pub mod formatters;
pub mod parsers;
