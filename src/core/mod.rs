pub mod analyzer;
pub mod error;
pub mod graph;
pub mod index;
pub mod module_path;
pub mod reachability;
pub mod resolver;
pub mod scanner;

pub use analyzer::{Analysis, ProjectAnalyzer};
pub use error::AnalysisError;
pub use graph::{Declaration, DeclarationKind, Import, ReferenceGraph, Span};
pub use index::{DeclarationIndex, NameCollision};
pub use resolver::{Reference, ReferenceResolver};
pub use scanner::{AnalysisOptions, FileScanner};
