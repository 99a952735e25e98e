pub mod common;
pub mod go;

pub use go::{FileDeclarations, GoParser, ParsedFile};
