use std::path::PathBuf;
use thiserror::Error;

/// Fatal conditions of one analysis run. Lookup misses are not errors and never show up here.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to walk project directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("invalid go module manifest {}: {reason}", path.display())]
    Manifest { path: PathBuf, reason: String },

    #[error("file {} does not start with root {}", path.display(), root.display())]
    PathOutsideRoot { path: PathBuf, root: PathBuf },

    #[error("failed to extract declarations from {}: {reason}", path.display())]
    Extraction { path: PathBuf, reason: String },

    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to render graph: {0}")]
    Render(#[from] std::fmt::Error),
}

impl AnalysisError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn extraction(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Extraction {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
