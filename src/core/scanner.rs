use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use super::AnalysisError;

pub const GO_EXTENSION: &str = "go";
pub const TEST_FILE_SUFFIX: &str = "_test.go";
pub const VCS_DIR: &str = ".git";

/// Which files of a project take part in an analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Directory names skipped wherever they appear below the root.
    pub ignore_dirs: Vec<String>,
    /// Analyze `_test.go` files as well.
    pub include_tests: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            ignore_dirs: vec![VCS_DIR.to_string()],
            include_tests: false,
        }
    }
}

impl AnalysisOptions {
    pub fn with_ignore_dir(mut self, dir: impl Into<String>) -> Self {
        let dir = dir.into();
        if !self.ignore_dirs.contains(&dir) {
            self.ignore_dirs.push(dir);
        }
        self
    }

    pub fn with_include_tests(mut self, include_tests: bool) -> Self {
        self.include_tests = include_tests;
        self
    }
}

pub struct FileScanner {
    options: AnalysisOptions,
}

impl FileScanner {
    pub fn new(options: AnalysisOptions) -> Self {
        Self { options }
    }

    /// All Go source files below `root_path`, sorted by path.
    pub fn scan_directory(&self, root_path: &Path) -> Result<Vec<PathBuf>, AnalysisError> {
        let mut files = Vec::new();

        let walker = WalkDir::new(root_path)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !self.is_ignored_dir(entry));

        for entry in walker {
            let entry = entry?;
            if entry.file_type().is_file() && self.is_source_file(entry.path()) {
                files.push(entry.into_path());
            }
        }

        files.sort();
        debug!(count = files.len(), root = %root_path.display(), "scanned source files");
        Ok(files)
    }

    fn is_ignored_dir(&self, entry: &DirEntry) -> bool {
        entry.file_type().is_dir()
            && entry
                .file_name()
                .to_str()
                .is_some_and(|name| self.options.ignore_dirs.iter().any(|dir| dir == name))
    }

    fn is_source_file(&self, path: &Path) -> bool {
        let is_go = path.extension().and_then(|ext| ext.to_str()) == Some(GO_EXTENSION);
        if !is_go {
            return false;
        }
        if self.options.include_tests {
            return true;
        }
        !path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(TEST_FILE_SUFFIX))
    }
}
