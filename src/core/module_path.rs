//! Mapping from source files to Go module paths.
//!
//! Every directory is one module: all files in it share a namespace, and the
//! module identifier is the directory's path below the project root joined
//! onto the root module path declared in `go.mod`.

use regex::Regex;
use std::fs;
use std::path::{Component, Path};
use std::sync::OnceLock;

use super::AnalysisError;

pub const MANIFEST_FILE: &str = "go.mod";

static MODULE_DIRECTIVE: OnceLock<Regex> = OnceLock::new();

/// Logical module identifier of the directory containing `file_path`.
pub fn module_for_file(
    file_path: &Path,
    project_root: &Path,
    root_module: &str,
) -> Result<String, AnalysisError> {
    let relative =
        file_path
            .strip_prefix(project_root)
            .map_err(|_| AnalysisError::PathOutsideRoot {
                path: file_path.to_path_buf(),
                root: project_root.to_path_buf(),
            })?;

    let mut module = root_module.trim_end_matches('/').to_string();
    let directory = relative.parent().unwrap_or_else(|| Path::new(""));
    for component in directory.components() {
        if let Component::Normal(segment) = component {
            module.push('/');
            module.push_str(&segment.to_string_lossy());
        }
    }
    Ok(module)
}

/// Reads the root module path from `<project_root>/go.mod`.
pub fn read_module_path(project_root: &Path) -> Result<String, AnalysisError> {
    let manifest = project_root.join(MANIFEST_FILE);
    let contents = fs::read_to_string(&manifest).map_err(|err| AnalysisError::Manifest {
        path: manifest.clone(),
        reason: err.to_string(),
    })?;

    parse_module_path(&contents).ok_or_else(|| AnalysisError::Manifest {
        path: manifest,
        reason: "no module directive found".to_string(),
    })
}

/// Extracts the path of the `module` directive, if any.
pub fn parse_module_path(contents: &str) -> Option<String> {
    let directive = MODULE_DIRECTIVE.get_or_init(|| {
        Regex::new(r#"^\s*module\s+(?:"([^"]+)"|`([^`]+)`|(\S+))\s*$"#)
            .expect("module directive pattern is valid")
    });

    contents.lines().find_map(|line| {
        let line = line.split("//").next().unwrap_or("");
        let captures = directive.captures(line)?;
        captures
            .get(1)
            .or_else(|| captures.get(2))
            .or_else(|| captures.get(3))
            .map(|path| path.as_str().to_string())
            .filter(|path| !path.is_empty())
    })
}
