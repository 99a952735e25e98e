use std::collections::{BTreeMap, HashMap};
use std::fmt::{self, Write as _};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::{Analysis, AnalysisError, Declaration};

const ENTRYPOINT_COLOR: &str = "palegreen";
const UNREACHABLE_COLOR: &str = "lightcoral";
const CLUSTER_COLOR: &str = "lightgrey";

/// Graphviz DOT rendering of a reference graph: one cluster per file,
/// entrypoints and unreachable declarations highlighted.
pub struct DotFormatter {
    highlight: bool,
}

impl DotFormatter {
    pub fn new() -> Self {
        Self { highlight: true }
    }

    pub fn with_highlight(mut self, highlight: bool) -> Self {
        self.highlight = highlight;
        self
    }

    /// Writes `<project>.dot` into `output_dir` and returns its path.
    pub fn format_to_dir(
        &self,
        analysis: &Analysis,
        output_dir: &Path,
    ) -> Result<PathBuf, AnalysisError> {
        let output_path = output_dir.join(format!("{}.dot", analysis.project_name()));
        self.format_to_file(analysis, &output_path)?;
        Ok(output_path)
    }

    pub fn format_to_file(&self, analysis: &Analysis, output_path: &Path) -> Result<(), AnalysisError> {
        let content = self.format_graph(analysis)?;
        fs::write(output_path, content).map_err(|err| AnalysisError::io(output_path, err))
    }

    pub fn format_graph(&self, analysis: &Analysis) -> Result<String, AnalysisError> {
        // file -> declarations, both sorted so the output is stable
        let mut files: BTreeMap<&Path, Vec<&Declaration>> = BTreeMap::new();
        for declaration in analysis.graph.nodes() {
            files
                .entry(declaration.file_path.as_path())
                .or_default()
                .push(declaration);
        }

        let mut clusters = Vec::with_capacity(files.len());
        for (file_path, mut declarations) in files {
            declarations.sort();
            let label = file_path
                .strip_prefix(&analysis.root)
                .map_err(|_| AnalysisError::PathOutsideRoot {
                    path: file_path.to_path_buf(),
                    root: analysis.root.clone(),
                })?
                .to_string_lossy()
                .into_owned();
            clusters.push((label, declarations));
        }

        let mut out = String::new();
        self.write_dot(analysis, &clusters, &mut out)?;
        Ok(out)
    }

    fn write_dot(
        &self,
        analysis: &Analysis,
        clusters: &[(String, Vec<&Declaration>)],
        out: &mut String,
    ) -> fmt::Result {
        let mut ids: HashMap<&Declaration, String> = HashMap::new();
        writeln!(out, "digraph \"{}\" {{", escape(&analysis.project_name()))?;
        writeln!(out, "  node [shape=box, style=filled, fillcolor=white];")?;

        for (cluster, (label, declarations)) in clusters.iter().enumerate() {
            writeln!(out, "  subgraph \"cluster_{cluster}\" {{")?;
            writeln!(out, "    label=\"{}\";", escape(label))?;
            writeln!(out, "    style=filled;")?;
            writeln!(out, "    color={CLUSTER_COLOR};")?;

            for declaration in declarations {
                let id = format!("n{}", ids.len());
                let name = if declaration.is_file_root() {
                    label.as_str()
                } else {
                    declaration.name.as_str()
                };
                writeln!(
                    out,
                    "    \"{id}\" [label=\"{}\"{}];",
                    escape(name),
                    self.fill(analysis, declaration)
                )?;
                ids.insert(*declaration, id);
            }
            writeln!(out, "  }}")?;
        }

        let mut edges: Vec<(&Declaration, &Declaration)> = analysis.graph.edges().collect();
        edges.sort();
        for (from, to) in edges {
            if let (Some(from_id), Some(to_id)) = (ids.get(from), ids.get(to)) {
                writeln!(out, "  \"{from_id}\" -> \"{to_id}\";")?;
            }
        }

        writeln!(out, "}}")
    }

    fn fill(&self, analysis: &Analysis, declaration: &Declaration) -> String {
        if !self.highlight {
            return String::new();
        }
        if analysis.entrypoints.contains(declaration) {
            format!(", fillcolor={ENTRYPOINT_COLOR}")
        } else if analysis.unreachable.contains(declaration) {
            format!(", fillcolor={UNREACHABLE_COLOR}")
        } else {
            String::new()
        }
    }
}

impl Default for DotFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
