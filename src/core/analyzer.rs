use rayon::prelude::*;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

use super::module_path::read_module_path;
use super::reachability::{find_unreachable, is_entrypoint};
use super::{
    AnalysisError, AnalysisOptions, Declaration, DeclarationIndex, FileScanner, ReferenceGraph,
    ReferenceResolver,
};
use crate::parsers::go::{GoParser, ParsedFile};

/// Outcome of analyzing one project root.
#[derive(Debug)]
pub struct Analysis {
    pub root: PathBuf,
    pub root_module: String,
    pub graph: ReferenceGraph,
    pub index: DeclarationIndex,
    pub entrypoints: BTreeSet<Declaration>,
    pub unreachable: BTreeSet<Declaration>,
}

impl Analysis {
    /// `<relative-file-path>::<name>` of every unreachable declaration, sorted.
    pub fn unreachable_names(&self) -> Result<Vec<String>, AnalysisError> {
        let mut names = self
            .unreachable
            .iter()
            .map(|declaration| declaration.display_name(&self.root))
            .collect::<Result<Vec<_>, _>>()?;
        names.sort();
        Ok(names)
    }

    /// Base name of the project directory, used to name rendered artifacts.
    pub fn project_name(&self) -> String {
        self.root
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "project".to_string())
    }
}

pub struct ProjectAnalyzer {
    file_scanner: FileScanner,
    parser: GoParser,
}

impl ProjectAnalyzer {
    pub fn new(options: AnalysisOptions) -> Self {
        Self {
            file_scanner: FileScanner::new(options),
            parser: GoParser::new(),
        }
    }

    pub fn analyze(&self, root_path: &Path) -> Result<Analysis, AnalysisError> {
        let start = Instant::now();
        let root = fs::canonicalize(root_path).map_err(|err| AnalysisError::io(root_path, err))?;
        let root_module = read_module_path(&root)?;
        info!(root = %root.display(), module = %root_module, "analyzing project");

        let files = self.file_scanner.scan_directory(&root)?;
        info!("Found {} files to analyze", files.len());

        let parsed = self.parse_files(files)?;

        let index = DeclarationIndex::build(
            parsed.iter().map(|file| &file.declarations),
            &root,
            &root_module,
        )?;

        let mut graph = ReferenceGraph::new();
        let mut entrypoints = BTreeSet::new();
        for file in &parsed {
            let package = file.declarations.package.as_str();
            for declaration in file.declarations.declarations.values() {
                graph.add_node(declaration.clone());
                if is_entrypoint(declaration, package) {
                    entrypoints.insert(declaration.clone());
                }
            }
        }

        debug!("Resolving references...");
        let resolver = ReferenceResolver::new(&index, &root, &root_module);
        let per_file: Vec<Result<_, AnalysisError>> = parsed
            .into_par_iter()
            .map(|file| resolver.resolve_file(&file))
            .collect();

        let mut added = 0usize;
        for references in per_file {
            for (from, to) in references? {
                if from.is_file_root() {
                    entrypoints.insert(from.clone());
                }
                if graph.add_edge(from, to) {
                    added += 1;
                }
            }
        }

        let unreachable = find_unreachable(&graph, &entrypoints);
        info!(
            nodes = graph.node_count(),
            edges = added,
            entrypoints = entrypoints.len(),
            unreachable = unreachable.len(),
            "Analysis completed in {:.2}s",
            start.elapsed().as_secs_f64()
        );

        Ok(Analysis {
            root,
            root_module,
            graph,
            index,
            entrypoints,
            unreachable,
        })
    }

    /// Parses in parallel; results stay in path order, and the first failing
    /// file in that order decides the error.
    fn parse_files(&self, files: Vec<PathBuf>) -> Result<Vec<ParsedFile>, AnalysisError> {
        let results: Vec<Result<ParsedFile, AnalysisError>> = files
            .par_iter()
            .map(|path| self.parser.parse_file(path))
            .collect();
        results.into_iter().collect()
    }
}
