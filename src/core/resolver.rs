use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tree_sitter::Node as TSNode;

use super::module_path::module_for_file;
use super::{AnalysisError, Declaration, DeclarationIndex};
use crate::parsers::common::walk_with_ancestors;
use crate::parsers::go::{
    declared_names, is_declaration, reference_shape, FileDeclarations, ParsedFile,
    ReferenceShape, DISCARD_IDENTIFIER,
};

/// A resolved "`from` references `to`" pair.
pub type Reference = (Declaration, Declaration);

/// Where the node being visited sits, in terms of top-level declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Enclosing {
    /// Outside any named declaration.
    FileRoot,
    /// Inside a declaration introducing these (non-discard) names.
    Declarations(Vec<String>),
    /// Inside a declaration whose every name is the discard identifier.
    Discarded,
}

/// Turns identifiers and member accesses into declaration-to-declaration references.
pub struct ReferenceResolver<'a> {
    index: &'a DeclarationIndex,
    project_root: PathBuf,
    root_module: String,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(index: &'a DeclarationIndex, project_root: &Path, root_module: &str) -> Self {
        Self {
            index,
            project_root: project_root.to_path_buf(),
            root_module: root_module.to_string(),
        }
    }

    /// All references found in one file, in traversal order, without
    /// self-references. Duplicates are left for the graph to collapse.
    pub fn resolve_file(&self, file: &ParsedFile) -> Result<Vec<Reference>, AnalysisError> {
        let declarations = &file.declarations;
        let source = file.source.as_bytes();
        let module = module_for_file(
            &declarations.file_path,
            &self.project_root,
            &self.root_module,
        )?;

        let file_root = vec![Declaration::file_root(declarations.file_path.clone())];
        // declaration node id -> the declarations it stands for
        let mut origins: HashMap<usize, Vec<Declaration>> = HashMap::new();
        let mut references = Vec::new();

        walk_with_ancestors(file.tree.root_node(), |ancestors, node| -> Result<(), AnalysisError> {
            let Some(shape) = reference_shape(&node, ancestors.last(), source) else {
                return Ok(());
            };

            let from: &[Declaration] = match outermost_declaration(ancestors) {
                None => &file_root,
                Some(declaration) => {
                    let id = declaration.id();
                    if !origins.contains_key(&id) {
                        let enclosing =
                            enclosing_of(declaration, source, &declarations.file_path)?;
                        origins.insert(id, origins_of(enclosing, declarations));
                    }
                    &origins[&id]
                }
            };
            if from.is_empty() {
                return Ok(());
            }

            let Some(target) = self.resolve_shape(&shape, &module, declarations) else {
                return Ok(());
            };

            // names of one spec never reference each other
            if from.contains(target) {
                return Ok(());
            }
            references.extend(from.iter().map(|origin| (origin.clone(), target.clone())));
            Ok(())
        })?;

        Ok(references)
    }

    fn resolve_shape(
        &self,
        shape: &ReferenceShape,
        module: &str,
        file: &FileDeclarations,
    ) -> Option<&'a Declaration> {
        match *shape {
            ReferenceShape::Identifier(name) => self.index.lookup(module, name),
            ReferenceShape::Member { object, member } => {
                // a module-level declaration shadows an import of the same name
                if self.index.lookup(module, object).is_some() {
                    return None;
                }
                let import = file.import_by_alias(object)?;
                self.index.lookup(&import.path, member)
            }
        }
    }
}

/// The outermost declaration on the ancestor path, which is the top-level one.
pub fn enclosing_declaration(
    ancestors: &[TSNode],
    source: &[u8],
    file_path: &Path,
) -> Result<Enclosing, AnalysisError> {
    match outermost_declaration(ancestors) {
        Some(declaration) => enclosing_of(declaration, source, file_path),
        None => Ok(Enclosing::FileRoot),
    }
}

fn outermost_declaration<'a, 'tree>(ancestors: &'a [TSNode<'tree>]) -> Option<&'a TSNode<'tree>> {
    ancestors.iter().find(|ancestor| is_declaration(ancestor))
}

fn enclosing_of(
    declaration: &TSNode,
    source: &[u8],
    file_path: &Path,
) -> Result<Enclosing, AnalysisError> {
    let Some((_, names)) = declared_names(declaration, source, file_path)? else {
        return Ok(Enclosing::FileRoot);
    };
    let names: Vec<String> = names
        .into_iter()
        .filter(|name| name != DISCARD_IDENTIFIER)
        .collect();
    if names.is_empty() {
        return Ok(Enclosing::Discarded);
    }
    Ok(Enclosing::Declarations(names))
}

fn origins_of(enclosing: Enclosing, file: &FileDeclarations) -> Vec<Declaration> {
    match enclosing {
        Enclosing::Declarations(names) => names
            .iter()
            .filter_map(|name| file.declarations.get(name).cloned())
            .collect(),
        Enclosing::FileRoot | Enclosing::Discarded => Vec::new(),
    }
}
