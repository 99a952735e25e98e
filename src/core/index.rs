use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

use super::module_path::module_for_file;
use super::{AnalysisError, Declaration};
use crate::parsers::go::FileDeclarations;

/// Two files of one module declaring the same name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameCollision {
    pub module: String,
    pub name: String,
    pub kept: Declaration,
    pub replaced: Declaration,
}

/// module -> declaration name -> declaration
#[derive(Debug, Default)]
pub struct DeclarationIndex {
    modules: HashMap<String, HashMap<String, Declaration>>,
    collisions: Vec<NameCollision>,
}

impl DeclarationIndex {
    /// Merges every file's declarations into the namespace of its directory.
    ///
    /// Files are merged in the order given; when two files of one module
    /// declare the same name the later file wins and the collision is recorded.
    pub fn build<'a, I>(
        files: I,
        project_root: &Path,
        root_module: &str,
    ) -> Result<Self, AnalysisError>
    where
        I: IntoIterator<Item = &'a FileDeclarations>,
    {
        let mut index = Self::default();

        for file in files {
            let module = module_for_file(&file.file_path, project_root, root_module)?;
            let namespace = index.modules.entry(module.clone()).or_default();

            for (name, declaration) in &file.declarations {
                let Some(replaced) = namespace.insert(name.clone(), declaration.clone()) else {
                    continue;
                };
                if replaced == *declaration {
                    continue;
                }
                warn!(
                    module = %module,
                    name = %name,
                    kept = %declaration.file_path.display(),
                    replaced = %replaced.file_path.display(),
                    "declaration name collides within module; keeping the later file"
                );
                index.collisions.push(NameCollision {
                    module: module.clone(),
                    name: name.clone(),
                    kept: declaration.clone(),
                    replaced,
                });
            }
        }

        Ok(index)
    }

    pub fn lookup(&self, module: &str, name: &str) -> Option<&Declaration> {
        self.modules.get(module)?.get(name)
    }

    pub fn modules(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    pub fn collisions(&self) -> &[NameCollision] {
        &self.collisions
    }
}
