use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use tree_sitter::{Node as TSNode, Tree};

use super::common::{extract_text, find_child_by_kind, node_span, TreeSitterParser};
use crate::core::graph::qualify;
use crate::core::{AnalysisError, Declaration, DeclarationKind, Import};

/// Name marking a definition as intentionally unused.
pub const DISCARD_IDENTIFIER: &str = "_";

/// Top-level declarations and imports of one Go file.
#[derive(Debug, Clone)]
pub struct FileDeclarations {
    pub file_path: PathBuf,
    pub package: String,
    pub declarations: BTreeMap<String, Declaration>,
    pub imports: BTreeSet<Import>,
}

impl FileDeclarations {
    pub fn new(file_path: PathBuf) -> Self {
        Self {
            file_path,
            package: String::new(),
            declarations: BTreeMap::new(),
            imports: BTreeSet::new(),
        }
    }

    pub fn import_by_alias(&self, alias: &str) -> Option<&Import> {
        self.imports.iter().find(|import| import.alias == alias)
    }
}

/// A parsed file: its syntax tree, the source it was parsed from and what it declares.
pub struct ParsedFile {
    pub declarations: FileDeclarations,
    pub source: String,
    pub tree: Tree,
}

impl ParsedFile {
    pub fn file_path(&self) -> &Path {
        &self.declarations.file_path
    }
}

/// The two reference shapes the resolver understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceShape<'a> {
    /// `name`
    Identifier(&'a str),
    /// `object.member`, where `object` is a bare identifier
    Member { object: &'a str, member: &'a str },
}

pub struct GoParser;

impl GoParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse_file(&self, file_path: &Path) -> Result<ParsedFile, AnalysisError> {
        let source =
            fs::read_to_string(file_path).map_err(|err| AnalysisError::io(file_path, err))?;
        self.parse_source(file_path, source)
    }

    pub fn parse_source(
        &self,
        file_path: &Path,
        source: String,
    ) -> Result<ParsedFile, AnalysisError> {
        let mut parser = TreeSitterParser::new(tree_sitter_go::language(), file_path)?;
        let tree = parser.parse(&source, file_path)?;
        let declarations = self.extract(&tree.root_node(), source.as_bytes(), file_path)?;

        Ok(ParsedFile {
            declarations,
            source,
            tree,
        })
    }

    fn extract(
        &self,
        root: &TSNode,
        source: &[u8],
        file_path: &Path,
    ) -> Result<FileDeclarations, AnalysisError> {
        let mut file = FileDeclarations::new(file_path.to_path_buf());
        let mut cursor = root.walk();

        for child in root.named_children(&mut cursor) {
            match child.kind() {
                "package_clause" => {
                    if let Some(package) = find_child_by_kind(&child, "package_identifier") {
                        file.package = extract_text(&package, source).to_string();
                    }
                }
                "import_declaration" => {
                    for spec in specs(&child, "import_spec") {
                        let import = self.process_import(&spec, source, file_path)?;
                        file.imports.insert(import);
                    }
                }
                "function_declaration" | "method_declaration" => {
                    self.add_declarations(&child, source, file_path, &mut file)?;
                }
                "type_declaration" => {
                    for spec in specs(&child, "type_spec")
                        .into_iter()
                        .chain(specs(&child, "type_alias"))
                    {
                        self.add_declarations(&spec, source, file_path, &mut file)?;
                    }
                }
                "var_declaration" => {
                    for spec in specs(&child, "var_spec") {
                        self.add_declarations(&spec, source, file_path, &mut file)?;
                    }
                }
                "const_declaration" => {
                    for spec in specs(&child, "const_spec") {
                        self.add_declarations(&spec, source, file_path, &mut file)?;
                    }
                }
                _ => {}
            }
        }

        Ok(file)
    }

    fn add_declarations(
        &self,
        node: &TSNode,
        source: &[u8],
        file_path: &Path,
        file: &mut FileDeclarations,
    ) -> Result<(), AnalysisError> {
        let Some((kind, names)) = declared_names(node, source, file_path)? else {
            return Ok(());
        };
        let span = node_span(node);

        for name in names {
            if name == DISCARD_IDENTIFIER {
                continue;
            }
            let declaration =
                Declaration::new(file_path.to_path_buf(), name.clone(), kind).with_span(span);
            file.declarations.insert(name, declaration);
        }
        Ok(())
    }

    fn process_import(
        &self,
        spec: &TSNode,
        source: &[u8],
        file_path: &Path,
    ) -> Result<Import, AnalysisError> {
        let path_node = spec
            .child_by_field_name("path")
            .ok_or_else(|| AnalysisError::extraction(file_path, "import without a path"))?;

        let literal = extract_text(&path_node, source);
        let path = match path_node.kind() {
            "interpreted_string_literal" => literal.trim_matches('"'),
            "raw_string_literal" => literal.trim_matches('`'),
            other => {
                return Err(AnalysisError::extraction(
                    file_path,
                    format!("import path is not a string literal ({other}): {literal}"),
                ))
            }
        };

        let alias = spec
            .child_by_field_name("name")
            .map(|name| extract_text(&name, source).to_string());

        Ok(Import::new(path.to_string(), alias))
    }
}

impl Default for GoParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether `node` is one of the kinds [`declared_names`] understands.
pub fn is_declaration(node: &TSNode) -> bool {
    matches!(
        node.kind(),
        "function_declaration"
            | "method_declaration"
            | "type_spec"
            | "type_alias"
            | "var_spec"
            | "const_spec"
    )
}

/// Names a declaration node introduces, or `None` when `node` is not a declaration.
///
/// Methods are qualified as `Receiver::Method`. Value specs can introduce
/// several names; discard identifiers are returned as-is.
pub fn declared_names(
    node: &TSNode,
    source: &[u8],
    file_path: &Path,
) -> Result<Option<(DeclarationKind, Vec<String>)>, AnalysisError> {
    let declared = match node.kind() {
        "function_declaration" => field_text(node, "name", source)
            .map(|name| (DeclarationKind::Function, vec![name.to_string()])),
        "method_declaration" => {
            let name = method_name(node, source, file_path)?;
            Some((DeclarationKind::Method, vec![name]))
        }
        "type_spec" | "type_alias" => {
            field_text(node, "name", source).map(|name| (DeclarationKind::Type, vec![name.to_string()]))
        }
        "var_spec" | "const_spec" => {
            let mut cursor = node.walk();
            // the comma separators carry the `name` field too
            let names: Vec<String> = node
                .children_by_field_name("name", &mut cursor)
                .filter(|name| name.is_named())
                .map(|name| extract_text(&name, source).to_string())
                .collect();
            Some((DeclarationKind::Value, names))
        }
        _ => None,
    };
    Ok(declared)
}

/// `Receiver::Method` for a method declaration.
pub fn method_name(node: &TSNode, source: &[u8], file_path: &Path) -> Result<String, AnalysisError> {
    let name = field_text(node, "name", source)
        .ok_or_else(|| AnalysisError::extraction(file_path, "method without a name"))?;

    let receiver_type = node
        .child_by_field_name("receiver")
        .and_then(|receiver| {
            let mut cursor = receiver.walk();
            let parameter = receiver
                .named_children(&mut cursor)
                .find(|child| child.kind() == "parameter_declaration");
            parameter
        })
        .and_then(|parameter| parameter.child_by_field_name("type"));

    let receiver = receiver_type
        .and_then(|ty| receiver_base_name(&ty, source))
        .ok_or_else(|| {
            AnalysisError::extraction(
                file_path,
                format!("failed to get receiver name for {name}"),
            )
        })?;

    Ok(qualify(&[receiver, name]))
}

/// Bare type name under pointer, generic-instantiation and parenthesis wrapping.
fn receiver_base_name<'a>(node: &TSNode, source: &'a [u8]) -> Option<&'a str> {
    match node.kind() {
        "type_identifier" => Some(extract_text(node, source)),
        "generic_type" => node
            .child_by_field_name("type")
            .or_else(|| node.named_child(0))
            .and_then(|inner| receiver_base_name(&inner, source)),
        "pointer_type" | "parenthesized_type" => node
            .named_child(0)
            .and_then(|inner| receiver_base_name(&inner, source)),
        _ => None,
    }
}

/// Classifies `node`, whose parent is `parent`, as a reference if it has one
/// of the shapes in [`ReferenceShape`].
pub fn reference_shape<'a>(
    node: &TSNode,
    parent: Option<&TSNode>,
    source: &'a [u8],
) -> Option<ReferenceShape<'a>> {
    match node.kind() {
        "identifier" | "type_identifier" => {
            // the name half of `pkg.Type` is resolved through the import instead
            if parent.is_some_and(|parent| parent.kind() == "qualified_type") {
                return None;
            }
            Some(ReferenceShape::Identifier(extract_text(node, source)))
        }
        "selector_expression" => {
            let object = node.child_by_field_name("operand")?;
            if object.kind() != "identifier" {
                return None;
            }
            let member = node.child_by_field_name("field")?;
            Some(ReferenceShape::Member {
                object: extract_text(&object, source),
                member: extract_text(&member, source),
            })
        }
        "qualified_type" => {
            let object = node.child_by_field_name("package")?;
            let member = node.child_by_field_name("name")?;
            Some(ReferenceShape::Member {
                object: extract_text(&object, source),
                member: extract_text(&member, source),
            })
        }
        _ => None,
    }
}

fn field_text<'a>(node: &TSNode, field: &str, source: &'a [u8]) -> Option<&'a str> {
    node.child_by_field_name(field)
        .map(|child| extract_text(&child, source))
}

/// Specs of `kind` directly under a declaration or inside its parenthesized list.
fn specs<'a>(declaration: &TSNode<'a>, kind: &str) -> Vec<TSNode<'a>> {
    let mut found = Vec::new();
    let mut cursor = declaration.walk();
    for child in declaration.named_children(&mut cursor) {
        if child.kind() == kind {
            found.push(child);
        } else if child.kind().ends_with("_list") {
            let mut inner = child.walk();
            found.extend(
                child
                    .named_children(&mut inner)
                    .filter(|spec| spec.kind() == kind),
            );
        }
    }
    found
}
