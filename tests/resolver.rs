use gorefs::core::resolver::{enclosing_declaration, Enclosing};
use gorefs::core::{DeclarationIndex, Reference, ReferenceResolver};
use gorefs::parsers::common::walk_with_ancestors;
use gorefs::parsers::{GoParser, ParsedFile};
use std::convert::Infallible;
use std::path::Path;

const ROOT: &str = "/project";
const MODULE: &str = "example.com/project";

fn parse(path: &str, source: &str) -> ParsedFile {
    GoParser::new()
        .parse_source(Path::new(path), source.to_string())
        .unwrap()
}

/// Resolves every file against an index of all of them, returning
/// `from -> to` pairs as `name -> name` strings.
fn resolve(files: &[ParsedFile]) -> Vec<(String, String)> {
    let index = DeclarationIndex::build(
        files.iter().map(|f| &f.declarations),
        Path::new(ROOT),
        MODULE,
    )
    .unwrap();
    let resolver = ReferenceResolver::new(&index, Path::new(ROOT), MODULE);

    let mut pairs: Vec<(String, String)> = files
        .iter()
        .flat_map(|file| resolver.resolve_file(file).unwrap())
        .map(|(from, to): Reference| (from.name, to.name))
        .collect();
    pairs.sort();
    pairs.dedup();
    pairs
}

fn pair(from: &str, to: &str) -> (String, String) {
    (from.to_string(), to.to_string())
}

#[test]
fn resolver_links_local_calls() {
    let file = parse(
        "/project/main.go",
        "package main\n\nfunc main() {\n\thelper()\n}\n\nfunc helper() {}\n",
    );
    assert_eq!(resolve(&[file]), vec![pair("main", "helper")]);
}

#[test]
fn resolver_links_declarations_across_files_of_one_directory() {
    let a = parse("/project/a.go", "package main\n\nfunc main() { fromB() }\n");
    let b = parse("/project/b.go", "package main\n\nfunc fromB() {}\n");
    let index = DeclarationIndex::build([&a.declarations, &b.declarations], Path::new(ROOT), MODULE)
        .unwrap();
    let resolver = ReferenceResolver::new(&index, Path::new(ROOT), MODULE);

    let references = resolver.resolve_file(&a).unwrap();
    assert_eq!(references.len(), 1);
    let (from, to) = &references[0];
    assert_eq!(from.file_path, Path::new("/project/a.go"));
    assert_eq!(to.file_path, Path::new("/project/b.go"));
    assert_eq!(to.name, "fromB");
}

#[test]
fn resolver_follows_import_aliases_into_other_modules() {
    let main = parse(
        "/project/main.go",
        "package main\n\nimport (\n\t\"example.com/project/lib\"\n\tu \"example.com/project/pkg/util\"\n)\n\nfunc main() {\n\tlib.Target()\n\tvar _ u.Config\n}\n",
    );
    let lib = parse("/project/lib/lib.go", "package lib\n\nfunc Target() {}\n\nfunc Other() {}\n");
    let util = parse("/project/pkg/util/util.go", "package util\n\ntype Config struct{}\n");

    assert_eq!(
        resolve(&[main, lib, util]),
        vec![pair("main", "Config"), pair("main", "Target")]
    );
}

#[test]
fn local_declaration_shadows_import_alias() {
    let main = parse(
        "/project/main.go",
        "package main\n\nimport \"example.com/project/lib\"\n\nvar lib = struct{ Target int }{}\n\nfunc main() {\n\t_ = lib.Target\n}\n",
    );
    let lib = parse("/project/lib/lib.go", "package lib\n\nfunc Target() {}\n");

    assert_eq!(resolve(&[main, lib]), vec![pair("main", "lib")]);
}

#[test]
fn recursion_produces_no_self_reference() {
    let file = parse(
        "/project/s.go",
        "package p\n\ntype Struct struct{}\n\nfunc (s *Struct) Method() {\n\ts.Method()\n}\n",
    );
    let pairs = resolve(&[file]);
    assert_eq!(pairs, vec![pair("Struct::Method", "Struct")]);
    assert!(pairs.iter().all(|(from, to)| from != to));
}

#[test]
fn references_inside_discarded_declarations_are_dropped() {
    let file = parse(
        "/project/d.go",
        "package p\n\ntype Iface interface{ M() }\n\ntype Impl struct{}\n\nfunc (Impl) M() {}\n\nvar _ Iface = Impl{}\n\nfunc helper() int { return 1 }\n\nvar _ = helper()\n",
    );
    let pairs = resolve(&[file]);
    assert_eq!(pairs, vec![pair("Impl::M", "Impl")]);
}

#[test]
fn types_are_referenced_from_struct_fields_and_signatures() {
    let file = parse(
        "/project/t.go",
        "package p\n\ntype Elem struct{}\n\ntype List struct {\n\titems []Elem\n}\n\nfunc build(e Elem) List { return List{} }\n",
    );
    assert_eq!(
        resolve(&[file]),
        vec![pair("List", "Elem"), pair("build", "Elem"), pair("build", "List")]
    );
}

#[test]
fn multi_name_value_specs_attribute_references_to_every_name() {
    let file = parse(
        "/project/v.go",
        "package p\n\nfunc one() int { return 1 }\n\nfunc two() int { return 2 }\n\nvar a, b = one(), two()\n",
    );
    assert_eq!(
        resolve(&[file]),
        vec![
            pair("a", "one"),
            pair("a", "two"),
            pair("b", "one"),
            pair("b", "two"),
        ]
    );
}

#[test]
fn specs_of_one_group_keep_their_own_references() {
    let file = parse(
        "/project/g.go",
        "package p\n\nfunc one() int { return 1 }\n\nfunc two() int { return 2 }\n\nvar (\n\tx = one()\n\ty = two()\n\tz = one()\n)\n",
    );
    assert_eq!(
        resolve(&[file]),
        vec![pair("x", "one"), pair("y", "two"), pair("z", "one")]
    );
}

#[test]
fn qualified_type_names_resolve_only_through_the_import() {
    let lib = parse("/project/lib/lib.go", "package lib\n\ntype Config struct{}\n");
    let main = parse(
        "/project/main.go",
        "package main\n\nimport \"example.com/project/lib\"\n\ntype Config struct{}\n\nvar current lib.Config\n",
    );
    let index = DeclarationIndex::build(
        [&lib.declarations, &main.declarations],
        Path::new(ROOT),
        MODULE,
    )
    .unwrap();
    let resolver = ReferenceResolver::new(&index, Path::new(ROOT), MODULE);
    let references = resolver.resolve_file(&main).unwrap();

    assert_eq!(references.len(), 1);
    let (from, to) = &references[0];
    assert_eq!(from.name, "current");
    assert_eq!(to.name, "Config");
    assert_eq!(to.file_path, Path::new("/project/lib/lib.go"));
}

#[test]
fn lookup_misses_produce_nothing() {
    let file = parse(
        "/project/m.go",
        "package main\n\nimport \"fmt\"\n\nfunc main() {\n\tfmt.Println(undefined)\n}\n",
    );
    assert!(resolve(&[file]).is_empty());
}

#[test]
fn enclosing_declaration_is_the_outermost_one() {
    let file = parse(
        "/project/e.go",
        "package p\n\nvar top = 1\n\nfunc outer() {\n\ttype local struct{}\n\t_ = top\n}\n",
    );
    let source = file.source.as_bytes();
    let mut seen = Vec::new();
    walk_with_ancestors(file.tree.root_node(), |ancestors, node| -> Result<(), Infallible> {
        if node.kind() == "identifier" || node.kind() == "type_identifier" {
            let text = node.utf8_text(source).unwrap().to_string();
            let enclosing = enclosing_declaration(ancestors, source, file.file_path()).unwrap();
            seen.push((text, enclosing));
        }
        Ok(())
    })
    .unwrap();

    let names = |decls: &[&str]| {
        Enclosing::Declarations(decls.iter().map(|s| s.to_string()).collect())
    };
    assert_eq!(
        seen,
        vec![
            ("top".to_string(), names(&["top"])),
            ("outer".to_string(), names(&["outer"])),
            ("local".to_string(), names(&["outer"])),
            ("_".to_string(), names(&["outer"])),
            ("top".to_string(), names(&["outer"])),
        ]
    );
}

#[test]
fn walk_with_ancestors_tracks_the_path_to_each_node() {
    let file = parse("/project/w.go", "package p\n\nfunc f() {}\n");
    let mut visits = Vec::new();
    walk_with_ancestors(file.tree.root_node(), |ancestors, node| -> Result<(), Infallible> {
        let path: Vec<&str> = ancestors.iter().map(|a| a.kind()).collect();
        visits.push((node.kind(), path));
        Ok(())
    })
    .unwrap();

    assert_eq!(visits[0], ("source_file", vec![]));
    let function = visits
        .iter()
        .find(|(kind, _)| *kind == "identifier")
        .unwrap();
    assert_eq!(function.1, vec!["source_file", "function_declaration"]);
    assert!(visits
        .iter()
        .all(|(kind, path)| *kind == "source_file" || path.first() == Some(&"source_file")));
}
