use std::collections::BTreeSet;

use super::{Declaration, DeclarationKind, ReferenceGraph};

pub const INIT_FUNCTION: &str = "init";
pub const MAIN_FUNCTION: &str = "main";
pub const MAIN_PACKAGE: &str = "main";
pub const TEST_PREFIX: &str = "Test";

/// Whether `declaration`, found in a file of `package`, is always reachable.
pub fn is_entrypoint(declaration: &Declaration, package: &str) -> bool {
    match declaration.kind {
        DeclarationKind::FileRoot => true,
        DeclarationKind::Function => {
            let name = declaration.name.as_str();
            name == INIT_FUNCTION
                || (package == MAIN_PACKAGE && name == MAIN_FUNCTION)
                || is_test_function(name)
        }
        _ => false,
    }
}

/// `Test` followed by a remainder that starts with an uppercase letter.
pub fn is_test_function(name: &str) -> bool {
    name.strip_prefix(TEST_PREFIX)
        .and_then(|rest| rest.chars().next())
        .is_some_and(char::is_uppercase)
}

/// Every node of `graph` that no path from `entrypoints` reaches.
pub fn find_unreachable(
    graph: &ReferenceGraph,
    entrypoints: &BTreeSet<Declaration>,
) -> BTreeSet<Declaration> {
    let mut unreachable: BTreeSet<Declaration> = graph.nodes().cloned().collect();
    let roots: Vec<Declaration> = entrypoints.iter().cloned().collect();
    graph.dfs(&roots, |visited| {
        unreachable.remove(visited);
    });
    unreachable
}
