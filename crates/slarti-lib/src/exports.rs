//! Names a document makes visible to other documents.

use slarti_core::Ast;

use crate::descriptions::{Description, Descriptions};
use crate::scope::named_elements;

/// One description per top-level named element, keyed by its fully
/// qualified path. Nested declarations are not exported individually.
pub fn compute_exports(ast: &Ast, descriptions: Descriptions) -> Vec<Description> {
    let exports: Vec<_> = named_elements(ast, ast.root())
        .into_iter()
        .filter_map(|element| descriptions.exported(ast, element))
        .collect();
    tracing::debug!(
        document = %descriptions.document(),
        exports = exports.len(),
        "computed exports"
    );
    exports
}
