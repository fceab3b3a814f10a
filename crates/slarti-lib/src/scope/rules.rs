//! Per-kind traversal rules.

use slarti_core::{Ast, NodeId, NodeKind};

/// Children that get a bare-name description in `container`'s table.
pub fn named_elements(ast: &Ast, container: NodeId) -> Vec<NodeId> {
    match &ast[container].kind {
        NodeKind::Model(n) => named(ast, &n.elements),
        NodeKind::Namespace(n) => named(ast, &n.elements),
        NodeKind::Language(n) => [n.tokens.as_slice(), n.principles.as_slice()].concat(),
        NodeKind::Specification(n) => n.instances.clone(),
        NodeKind::Principle(n) => [n.relations.as_slice(), n.terms.as_slice()].concat(),
        NodeKind::Token(n) => n.terms.clone(),
        NodeKind::Relation(_)
        | NodeKind::Apply(_)
        | NodeKind::Instance(_)
        | NodeKind::Term(_)
        | NodeKind::Require(_)
        | NodeKind::Binding(_)
        | NodeKind::Metadata(_)
        | NodeKind::Use(_) => Vec::new(),
    }
}

/// Children whose own tables are computed and lifted into `container`'s.
pub fn container_elements(ast: &Ast, container: NodeId) -> Vec<NodeId> {
    match &ast[container].kind {
        NodeKind::Model(n) => containers(ast, &n.elements),
        NodeKind::Namespace(n) => containers(ast, &n.elements),
        NodeKind::Language(n) => [n.tokens.as_slice(), n.principles.as_slice()].concat(),
        NodeKind::Specification(n) => n.instances.clone(),
        NodeKind::Principle(n) => [n.relations.as_slice(), n.applies.as_slice()].concat(),
        NodeKind::Instance(n) => n.applies.clone(),
        NodeKind::Token(_)
        | NodeKind::Relation(_)
        | NodeKind::Apply(_)
        | NodeKind::Term(_)
        | NodeKind::Require(_)
        | NodeKind::Binding(_)
        | NodeKind::Metadata(_)
        | NodeKind::Use(_) => Vec::new(),
    }
}

fn named(ast: &Ast, ids: &[NodeId]) -> Vec<NodeId> {
    ids.iter().copied().filter(|&id| ast.name(id).is_some()).collect()
}

fn containers(ast: &Ast, ids: &[NodeId]) -> Vec<NodeId> {
    ids.iter()
        .copied()
        .filter(|&id| ast.kind(id).is_container())
        .collect()
}
