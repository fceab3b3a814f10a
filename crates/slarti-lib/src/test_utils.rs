use slarti_core::{Ast, AstBuilder, Kind, NodeId};

use crate::config::ScopeConfig;
use crate::descriptions::{Descriptions, DocumentId};
use crate::diagnostics::Diagnostics;
use crate::link::{LinkOutput, link};
use crate::scope::{ScopePrinter, ScopeTable, compute_local_scopes};

pub fn build(f: impl FnOnce(&mut AstBuilder)) -> Ast {
    let mut b = AstBuilder::new();
    f(&mut b);
    b.finish().unwrap()
}

pub fn scopes(ast: &Ast) -> ScopeTable {
    scopes_with(ast, &ScopeConfig::default())
}

pub fn scopes_with(ast: &Ast, config: &ScopeConfig) -> ScopeTable {
    compute_local_scopes(ast, Descriptions::new(DocumentId::default()), config).unwrap()
}

pub fn dump(ast: &Ast) -> String {
    let table = scopes(ast);
    ScopePrinter::new(ast, &table).dump()
}

pub fn link_document(ast: &Ast) -> (LinkOutput, Diagnostics) {
    let table = scopes(ast);
    let mut output = LinkOutput::default();
    let mut diagnostics = Diagnostics::new();
    link(
        ast,
        &table,
        &[],
        &ScopeConfig::default(),
        &mut output,
        &mut diagnostics,
    );
    (output, diagnostics)
}

/// First node of `kind` named `name`.
pub fn find(ast: &Ast, kind: Kind, name: &str) -> NodeId {
    ast.iter()
        .find(|(_, n)| n.kind.kind() == kind && n.name() == Some(name))
        .map(|(id, _)| id)
        .unwrap_or_else(|| panic!("no {kind} named {name}"))
}

/// First node of `kind`.
pub fn find_kind(ast: &Ast, kind: Kind) -> NodeId {
    ast.iter()
        .find(|(_, n)| n.kind.kind() == kind)
        .map(|(id, _)| id)
        .unwrap_or_else(|| panic!("no {kind}"))
}

/// ```text
/// token T
/// principle P1 { relation test[T, T] }
/// principle P2 { require P1 }
/// principle P3 { apply P2.P1 { test -> T, T } }
/// ```
pub fn requiring(b: &mut AstBuilder) {
    b.token("T", |_| {});
    b.principle("P1", |p| {
        p.relation("test", &["T"], &["T"]);
    });
    b.principle("P2", |p| {
        p.require("P1");
    });
    b.principle("P3", |p| {
        p.apply("P2.P1", |a| {
            a.binding("test", &["T", "T"]);
        });
    });
}

pub fn requiring_document() -> Ast {
    build(requiring)
}

/// [`requiring`] wrapped in `language L { ... }`.
pub fn requiring_language() -> Ast {
    build(|b| {
        b.language("L", requiring);
    })
}
