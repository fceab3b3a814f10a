use indoc::indoc;
use slarti_core::RefSlot;

use crate::Error;
use crate::config::ScopeConfig;
use crate::descriptions::{DocumentId, Origin};
use crate::test_utils::{build, requiring_document};
use crate::workspace::Workspace;

fn colours() -> slarti_core::Ast {
    build(|b| {
        b.token("Colour", |_| {});
    })
}

fn painting() -> slarti_core::Ast {
    build(|b| {
        b.principle("Paint", |p| {
            p.relation("paints", &["Colour"], &["Colour"]);
        });
    })
}

#[test]
fn open_build_commit() {
    let mut workspace = Workspace::new(ScopeConfig::new());
    let id = workspace.open(requiring_document());

    assert_eq!(workspace.len(), 1);
    assert!(workspace.current_build(id).is_none());

    let build = workspace.build(id).unwrap();
    assert_eq!(build.version, 0);
    assert!(build.diagnostics.is_empty());
    assert!(workspace.commit(id, build).unwrap());

    let current = workspace.current_build(id).unwrap();
    let root = workspace.document(id).unwrap().ast().root();
    assert!(current.scopes.lookup(root, "P2.P1.test").is_some());
}

#[test]
fn document_ids_are_sequential() {
    let mut workspace = Workspace::default();
    let a = workspace.open(colours());
    let b = workspace.open(painting());

    assert_eq!(a, DocumentId::from_raw(0));
    assert_eq!(b, DocumentId::from_raw(1));
    let ids: Vec<_> = workspace.documents().map(|d| d.id()).collect();
    assert_eq!(ids, [a, b]);
}

#[test]
fn update_bumps_version() {
    let mut workspace = Workspace::default();
    let id = workspace.open(colours());

    assert_eq!(workspace.update(id, painting()).unwrap(), 1);
    assert_eq!(workspace.update(id, colours()).unwrap(), 2);
    assert_eq!(workspace.document(id).unwrap().version(), 2);
}

#[test]
fn stale_build_after_update_is_rejected() {
    let mut workspace = Workspace::default();
    let id = workspace.open(colours());

    let build = workspace.build(id).unwrap();
    workspace.update(id, painting()).unwrap();

    assert!(!workspace.commit(id, build).unwrap());
    assert!(workspace.current_build(id).is_none());
}

#[test]
fn stale_build_after_other_document_opens_is_rejected() {
    let mut workspace = Workspace::default();
    let id = workspace.open(painting());

    let build = workspace.build(id).unwrap();
    assert_eq!(build.diagnostics.error_count(), 2);
    workspace.open(colours());

    assert!(!workspace.commit(id, build).unwrap());

    let rebuilt = workspace.build(id).unwrap();
    assert!(rebuilt.diagnostics.is_empty());
    assert!(workspace.commit(id, rebuilt).unwrap());
}

#[test]
fn any_change_invalidates_every_build() {
    let mut workspace = Workspace::default();
    let a = workspace.open(colours());
    let b = workspace.open(painting());
    workspace.build_all().unwrap();
    assert!(workspace.current_build(a).is_some());
    assert!(workspace.current_build(b).is_some());

    let revision = workspace.revision();
    workspace.update(a, colours()).unwrap();

    assert!(workspace.revision() > revision);
    assert!(workspace.current_build(a).is_none());
    assert!(workspace.current_build(b).is_none());
}

#[test]
fn close_invalidates_dependents() {
    let mut workspace = Workspace::default();
    let a = workspace.open(colours());
    let b = workspace.open(painting());
    workspace.build_all().unwrap();
    assert!(workspace.current_build(b).unwrap().diagnostics.is_empty());

    let closed = workspace.close(a).unwrap();
    assert_eq!(closed.id(), a);
    assert!(workspace.document(a).is_none());

    workspace.build_all().unwrap();
    let build = workspace.current_build(b).unwrap();
    assert_eq!(build.diagnostics.error_count(), 2);
}

#[test]
fn unknown_document() {
    let mut workspace = Workspace::default();
    let missing = DocumentId::from_raw(7);

    assert_eq!(
        workspace.update(missing, colours()),
        Err(Error::UnknownDocument(missing))
    );
    assert!(matches!(
        workspace.close(missing),
        Err(Error::UnknownDocument(_))
    ));
    assert!(matches!(
        workspace.build(missing),
        Err(Error::UnknownDocument(_))
    ));
    insta::assert_snapshot!(
        Error::UnknownDocument(missing).to_string(),
        @"unknown document `doc#7`"
    );
}

#[test]
fn commit_to_closed_document_fails() {
    let mut workspace = Workspace::default();
    let id = workspace.open(colours());
    let build = workspace.build(id).unwrap();
    workspace.close(id).unwrap();

    assert!(matches!(
        workspace.commit(id, build),
        Err(Error::UnknownDocument(_))
    ));
}

#[test]
fn global_index_excludes_the_document_itself() {
    let mut workspace = Workspace::default();
    let a = workspace.open(colours());
    let b = workspace.open(requiring_document());

    let names: Vec<_> = workspace
        .global_index(a)
        .into_iter()
        .map(|d| (d.name, d.document, d.origin))
        .collect();
    assert_eq!(
        names,
        [
            ("T".to_owned(), b, Origin::Exported),
            ("P1".to_owned(), b, Origin::Exported),
            ("P2".to_owned(), b, Origin::Exported),
            ("P3".to_owned(), b, Origin::Exported),
        ]
    );
    assert_eq!(workspace.global_index(b).len(), 1);
}

#[test]
fn links_across_documents() {
    let mut workspace = Workspace::default();
    let a = workspace.open(colours());
    let b = workspace.open(painting());
    workspace.build_all().unwrap();

    let ast = workspace.document(b).unwrap().ast();
    let paints = ast
        .iter()
        .find(|(_, n)| n.name() == Some("paints"))
        .map(|(id, _)| id)
        .unwrap();
    let build = workspace.current_build(b).unwrap();
    let target = build.links.get(paints, RefSlot::Subject, 0).unwrap();

    assert_eq!(target.document, a);
    assert_eq!(target.origin, Origin::Exported);
    assert_eq!(target.name, "Colour");
}

#[test]
fn links_stay_local_without_global_fallback() {
    let mut workspace = Workspace::new(ScopeConfig::new().global_fallback(false));
    workspace.open(colours());
    let b = workspace.open(painting());

    let build = workspace.build(b).unwrap();
    assert!(build.links.is_empty());
    assert_eq!(build.diagnostics.error_count(), 2);
}

#[test]
fn open_json() {
    let mut workspace = Workspace::default();
    let id = workspace
        .open_json(indoc! {r#"
            {
              "$type": "Model",
              "elements": [
                { "$type": "Token", "name": "Colour" }
              ]
            }
        "#})
        .unwrap();

    let build = workspace.build(id).unwrap();
    let names: Vec<_> = build.exports.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, ["Colour"]);
}

#[test]
fn open_json_rejects_malformed_trees() {
    let mut workspace = Workspace::default();

    let err = workspace
        .open_json(r#"{ "$type": "Token", "name": "T" }"#)
        .unwrap_err();
    assert_eq!(
        err,
        Error::Ast(slarti_core::Error::RootNotModel(slarti_core::Kind::Token))
    );
    assert!(matches!(
        workspace.open_json("not json"),
        Err(Error::Ast(slarti_core::Error::Json(_)))
    ));
    assert!(workspace.is_empty());
}

#[test]
fn update_json_keeps_version_on_error() {
    let mut workspace = Workspace::default();
    let id = workspace.open(colours());

    assert!(workspace.update_json(id, "{}").is_err());
    assert_eq!(workspace.document(id).unwrap().version(), 0);
}

#[test]
fn recursion_limit_surfaces_from_build() {
    let mut workspace = Workspace::new(ScopeConfig::new().recursion_limit(1));
    let id = workspace.open(requiring_document());

    assert_eq!(
        workspace.build(id).unwrap_err(),
        Error::RecursionLimitExceeded
    );
}
