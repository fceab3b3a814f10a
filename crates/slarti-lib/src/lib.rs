//! Slarti: scope computation and name resolution.
//!
//! Given a document tree from [`slarti_core`], computes for every container
//! the names visible inside it (qualified names for nested declarations,
//! `require` aliases, relations spliced by `apply`), the names the document
//! exports, and binds every reference to a declaration.
//!
//! # Example
//!
//! ```
//! use slarti_core::AstBuilder;
//! use slarti_lib::{ScopeConfig, Workspace};
//!
//! let mut b = AstBuilder::new();
//! b.token("T", |_| {});
//! b.principle("P1", |p| {
//!     p.relation("test", &["T"], &["T"]);
//! });
//! b.principle("P2", |p| {
//!     p.require("P1");
//! });
//!
//! let mut workspace = Workspace::new(ScopeConfig::new());
//! let id = workspace.open(b.finish().unwrap());
//! let build = workspace.build(id).unwrap();
//!
//! let root = workspace.document(id).unwrap().ast().root();
//! assert!(build.scopes.lookup(root, "P2.P1").is_some());
//! assert!(build.diagnostics.is_empty());
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod descriptions;
pub mod diagnostics;
pub mod exports;
pub mod link;
pub mod scope;
pub mod workspace;

mod utils;

#[cfg(test)]
mod test_utils;
#[cfg(test)]
mod utils_tests;
#[cfg(test)]
mod workspace_tests;

pub use config::{RequireMembers, ScopeConfig};
pub use descriptions::{Description, Descriptions, DocumentId, Origin, qualified_name, qualify};
pub use diagnostics::{Diagnostics, DiagnosticsPrinter, Severity};
pub use exports::compute_exports;
pub use link::{LinkOutput, RefKey, link, resolve};
pub use scope::{Frame, ScopePrinter, ScopeTable, compute_local_scopes};
pub use workspace::{Document, DocumentBuild, Workspace};

/// Fatal errors. Missing names are never errors; they surface as
/// [`Diagnostics`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The document tree violates a structural precondition.
    #[error(transparent)]
    Ast(#[from] slarti_core::Error),

    /// Containers nested deeper than the configured recursion limit.
    #[error("recursion limit exceeded")]
    RecursionLimitExceeded,

    #[error("unknown document `{0}`")]
    UnknownDocument(DocumentId),
}

pub type Result<T> = std::result::Result<T, Error>;
