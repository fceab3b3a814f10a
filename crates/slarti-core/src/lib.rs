#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! AST model for Slarti documents.
//!
//! Two layers:
//! - **Ingestion layer** (`raw`): 1:1 mapping of the JSON tree a parser emits
//! - **Arena layer** (`Ast`): immutable, id-addressed nodes with parent links
//!
//! The arena is built either from JSON (`Ast::from_json`) or directly through
//! [`AstBuilder`]. Both paths go through the same builder, so every node
//! reachable from the root carries a correct container back-reference.

mod ast;
mod builder;
mod raw;

#[cfg(test)]
mod raw_tests;

pub use ast::{
    Apply, Ast, Binding, BindingValue, Instance, Kind, Language, Metadata, Model, Name, Namespace,
    Node, NodeId, NodeKind, Principle, RefSlot, Reference, Relation, Require, Specification, Term,
    Token, Use,
};
pub use builder::AstBuilder;
pub use raw::{RawData, RawNode, RawReference, RawRegion, RawValue};

/// Structural precondition violations.
///
/// Any of these means the input is not a valid Slarti tree and no analysis
/// may run on it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("malformed AST json: {0}")]
    Json(String),

    #[error("root node is a `{0}`, expected a `Model`")]
    RootNotModel(Kind),

    #[error("`{child}` cannot be placed inside `{parent}`")]
    UnexpectedChild { parent: Kind, child: Kind },

    #[error("`{0}` node was started but never finished")]
    UnfinishedNode(Kind),

    #[error("finish_node called without a matching start_node")]
    UnbalancedFinish,
}

pub type Result<T> = std::result::Result<T, Error>;
