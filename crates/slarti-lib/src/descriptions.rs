//! Name registry: the `(node, name, document)` entries scope tables are made of.

use std::fmt;

use serde::Serialize;
use slarti_core::{Ast, NodeId};

/// Identifies the document a description was produced from.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize)]
#[serde(transparent)]
pub struct DocumentId(u32);

impl DocumentId {
    #[inline]
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "doc#{}", self.0)
    }
}

/// How a description came to be in a table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// Bare local name of a declaration in this container.
    Declared,
    /// Lifted out of a nested container with its name prefixed.
    Qualified,
    /// Synthesized by `require`.
    RequireAlias,
    /// Spliced in by `apply`; visible only inside the apply.
    Applied,
    /// Visible to other documents.
    Exported,
}

impl Origin {
    pub fn as_str(self) -> &'static str {
        match self {
            Origin::Declared => "declared",
            Origin::Qualified => "qualified",
            Origin::RequireAlias => "alias",
            Origin::Applied => "applied",
            Origin::Exported => "exported",
        }
    }
}

/// A name under which a node can be found.
///
/// The same node usually has several descriptions: its bare name in its
/// container, and one qualified name per enclosing container.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Description {
    pub node: NodeId,
    pub name: String,
    pub document: DocumentId,
    pub origin: Origin,
}

impl Description {
    /// Same node under `prefix.name`.
    pub fn qualified(&self, prefix: &str) -> Self {
        let origin = match self.origin {
            Origin::Declared => Origin::Qualified,
            other => other,
        };
        Self {
            node: self.node,
            name: qualify(prefix, &self.name),
            document: self.document,
            origin,
        }
    }

    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    /// Name segments before the last `.`, if any.
    pub fn qualifier(&self) -> Option<&str> {
        self.name.rsplit_once('.').map(|(q, _)| q)
    }
}

/// Description factory bound to one document.
#[derive(Clone, Copy, Debug)]
pub struct Descriptions {
    document: DocumentId,
}

impl Descriptions {
    pub fn new(document: DocumentId) -> Self {
        Self { document }
    }

    pub fn document(&self) -> DocumentId {
        self.document
    }

    fn make(&self, node: NodeId, name: impl Into<String>, origin: Origin) -> Description {
        Description {
            node,
            name: name.into(),
            document: self.document,
            origin,
        }
    }

    /// Bare name of a named node. `None` for anonymous kinds.
    pub fn local(&self, ast: &Ast, node: NodeId) -> Option<Description> {
        let name = ast.name(node)?;
        Some(self.make(node, name, Origin::Declared))
    }

    pub fn alias(&self, node: NodeId, name: impl Into<String>) -> Description {
        self.make(node, name, Origin::RequireAlias)
    }

    /// Fully qualified path of a named node, for other documents.
    pub fn exported(&self, ast: &Ast, node: NodeId) -> Option<Description> {
        let name = qualified_name(ast, node)?;
        Some(self.make(node, name, Origin::Exported))
    }
}

/// `prefix.name`, or `name` when the prefix is empty.
pub fn qualify(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        return name.to_owned();
    }
    format!("{prefix}.{name}")
}

/// Dotted path from the outermost named ancestor down to `node`.
///
/// Unnamed ancestors (the model root, applies) contribute nothing.
pub fn qualified_name(ast: &Ast, node: NodeId) -> Option<String> {
    let name = ast.name(node)?;
    let mut segments: Vec<&str> = ast.ancestors(node).filter_map(|a| ast.name(a)).collect();
    segments.reverse();
    segments.push(name);
    Some(segments.join("."))
}
