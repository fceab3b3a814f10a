//! Stack-based tree builder.
//!
//! Low-level API mirrors rowan's `GreenNodeBuilder`: `start_node` opens a node
//! under the current parent, `finish_node` closes it. The closure helpers
//! (`language`, `principle`, ...) wrap that pair for hand-written trees.
//!
//! ```
//! use slarti_core::AstBuilder;
//!
//! let mut b = AstBuilder::new();
//! b.token("T", |_| {});
//! b.principle("P1", |p| {
//!     p.relation("test", &["T"], &["T"]);
//! });
//! let ast = b.finish().unwrap();
//! assert_eq!(ast.len(), 4);
//! ```

use rowan::TextRange;

use crate::ast::{
    Apply, Ast, Binding, BindingValue, Instance, Kind, Language, Metadata, Model, Name, Namespace,
    Node, NodeId, NodeKind, Principle, Reference, Relation, Require, Specification, Term, Token,
    Use,
};
use crate::{Error, Result};

#[derive(Debug)]
pub struct AstBuilder {
    nodes: Vec<Node>,
    stack: Vec<NodeId>,
    /// First misuse; reported by `finish`.
    error: Option<Error>,
}

impl Default for AstBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AstBuilder {
    /// Start a tree with an empty `Model` root.
    pub fn new() -> Self {
        let root = Node {
            kind: NodeKind::Model(Model::default()),
            parent: None,
            range: TextRange::default(),
        };
        Self {
            nodes: vec![root],
            stack: vec![NodeId::from_raw(0)],
            error: None,
        }
    }

    pub fn root_range(mut self, range: TextRange) -> Self {
        self.nodes[0].range = range;
        self
    }

    /// Open a node under the current parent.
    ///
    /// Child id lists in `kind` are ignored; children are attached as they
    /// are started.
    pub fn start_node(&mut self, kind: NodeKind, range: TextRange) -> NodeId {
        let id = NodeId::from_raw(self.nodes.len() as u32);
        let parent = self.current();
        let child_kind = kind.kind();
        self.nodes.push(Node {
            kind: clear_children(kind),
            parent: Some(parent),
            range,
        });
        if let Err(err) = self.attach(parent, id, child_kind) {
            self.error.get_or_insert(err);
        }
        self.stack.push(id);
        id
    }

    pub fn finish_node(&mut self) {
        // The root stays on the stack until `finish`.
        if self.stack.len() <= 1 {
            self.error.get_or_insert(Error::UnbalancedFinish);
            return;
        }
        self.stack.pop();
    }

    pub fn finish(self) -> Result<Ast> {
        if let Some(err) = self.error {
            return Err(err);
        }
        if self.stack.len() > 1 {
            let open = self.stack[self.stack.len() - 1];
            return Err(Error::UnfinishedNode(self.nodes[open.index()].kind.kind()));
        }
        Ok(Ast::from_nodes(self.nodes))
    }

    fn current(&self) -> NodeId {
        *self.stack.last().expect("root is never popped")
    }

    fn attach(&mut self, parent: NodeId, child: NodeId, child_kind: Kind) -> Result<()> {
        let parent_data = &mut self.nodes[parent.index()].kind;
        let parent_kind = parent_data.kind();
        let slot = match (parent_data, child_kind) {
            (NodeKind::Model(Model { elements }), k)
            | (NodeKind::Namespace(Namespace { elements, .. }), k)
                if is_element(k) =>
            {
                elements
            }

            (NodeKind::Language(n), Kind::Metadata) => &mut n.metadata,
            (NodeKind::Language(n), Kind::Token) => &mut n.tokens,
            (NodeKind::Language(n), Kind::Principle) => &mut n.principles,

            (NodeKind::Token(n), Kind::Metadata) => &mut n.metadata,
            (NodeKind::Token(n), Kind::Term) => &mut n.terms,

            (NodeKind::Principle(n), Kind::Metadata) => &mut n.metadata,
            (NodeKind::Principle(n), Kind::Require) => &mut n.requires,
            (NodeKind::Principle(n), Kind::Term) => &mut n.terms,
            (NodeKind::Principle(n), Kind::Relation) => &mut n.relations,
            (NodeKind::Principle(n), Kind::Apply) => &mut n.applies,

            (NodeKind::Relation(n), Kind::Metadata) => &mut n.metadata,

            (NodeKind::Apply(n), Kind::Binding) => &mut n.bindings,

            (NodeKind::Specification(n), Kind::Metadata) => &mut n.metadata,
            (NodeKind::Specification(n), Kind::Use) => &mut n.uses,
            (NodeKind::Specification(n), Kind::Instance) => &mut n.instances,

            (NodeKind::Instance(n), Kind::Metadata) => &mut n.metadata,
            (NodeKind::Instance(n), Kind::Binding) => &mut n.bindings,
            (NodeKind::Instance(n), Kind::Apply) => &mut n.applies,

            _ => {
                return Err(Error::UnexpectedChild {
                    parent: parent_kind,
                    child: child_kind,
                });
            }
        };
        slot.push(child);
        Ok(())
    }

    fn scoped(&mut self, kind: NodeKind, f: impl FnOnce(&mut Self)) -> NodeId {
        let id = self.start_node(kind, TextRange::default());
        f(self);
        self.finish_node();
        id
    }

    fn leaf(&mut self, kind: NodeKind) -> NodeId {
        self.scoped(kind, |_| {})
    }

    pub fn language(&mut self, name: &str, f: impl FnOnce(&mut Self)) -> NodeId {
        self.scoped(
            NodeKind::Language(Language {
                name: Name::new(name),
                metadata: Vec::new(),
                tokens: Vec::new(),
                principles: Vec::new(),
            }),
            f,
        )
    }

    pub fn namespace(&mut self, name: &str, f: impl FnOnce(&mut Self)) -> NodeId {
        self.scoped(
            NodeKind::Namespace(Namespace {
                name: Name::new(name),
                elements: Vec::new(),
            }),
            f,
        )
    }

    pub fn token(&mut self, name: &str, f: impl FnOnce(&mut Self)) -> NodeId {
        self.scoped(
            NodeKind::Token(Token {
                name: Name::new(name),
                metadata: Vec::new(),
                terms: Vec::new(),
            }),
            f,
        )
    }

    /// `term name[type_ref]`
    pub fn term(&mut self, name: &str, type_ref: Option<&str>) -> NodeId {
        self.leaf(NodeKind::Term(Term {
            name: Name::new(name),
            type_ref: type_ref.map(Reference::new),
        }))
    }

    pub fn principle(&mut self, name: &str, f: impl FnOnce(&mut Self)) -> NodeId {
        self.scoped(
            NodeKind::Principle(Principle {
                name: Name::new(name),
                metadata: Vec::new(),
                requires: Vec::new(),
                terms: Vec::new(),
                relations: Vec::new(),
                applies: Vec::new(),
            }),
            f,
        )
    }

    pub fn relation(&mut self, name: &str, subject: &[&str], object: &[&str]) -> NodeId {
        self.leaf(NodeKind::Relation(Relation {
            name: Name::new(name),
            metadata: Vec::new(),
            subject: subject.iter().map(|s| Reference::new(*s)).collect(),
            object: object.iter().map(|s| Reference::new(*s)).collect(),
        }))
    }

    pub fn require(&mut self, principle: &str) -> NodeId {
        self.leaf(NodeKind::Require(Require {
            principle: Reference::new(principle),
        }))
    }

    pub fn apply(&mut self, principle: &str, f: impl FnOnce(&mut Self)) -> NodeId {
        self.scoped(
            NodeKind::Apply(Apply {
                principle: Reference::new(principle),
                bindings: Vec::new(),
            }),
            f,
        )
    }

    /// `target -> value, value` where every value is a reference.
    pub fn binding(&mut self, target: &str, values: &[&str]) -> NodeId {
        self.leaf(NodeKind::Binding(Binding {
            target: Reference::new(target),
            values: values
                .iter()
                .map(|v| BindingValue::Ref(Reference::new(*v)))
                .collect(),
        }))
    }

    /// `target -> #tag "text"`
    pub fn binding_literal(&mut self, target: &str, tag: Option<&str>, text: &str) -> NodeId {
        self.leaf(NodeKind::Binding(Binding {
            target: Reference::new(target),
            values: vec![BindingValue::Literal {
                tag: tag.map(str::to_owned),
                text: text.to_owned(),
            }],
        }))
    }

    pub fn specification(&mut self, name: &str, f: impl FnOnce(&mut Self)) -> NodeId {
        self.scoped(
            NodeKind::Specification(Specification {
                name: Name::new(name),
                metadata: Vec::new(),
                uses: Vec::new(),
                instances: Vec::new(),
            }),
            f,
        )
    }

    /// `name <- of { ... }`
    pub fn instance(&mut self, name: &str, of: Option<&str>, f: impl FnOnce(&mut Self)) -> NodeId {
        self.scoped(
            NodeKind::Instance(Instance {
                name: Name::new(name),
                metadata: Vec::new(),
                of: of.map(Reference::new),
                bindings: Vec::new(),
                applies: Vec::new(),
            }),
            f,
        )
    }

    pub fn use_language(&mut self, language: &str) -> NodeId {
        self.leaf(NodeKind::Use(Use {
            language: Reference::new(language),
        }))
    }

    pub fn metadata(&mut self, key: &str, value: &str) -> NodeId {
        self.leaf(NodeKind::Metadata(Metadata {
            key: key.to_owned(),
            value: value.to_owned(),
        }))
    }
}

/// Kinds allowed directly inside a `Model` or `Namespace`.
fn is_element(kind: Kind) -> bool {
    matches!(
        kind,
        Kind::Language | Kind::Namespace | Kind::Token | Kind::Principle | Kind::Specification
    )
}

fn clear_children(mut kind: NodeKind) -> NodeKind {
    match &mut kind {
        NodeKind::Model(n) => n.elements.clear(),
        NodeKind::Namespace(n) => n.elements.clear(),
        NodeKind::Language(n) => {
            n.metadata.clear();
            n.tokens.clear();
            n.principles.clear();
        }
        NodeKind::Token(n) => {
            n.metadata.clear();
            n.terms.clear();
        }
        NodeKind::Principle(n) => {
            n.metadata.clear();
            n.requires.clear();
            n.terms.clear();
            n.relations.clear();
            n.applies.clear();
        }
        NodeKind::Relation(n) => n.metadata.clear(),
        NodeKind::Apply(n) => n.bindings.clear(),
        NodeKind::Specification(n) => {
            n.metadata.clear();
            n.uses.clear();
            n.instances.clear();
        }
        NodeKind::Instance(n) => {
            n.metadata.clear();
            n.bindings.clear();
            n.applies.clear();
        }
        NodeKind::Term(_)
        | NodeKind::Require(_)
        | NodeKind::Binding(_)
        | NodeKind::Metadata(_)
        | NodeKind::Use(_) => {}
    }
    kind
}
