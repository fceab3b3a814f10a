//! Arena of immutable nodes.
//!
//! Nodes are addressed by [`NodeId`] and never mutated once the [`Ast`] is
//! built. Children are stored as id lists on the parent's kind data, in
//! source order; every node except the root records its container.

use std::fmt;
use std::ops::Index;

use rowan::TextRange;
use serde::Serialize;

/// A lightweight handle to a node in an [`Ast`].
///
/// Ids are assigned in pre-order, so the root is always index 0.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A declared name and where it was written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Name {
    pub text: String,
    pub range: TextRange,
}

impl Name {
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_range(text, TextRange::default())
    }

    pub fn with_range(text: impl Into<String>, range: TextRange) -> Self {
        Self {
            text: text.into(),
            range,
        }
    }
}

/// Use-site text that must resolve to a named node. May be dotted (`P2.P1`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reference {
    pub text: String,
    pub range: TextRange,
}

impl Reference {
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_range(text, TextRange::default())
    }

    pub fn with_range(text: impl Into<String>, range: TextRange) -> Self {
        Self {
            text: text.into(),
            range,
        }
    }

    pub fn is_qualified(&self) -> bool {
        self.text.contains('.')
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.text.split('.')
    }
}

/// Discriminator over node kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Kind {
    Model,
    Language,
    Namespace,
    Token,
    Term,
    Principle,
    Relation,
    Apply,
    Require,
    Specification,
    Instance,
    Binding,
    Metadata,
    Use,
}

impl Kind {
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Model => "Model",
            Kind::Language => "Language",
            Kind::Namespace => "Namespace",
            Kind::Token => "Token",
            Kind::Term => "Term",
            Kind::Principle => "Principle",
            Kind::Relation => "Relation",
            Kind::Apply => "Apply",
            Kind::Require => "Require",
            Kind::Specification => "Specification",
            Kind::Instance => "Instance",
            Kind::Binding => "Binding",
            Kind::Metadata => "Metadata",
            Kind::Use => "Use",
        }
    }

    /// Whether nodes of this kind own a scope table.
    pub fn is_container(self) -> bool {
        matches!(
            self,
            Kind::Model
                | Kind::Language
                | Kind::Namespace
                | Kind::Token
                | Kind::Principle
                | Kind::Relation
                | Kind::Apply
                | Kind::Specification
                | Kind::Instance
        )
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Model {
    pub elements: Vec<NodeId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Language {
    pub name: Name,
    pub metadata: Vec<NodeId>,
    pub tokens: Vec<NodeId>,
    pub principles: Vec<NodeId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Namespace {
    pub name: Name,
    pub elements: Vec<NodeId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub name: Name,
    pub metadata: Vec<NodeId>,
    pub terms: Vec<NodeId>,
}

/// `term A[T]`: a name bound to a token or relation type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Term {
    pub name: Name,
    pub type_ref: Option<Reference>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Principle {
    pub name: Name,
    pub metadata: Vec<NodeId>,
    pub requires: Vec<NodeId>,
    pub terms: Vec<NodeId>,
    pub relations: Vec<NodeId>,
    pub applies: Vec<NodeId>,
}

/// `relation test[Subject, Object]`. The object side may be a list
/// (`[Value, [Value, Value]]`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Relation {
    pub name: Name,
    pub metadata: Vec<NodeId>,
    pub subject: Vec<Reference>,
    pub object: Vec<Reference>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Apply {
    pub principle: Reference,
    pub bindings: Vec<NodeId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Require {
    pub principle: Reference,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Specification {
    pub name: Name,
    pub metadata: Vec<NodeId>,
    pub uses: Vec<NodeId>,
    pub instances: Vec<NodeId>,
}

/// `myTheme <- Colour.Theme { ... }`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instance {
    pub name: Name,
    pub metadata: Vec<NodeId>,
    pub of: Option<Reference>,
    pub bindings: Vec<NodeId>,
    pub applies: Vec<NodeId>,
}

/// `target -> value, value`. Inside an apply the target is a relation and the
/// values are its subject and object; inside an instance the target is a term.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Binding {
    pub target: Reference,
    pub values: Vec<BindingValue>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BindingValue {
    Ref(Reference),
    /// `#colour "#FFFFFF"`
    Literal { tag: Option<String>, text: String },
}

/// `:intro "..."`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Metadata {
    pub key: String,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Use {
    pub language: Reference,
}

/// Per-kind node data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Model(Model),
    Language(Language),
    Namespace(Namespace),
    Token(Token),
    Term(Term),
    Principle(Principle),
    Relation(Relation),
    Apply(Apply),
    Require(Require),
    Specification(Specification),
    Instance(Instance),
    Binding(Binding),
    Metadata(Metadata),
    Use(Use),
}

impl NodeKind {
    pub fn kind(&self) -> Kind {
        match self {
            NodeKind::Model(_) => Kind::Model,
            NodeKind::Language(_) => Kind::Language,
            NodeKind::Namespace(_) => Kind::Namespace,
            NodeKind::Token(_) => Kind::Token,
            NodeKind::Term(_) => Kind::Term,
            NodeKind::Principle(_) => Kind::Principle,
            NodeKind::Relation(_) => Kind::Relation,
            NodeKind::Apply(_) => Kind::Apply,
            NodeKind::Require(_) => Kind::Require,
            NodeKind::Specification(_) => Kind::Specification,
            NodeKind::Instance(_) => Kind::Instance,
            NodeKind::Binding(_) => Kind::Binding,
            NodeKind::Metadata(_) => Kind::Metadata,
            NodeKind::Use(_) => Kind::Use,
        }
    }

    /// The declared name, for kinds that carry one.
    pub fn name(&self) -> Option<&Name> {
        match self {
            NodeKind::Language(n) => Some(&n.name),
            NodeKind::Namespace(n) => Some(&n.name),
            NodeKind::Token(n) => Some(&n.name),
            NodeKind::Term(n) => Some(&n.name),
            NodeKind::Principle(n) => Some(&n.name),
            NodeKind::Relation(n) => Some(&n.name),
            NodeKind::Specification(n) => Some(&n.name),
            NodeKind::Instance(n) => Some(&n.name),
            NodeKind::Model(_)
            | NodeKind::Apply(_)
            | NodeKind::Require(_)
            | NodeKind::Binding(_)
            | NodeKind::Metadata(_)
            | NodeKind::Use(_) => None,
        }
    }

    /// All structural children in source order.
    pub fn children(&self) -> Vec<NodeId> {
        match self {
            NodeKind::Model(n) => n.elements.clone(),
            NodeKind::Namespace(n) => n.elements.clone(),
            NodeKind::Language(n) => {
                [n.metadata.as_slice(), n.tokens.as_slice(), n.principles.as_slice()].concat()
            }
            NodeKind::Token(n) => [n.metadata.as_slice(), n.terms.as_slice()].concat(),
            NodeKind::Principle(n) => [
                n.metadata.as_slice(),
                n.requires.as_slice(),
                n.terms.as_slice(),
                n.relations.as_slice(),
                n.applies.as_slice(),
            ]
            .concat(),
            NodeKind::Relation(n) => n.metadata.clone(),
            NodeKind::Apply(n) => n.bindings.clone(),
            NodeKind::Specification(n) => {
                [n.metadata.as_slice(), n.uses.as_slice(), n.instances.as_slice()].concat()
            }
            NodeKind::Instance(n) => {
                [n.metadata.as_slice(), n.bindings.as_slice(), n.applies.as_slice()].concat()
            }
            NodeKind::Term(_)
            | NodeKind::Require(_)
            | NodeKind::Binding(_)
            | NodeKind::Metadata(_)
            | NodeKind::Use(_) => Vec::new(),
        }
    }
}

/// Which property of a node a reference lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum RefSlot {
    Principle,
    Type,
    Subject,
    Object,
    Target,
    Value,
    Of,
    Language,
}

impl RefSlot {
    /// Property name as the parser's tree spells it.
    pub fn as_str(self) -> &'static str {
        match self {
            RefSlot::Principle => "principle",
            RefSlot::Type => "type",
            RefSlot::Subject => "subject",
            RefSlot::Object => "object",
            RefSlot::Target => "target",
            RefSlot::Value => "values",
            RefSlot::Of => "of",
            RefSlot::Language => "language",
        }
    }
}

impl fmt::Display for RefSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    /// The lexical container. `None` only for the root.
    pub parent: Option<NodeId>,
    pub range: TextRange,
}

impl Node {
    pub fn name(&self) -> Option<&str> {
        self.kind.name().map(|n| n.text.as_str())
    }
}

/// A parsed document tree. Index 0 is always the `Model` root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ast {
    nodes: Vec<Node>,
}

impl Ast {
    pub(crate) fn from_nodes(nodes: Vec<Node>) -> Self {
        debug_assert!(matches!(
            nodes.first().map(|n| n.kind.kind()),
            Some(Kind::Model)
        ));
        Self { nodes }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn kind(&self, id: NodeId) -> Kind {
        self[id].kind.kind()
    }

    pub fn name(&self, id: NodeId) -> Option<&str> {
        self[id].name()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self[id].parent
    }

    /// Containers from the immediate parent up to the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), |&p| self.parent(p))
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self[id].kind.children()
    }

    /// References carried by a node, with the slot and position they occupy.
    pub fn references(&self, id: NodeId) -> Vec<(RefSlot, usize, &Reference)> {
        let mut refs = Vec::new();
        match &self[id].kind {
            NodeKind::Term(term) => {
                if let Some(r) = &term.type_ref {
                    refs.push((RefSlot::Type, 0, r));
                }
            }
            NodeKind::Relation(rel) => {
                let subject = rel.subject.iter().enumerate();
                refs.extend(subject.map(|(i, r)| (RefSlot::Subject, i, r)));
                let object = rel.object.iter().enumerate();
                refs.extend(object.map(|(i, r)| (RefSlot::Object, i, r)));
            }
            NodeKind::Apply(apply) => refs.push((RefSlot::Principle, 0, &apply.principle)),
            NodeKind::Require(req) => refs.push((RefSlot::Principle, 0, &req.principle)),
            NodeKind::Instance(inst) => {
                if let Some(r) = &inst.of {
                    refs.push((RefSlot::Of, 0, r));
                }
            }
            NodeKind::Binding(binding) => {
                refs.push((RefSlot::Target, 0, &binding.target));
                for (i, value) in binding.values.iter().enumerate() {
                    if let BindingValue::Ref(r) = value {
                        refs.push((RefSlot::Value, i, r));
                    }
                }
            }
            NodeKind::Use(u) => refs.push((RefSlot::Language, 0, &u.language)),
            NodeKind::Model(_)
            | NodeKind::Language(_)
            | NodeKind::Namespace(_)
            | NodeKind::Token(_)
            | NodeKind::Principle(_)
            | NodeKind::Specification(_)
            | NodeKind::Metadata(_) => {}
        }
        refs
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all nodes in pre-order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId(i as u32), n))
    }
}

impl Index<NodeId> for Ast {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        self.nodes.get(id.index()).expect("NodeId from another Ast")
    }
}
