//! Ingestion layer: the JSON tree a parser emits.
//!
//! The shape follows what langium's JSON serializer produces: every node is
//! an object tagged with `$type`, references are `{ "$refText": "..." }`,
//! and `$textRegion` (when present) gives byte offsets into the source.
//! Unknown keys (`$ref`, `$cstNode`, ...) are ignored.

use rowan::{TextRange, TextSize};
use serde::Deserialize;

use crate::ast::{
    Apply, Ast, Binding, BindingValue, Instance, Kind, Language, Metadata, Name, Namespace,
    NodeKind, Principle, Reference, Relation, Require, Specification, Term, Token, Use,
};
use crate::builder::AstBuilder;
use crate::{Error, Result};

/// Byte offsets of a node or reference in its source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RawRegion {
    pub offset: u32,
    pub end: u32,
}

impl RawRegion {
    fn range(self) -> TextRange {
        let start = TextSize::from(self.offset);
        let end = TextSize::from(self.end.max(self.offset));
        TextRange::new(start, end)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawReference {
    #[serde(rename = "$refText")]
    pub text: String,
    #[serde(rename = "$textRegion", default)]
    pub region: Option<RawRegion>,
}

impl RawReference {
    fn lower(&self, fallback: TextRange) -> Reference {
        let range = self.region.map_or(fallback, RawRegion::range);
        Reference::with_range(self.text.clone(), range)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Ref(RawReference),
    Literal {
        #[serde(default)]
        tag: Option<String>,
        value: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawNode {
    #[serde(rename = "$textRegion", default)]
    pub region: Option<RawRegion>,
    #[serde(flatten)]
    pub data: RawData,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "$type")]
pub enum RawData {
    Model {
        #[serde(default)]
        elements: Vec<RawNode>,
    },
    Language {
        name: String,
        #[serde(default)]
        metadata: Vec<RawNode>,
        #[serde(default)]
        tokens: Vec<RawNode>,
        #[serde(default)]
        principles: Vec<RawNode>,
    },
    Namespace {
        name: String,
        #[serde(default)]
        elements: Vec<RawNode>,
    },
    Token {
        name: String,
        #[serde(default)]
        metadata: Vec<RawNode>,
        #[serde(default)]
        terms: Vec<RawNode>,
    },
    Term {
        name: String,
        #[serde(rename = "type", default)]
        type_ref: Option<RawReference>,
    },
    Principle {
        name: String,
        #[serde(default)]
        metadata: Vec<RawNode>,
        #[serde(default)]
        requires: Vec<RawNode>,
        #[serde(default)]
        terms: Vec<RawNode>,
        #[serde(default)]
        relations: Vec<RawNode>,
        #[serde(default)]
        applies: Vec<RawNode>,
    },
    Relation {
        name: String,
        #[serde(default)]
        metadata: Vec<RawNode>,
        #[serde(default)]
        subject: Vec<RawReference>,
        #[serde(default)]
        object: Vec<RawReference>,
    },
    Apply {
        principle: RawReference,
        #[serde(default)]
        bindings: Vec<RawNode>,
    },
    Require {
        principle: RawReference,
    },
    Specification {
        name: String,
        #[serde(default)]
        metadata: Vec<RawNode>,
        #[serde(default)]
        uses: Vec<RawNode>,
        #[serde(default)]
        instances: Vec<RawNode>,
    },
    Instance {
        name: String,
        #[serde(default)]
        metadata: Vec<RawNode>,
        #[serde(default)]
        of: Option<RawReference>,
        #[serde(default)]
        bindings: Vec<RawNode>,
        #[serde(default)]
        applies: Vec<RawNode>,
    },
    Binding {
        target: RawReference,
        #[serde(default)]
        values: Vec<RawValue>,
    },
    Metadata {
        key: String,
        value: String,
    },
    Use {
        language: RawReference,
    },
}

impl RawData {
    pub fn kind(&self) -> Kind {
        match self {
            RawData::Model { .. } => Kind::Model,
            RawData::Language { .. } => Kind::Language,
            RawData::Namespace { .. } => Kind::Namespace,
            RawData::Token { .. } => Kind::Token,
            RawData::Term { .. } => Kind::Term,
            RawData::Principle { .. } => Kind::Principle,
            RawData::Relation { .. } => Kind::Relation,
            RawData::Apply { .. } => Kind::Apply,
            RawData::Require { .. } => Kind::Require,
            RawData::Specification { .. } => Kind::Specification,
            RawData::Instance { .. } => Kind::Instance,
            RawData::Binding { .. } => Kind::Binding,
            RawData::Metadata { .. } => Kind::Metadata,
            RawData::Use { .. } => Kind::Use,
        }
    }
}

/// A child list together with the kind every entry must have.
/// `None` accepts any kind the parent allows (`Model` and `Namespace` elements).
type Group<'r> = (&'r [RawNode], Option<Kind>);

impl RawNode {
    fn range(&self) -> TextRange {
        self.region.map_or_else(TextRange::default, RawRegion::range)
    }

    /// Lower a `Model` root into an arena.
    pub fn lower(&self) -> Result<Ast> {
        let RawData::Model { elements } = &self.data else {
            return Err(Error::RootNotModel(self.data.kind()));
        };
        let mut builder = AstBuilder::new().root_range(self.range());
        for element in elements {
            element.lower_into(&mut builder, Kind::Model)?;
        }
        builder.finish()
    }

    fn lower_into(&self, builder: &mut AstBuilder, parent: Kind) -> Result<()> {
        let range = self.range();
        let name = |text: &String| Name::with_range(text.clone(), range);

        let (kind, groups): (NodeKind, Vec<Group<'_>>) = match &self.data {
            RawData::Model { .. } => {
                return Err(Error::UnexpectedChild {
                    parent,
                    child: Kind::Model,
                });
            }
            RawData::Language {
                name: n,
                metadata,
                tokens,
                principles,
            } => (
                NodeKind::Language(Language {
                    name: name(n),
                    metadata: Vec::new(),
                    tokens: Vec::new(),
                    principles: Vec::new(),
                }),
                vec![
                    (metadata.as_slice(), Some(Kind::Metadata)),
                    (tokens.as_slice(), Some(Kind::Token)),
                    (principles.as_slice(), Some(Kind::Principle)),
                ],
            ),
            RawData::Namespace { name: n, elements } => (
                NodeKind::Namespace(Namespace {
                    name: name(n),
                    elements: Vec::new(),
                }),
                vec![(elements.as_slice(), None)],
            ),
            RawData::Token {
                name: n,
                metadata,
                terms,
            } => (
                NodeKind::Token(Token {
                    name: name(n),
                    metadata: Vec::new(),
                    terms: Vec::new(),
                }),
                vec![
                    (metadata.as_slice(), Some(Kind::Metadata)),
                    (terms.as_slice(), Some(Kind::Term)),
                ],
            ),
            RawData::Term { name: n, type_ref } => (
                NodeKind::Term(Term {
                    name: name(n),
                    type_ref: type_ref.as_ref().map(|r| r.lower(range)),
                }),
                Vec::new(),
            ),
            RawData::Principle {
                name: n,
                metadata,
                requires,
                terms,
                relations,
                applies,
            } => (
                NodeKind::Principle(Principle {
                    name: name(n),
                    metadata: Vec::new(),
                    requires: Vec::new(),
                    terms: Vec::new(),
                    relations: Vec::new(),
                    applies: Vec::new(),
                }),
                vec![
                    (metadata.as_slice(), Some(Kind::Metadata)),
                    (requires.as_slice(), Some(Kind::Require)),
                    (terms.as_slice(), Some(Kind::Term)),
                    (relations.as_slice(), Some(Kind::Relation)),
                    (applies.as_slice(), Some(Kind::Apply)),
                ],
            ),
            RawData::Relation {
                name: n,
                metadata,
                subject,
                object,
            } => (
                NodeKind::Relation(Relation {
                    name: name(n),
                    metadata: Vec::new(),
                    subject: subject.iter().map(|r| r.lower(range)).collect(),
                    object: object.iter().map(|r| r.lower(range)).collect(),
                }),
                vec![(metadata.as_slice(), Some(Kind::Metadata))],
            ),
            RawData::Apply {
                principle,
                bindings,
            } => (
                NodeKind::Apply(Apply {
                    principle: principle.lower(range),
                    bindings: Vec::new(),
                }),
                vec![(bindings.as_slice(), Some(Kind::Binding))],
            ),
            RawData::Require { principle } => (
                NodeKind::Require(Require {
                    principle: principle.lower(range),
                }),
                Vec::new(),
            ),
            RawData::Specification {
                name: n,
                metadata,
                uses,
                instances,
            } => (
                NodeKind::Specification(Specification {
                    name: name(n),
                    metadata: Vec::new(),
                    uses: Vec::new(),
                    instances: Vec::new(),
                }),
                vec![
                    (metadata.as_slice(), Some(Kind::Metadata)),
                    (uses.as_slice(), Some(Kind::Use)),
                    (instances.as_slice(), Some(Kind::Instance)),
                ],
            ),
            RawData::Instance {
                name: n,
                metadata,
                of,
                bindings,
                applies,
            } => (
                NodeKind::Instance(Instance {
                    name: name(n),
                    metadata: Vec::new(),
                    of: of.as_ref().map(|r| r.lower(range)),
                    bindings: Vec::new(),
                    applies: Vec::new(),
                }),
                vec![
                    (metadata.as_slice(), Some(Kind::Metadata)),
                    (bindings.as_slice(), Some(Kind::Binding)),
                    (applies.as_slice(), Some(Kind::Apply)),
                ],
            ),
            RawData::Binding { target, values } => (
                NodeKind::Binding(Binding {
                    target: target.lower(range),
                    values: values
                        .iter()
                        .map(|v| match v {
                            RawValue::Ref(r) => BindingValue::Ref(r.lower(range)),
                            RawValue::Literal { tag, value } => BindingValue::Literal {
                                tag: tag.clone(),
                                text: value.clone(),
                            },
                        })
                        .collect(),
                }),
                Vec::new(),
            ),
            RawData::Metadata { key, value } => (
                NodeKind::Metadata(Metadata {
                    key: key.clone(),
                    value: value.clone(),
                }),
                Vec::new(),
            ),
            RawData::Use { language } => (
                NodeKind::Use(Use {
                    language: language.lower(range),
                }),
                Vec::new(),
            ),
        };

        let this = kind.kind();
        builder.start_node(kind, range);
        for (children, expected) in groups {
            for child in children {
                let child_kind = child.data.kind();
                if expected.is_some_and(|k| k != child_kind) {
                    return Err(Error::UnexpectedChild {
                        parent: this,
                        child: child_kind,
                    });
                }
                child.lower_into(builder, this)?;
            }
        }
        builder.finish_node();
        Ok(())
    }
}

impl Ast {
    /// Build an arena from the parser's JSON tree.
    pub fn from_json(json: &str) -> Result<Ast> {
        let raw: RawNode = serde_json::from_str(json).map_err(|e| Error::Json(e.to_string()))?;
        raw.lower()
    }
}
