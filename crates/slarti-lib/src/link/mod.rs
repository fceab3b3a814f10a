//! Link pass: bind every reference in a document to a description.
//!
//! A reference carried by node `N` is looked up in the scope table of `N`
//! (when `N` is a container) or of its container, then in each enclosing
//! container's table outward to the root; the first entry with the exact
//! reference text wins. Dotted text only matches dotted entries. When
//! nothing local matches, the exports of other documents are consulted.


use indexmap::IndexMap;
use rowan::TextRange;
use slarti_core::{Ast, Kind, NodeId, RefSlot, Reference};

use crate::config::ScopeConfig;
use crate::descriptions::{Description, Origin};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::scope::ScopeTable;
use crate::utils::{find_similar, max_suggestion_distance};

/// A reference position: the node carrying it, the property, and the index
/// within that property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RefKey {
    pub node: NodeId,
    pub slot: RefSlot,
    pub index: usize,
}

impl RefKey {
    pub fn new(node: NodeId, slot: RefSlot, index: usize) -> Self {
        Self { node, slot, index }
    }
}

/// Resolved references in visitation order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinkOutput {
    pub resolved: IndexMap<RefKey, Description>,
}

impl LinkOutput {
    pub fn get(&self, node: NodeId, slot: RefSlot, index: usize) -> Option<&Description> {
        self.resolved.get(&RefKey::new(node, slot, index))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RefKey, &Description)> {
        self.resolved.iter()
    }

    pub fn len(&self) -> usize {
        self.resolved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }
}

/// Resolve every reference in `ast` against its scope table and, as a
/// fallback, `global` (the exports of other documents).
pub fn link(
    ast: &Ast,
    scopes: &ScopeTable,
    global: &[Description],
    config: &ScopeConfig,
    output: &mut LinkOutput,
    diagnostics: &mut Diagnostics,
) {
    let global: &[Description] = if config.global_fallback { global } else { &[] };
    let mut linker = Linker {
        ast,
        scopes,
        global,
        output,
        diagnostics,
    };
    linker.check_duplicates();
    linker.link_references();
}

/// Look up `name` in the tables visible from `node`, innermost first.
pub fn resolve<'a>(
    ast: &Ast,
    scopes: &'a ScopeTable,
    node: NodeId,
    name: &str,
) -> Option<&'a Description> {
    scope_chain(ast, node)
        .flat_map(|c| scopes.get(c))
        .find(|d| d.name == name)
}

/// Containers whose tables are visible from `node`, innermost first.
fn scope_chain(ast: &Ast, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
    let start = if ast.kind(node).is_container() {
        Some(node)
    } else {
        ast.parent(node)
    };
    std::iter::successors(start, |&c| ast.parent(c))
}

struct Linker<'a> {
    ast: &'a Ast,
    scopes: &'a ScopeTable,
    global: &'a [Description],
    output: &'a mut LinkOutput,
    diagnostics: &'a mut Diagnostics,
}

impl<'a> Linker<'a> {
    fn check_duplicates(&mut self) {
        let scopes = self.scopes;
        for (_, entries) in scopes.iter() {
            let declared: Vec<_> = entries
                .iter()
                .filter(|d| d.origin == Origin::Declared)
                .collect();
            for (i, d) in declared.iter().enumerate() {
                let Some(first) = declared[..i].iter().find(|f| f.name == d.name) else {
                    continue;
                };
                let range = self.name_range(d.node);
                let first_range = self.name_range(first.node);
                self.diagnostics
                    .report(DiagnosticKind::DuplicateDefinition, range)
                    .message(d.name.as_str())
                    .at(d.node, None)
                    .related_to("first defined here", first_range)
                    .emit();
            }
        }
    }

    fn link_references(&mut self) {
        let ast = self.ast;
        for (node, _) in ast.iter() {
            for (slot, index, reference) in ast.references(node) {
                self.link_reference(node, slot, index, reference);
            }
        }
    }

    fn link_reference(
        &mut self,
        node: NodeId,
        slot: RefSlot,
        index: usize,
        reference: &Reference,
    ) {
        let ast = self.ast;
        let text = reference.text.as_str();

        let found = match resolve(ast, self.scopes, node, text) {
            Some(local) => {
                let wants_principle = slot == RefSlot::Principle
                    && matches!(ast.kind(node), Kind::Apply | Kind::Require);
                if wants_principle && ast.kind(local.node) != Kind::Principle {
                    let range = self.reference_range(node, reference);
                    self.diagnostics
                        .report(DiagnosticKind::NotAPrinciple, range)
                        .message(text)
                        .at(node, Some(slot))
                        .emit();
                }
                local
            }
            // Global entries point into other documents' trees, so their kind
            // is not checked here.
            None => match self.global.iter().find(|d| d.name == text) {
                Some(global) => global,
                None => {
                    self.report_unresolved(node, slot, reference);
                    return;
                }
            },
        };

        self.output
            .resolved
            .insert(RefKey::new(node, slot, index), found.clone());
    }

    fn lookup(&self, node: NodeId, name: &str) -> Option<&'a Description> {
        resolve(self.ast, self.scopes, node, name)
            .or_else(|| self.global.iter().find(|d| d.name == name))
    }

    fn report_unresolved(&mut self, node: NodeId, slot: RefSlot, reference: &Reference) {
        let (scopes, global) = (self.scopes, self.global);
        let range = self.reference_range(node, reference);
        let text = reference.text.as_str();
        let visible: Vec<&str> = scope_chain(self.ast, node)
            .flat_map(|c| scopes.get(c))
            .chain(global)
            .map(|d| d.name.as_str())
            .collect();

        if let Some((prefix, member)) = self.resolved_prefix(node, text) {
            let member_prefix = format!("{prefix}.");
            let members = visible
                .iter()
                .copied()
                .filter(|n| n.starts_with(&member_prefix));
            let suggestion = find_similar(text, members, max_suggestion_distance(member));

            let mut builder = self
                .diagnostics
                .report(DiagnosticKind::UnknownMember, range)
                .message(format!("`{prefix}` has no member `{member}`"))
                .at(node, Some(slot));
            if let Some(similar) = suggestion {
                builder = builder.hint(format!("did you mean `{}`?", similar));
            }
            builder.emit();
            return;
        }

        let max_dist = max_suggestion_distance(text);
        let suggestion = find_similar(text, visible.iter().copied(), max_dist);
        let mut builder = self
            .diagnostics
            .report(DiagnosticKind::UndefinedReference, range)
            .message(text)
            .at(node, Some(slot));
        if let Some(similar) = suggestion {
            builder = builder.hint(format!("did you mean `{}`?", similar));
        }
        builder.emit();
    }

    /// Longest dotted prefix of `text` that resolves, and the rest.
    fn resolved_prefix<'t>(&self, node: NodeId, text: &'t str) -> Option<(&'t str, &'t str)> {
        let mut end = text.len();
        while let Some(dot) = text[..end].rfind('.') {
            let prefix = &text[..dot];
            if self.lookup(node, prefix).is_some() {
                return Some((prefix, &text[dot + 1..]));
            }
            end = dot;
        }
        None
    }

    fn reference_range(&self, node: NodeId, reference: &Reference) -> TextRange {
        if reference.range.is_empty() {
            return self.ast[node].range;
        }
        reference.range
    }

    fn name_range(&self, node: NodeId) -> TextRange {
        let node = &self.ast[node];
        node.kind.name().map_or(node.range, |n| n.range)
    }
}
