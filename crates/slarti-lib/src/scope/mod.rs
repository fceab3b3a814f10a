//! Scope computation.
//!
//! A post-order walk over containers that records, for every container, the
//! descriptions visible directly inside it:
//!
//! 1. relations spliced in from the principle an `apply` names,
//! 2. a bare-name description for each named child,
//! 3. the lifted (qualified) descriptions of each nested container,
//! 4. `require` aliases for each nested principle.
//!
//! Lifting is not total: relations spliced into an `apply` stay in that
//! apply's table and are deliberately not re-qualified into the enclosing
//! principle, so `P2.test` never names a relation `P2` only applies.
//!
//! Lookups during the walk go through a [`Frame`] that lists the outer scopes
//! followed by what the current container has accumulated so far; the first
//! match wins. Missing names are never errors here: a `require` or `apply`
//! whose principle cannot be found is skipped, and the linker reports it.

mod frame;
mod printer;
mod rules;
mod table;


use slarti_core::{Ast, Kind, NodeId, NodeKind};

pub use frame::Frame;
pub use printer::ScopePrinter;
pub use rules::{container_elements, named_elements};
pub use table::ScopeTable;

use crate::config::ScopeConfig;
use crate::descriptions::{Description, Descriptions, Origin, qualify};
use crate::{Error, Result};

/// Compute the scope table of every container in `ast`.
///
/// Fails only when containers nest deeper than the configured recursion
/// limit.
pub fn compute_local_scopes(
    ast: &Ast,
    descriptions: Descriptions,
    config: &ScopeConfig,
) -> Result<ScopeTable> {
    let mut walk = ScopeWalk::new(ast, descriptions, config);
    walk.process_container(ast.root(), &Frame::default())?;
    tracing::debug!(
        document = %descriptions.document(),
        containers = walk.table.len(),
        "computed local scopes"
    );
    Ok(walk.table)
}

struct ScopeWalk<'a> {
    ast: &'a Ast,
    descriptions: Descriptions,
    config: &'a ScopeConfig,
    table: ScopeTable,
    depth: u32,
    /// Principles whose relations are being spliced, innermost last.
    splicing: Vec<NodeId>,
    /// Non-zero while computing a splice; nothing is recorded then.
    scratch: u32,
}

impl<'a> ScopeWalk<'a> {
    fn new(ast: &'a Ast, descriptions: Descriptions, config: &'a ScopeConfig) -> Self {
        Self {
            ast,
            descriptions,
            config,
            table: ScopeTable::new(),
            depth: 0,
            splicing: Vec::new(),
            scratch: 0,
        }
    }

    fn process_container(
        &mut self,
        container: NodeId,
        frame: &Frame<'_>,
    ) -> Result<Vec<Description>> {
        let ast = self.ast;
        self.depth += 1;
        if self.depth > self.config.recursion_limit {
            return Err(Error::RecursionLimitExceeded);
        }

        let mut local = Vec::new();

        if let NodeKind::Apply(apply) = &ast[container].kind {
            self.splice_applied(&apply.principle.text, frame, &mut local)?;
        }

        for element in named_elements(ast, container) {
            local.extend(self.descriptions.local(ast, element));
        }

        for element in container_elements(ast, container) {
            let nested = self.process_container(element, &frame.push(&local))?;
            let prefix = ast.name(element).unwrap_or_default();
            local.extend(
                nested
                    .iter()
                    .filter(|d| d.origin != Origin::Applied)
                    .map(|d| d.qualified(prefix)),
            );

            if ast.kind(element) == Kind::Principle {
                self.synthesize_requires(element, frame, &mut local);
            }
        }

        if self.scratch == 0 {
            self.table.add_all(container, &local);
        }
        self.depth -= 1;
        Ok(local)
    }

    /// Relations of the principle an `apply` names, visible unqualified
    /// inside the apply.
    fn splice_applied(
        &mut self,
        name: &str,
        frame: &Frame<'_>,
        local: &mut Vec<Description>,
    ) -> Result<()> {
        let Some(target) = frame.lookup(name).map(|d| d.node) else {
            tracing::trace!(principle = name, "apply target not found");
            return Ok(());
        };
        if self.ast.kind(target) != Kind::Principle {
            tracing::trace!(
                principle = name,
                kind = %self.ast.kind(target),
                "apply target is not a principle"
            );
            return Ok(());
        }
        if self.splicing.contains(&target) {
            tracing::trace!(principle = name, "apply cycle, splice skipped");
            return Ok(());
        }

        self.splicing.push(target);
        self.scratch += 1;
        let spliced = self.process_container(target, &Frame::default());
        self.scratch -= 1;
        self.splicing.pop();

        for description in spliced? {
            if self.ast.kind(description.node) != Kind::Relation {
                continue;
            }
            tracing::trace!(principle = name, relation = %description.name, "spliced");
            local.push(description.with_origin(Origin::Applied));
        }
        Ok(())
    }

    /// `P.R` for each `require R` of principle `P`, plus member and chain
    /// aliases under `P.R.`.
    fn synthesize_requires(
        &self,
        principle: NodeId,
        frame: &Frame<'_>,
        local: &mut Vec<Description>,
    ) {
        let ast = self.ast;
        let NodeKind::Principle(data) = &ast[principle].kind else {
            return;
        };
        let root = data.name.text.as_str();

        for &require in &data.requires {
            let NodeKind::Require(req) = &ast[require].kind else {
                continue;
            };
            let required = req.principle.text.as_str();
            let visible = frame.push(local.as_slice());
            let Some(target) = visible.lookup(required).map(|d| d.node) else {
                tracing::trace!(principle = root, required, "required principle not found");
                continue;
            };
            if ast.kind(target) != Kind::Principle {
                tracing::trace!(principle = root, required, "required name is not a principle");
                continue;
            }

            let path = qualify(root, required);
            let mut aliases = vec![self.descriptions.alias(target, path.as_str())];
            aliases.extend(self.member_aliases(target, &path));

            // Requires of the required principle re-rooted under `P`, so
            // `P3.P2.P1` exists when P3 requires P2 and P2 requires P1.
            let chain_prefix = format!("{required}.");
            aliases.extend(
                visible
                    .iter()
                    .filter(|d| d.origin == Origin::RequireAlias)
                    .filter(|d| d.name.starts_with(&chain_prefix))
                    .map(|d| self.descriptions.alias(d.node, qualify(root, &d.name))),
            );

            for alias in aliases {
                let duplicate = local
                    .iter()
                    .any(|d| d.name == alias.name && d.node == alias.node);
                if duplicate {
                    continue;
                }
                tracing::trace!(alias = %alias.name, "require alias");
                local.push(alias);
            }
        }
    }

    fn member_aliases(&self, required: NodeId, path: &str) -> Vec<Description> {
        let policy = self.config.require_members;
        let NodeKind::Principle(data) = &self.ast[required].kind else {
            return Vec::new();
        };

        let mut members = Vec::new();
        if policy.includes_relations() {
            members.extend_from_slice(&data.relations);
        }
        if policy.includes_terms() {
            members.extend_from_slice(&data.terms);
        }

        members
            .into_iter()
            .filter_map(|m| {
                let name = self.ast.name(m)?;
                Some(self.descriptions.alias(m, qualify(path, name)))
            })
            .collect()
    }
}
