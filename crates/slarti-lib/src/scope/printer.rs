//! Text dump of a scope table, one block per container in tree order.
//!
//! ```text
//! Language L
//!   T -> Token T
//!   P1.test -> Relation test [qualified]
//! ```

use std::fmt::Write;

use slarti_core::{Ast, NodeId, NodeKind};

use super::ScopeTable;
use crate::descriptions::Origin;

pub struct ScopePrinter<'a> {
    ast: &'a Ast,
    table: &'a ScopeTable,
    empty: bool,
    ids: bool,
}

impl<'a> ScopePrinter<'a> {
    pub fn new(ast: &'a Ast, table: &'a ScopeTable) -> Self {
        Self {
            ast,
            table,
            empty: false,
            ids: false,
        }
    }

    /// Also list containers whose table is empty.
    pub fn with_empty(mut self, value: bool) -> Self {
        self.empty = value;
        self
    }

    /// Append node ids to headers and targets.
    pub fn with_ids(mut self, value: bool) -> Self {
        self.ids = value;
        self
    }

    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        for (id, _) in self.ast.iter() {
            if !self.table.contains(id) {
                continue;
            }
            let entries = self.table.get(id);
            if entries.is_empty() && !self.empty {
                continue;
            }

            self.format_header(id, w)?;
            for d in entries {
                write!(w, "  {} -> ", d.name)?;
                self.format_node(d.node, w)?;
                if d.origin != Origin::Declared {
                    write!(w, " [{}]", d.origin.as_str())?;
                }
                writeln!(w)?;
            }
        }
        Ok(())
    }

    fn format_header(&self, id: NodeId, w: &mut impl Write) -> std::fmt::Result {
        let NodeKind::Apply(apply) = &self.ast[id].kind else {
            self.format_node(id, w)?;
            return writeln!(w);
        };
        write!(w, "Apply {}", apply.principle.text)?;
        if self.ids {
            write!(w, " {id}")?;
        }
        writeln!(w)
    }

    fn format_node(&self, id: NodeId, w: &mut impl Write) -> std::fmt::Result {
        write!(w, "{}", self.ast.kind(id))?;
        if let Some(name) = self.ast.name(id) {
            write!(w, " {name}")?;
        }
        if self.ids {
            write!(w, " {id}")?;
        }
        Ok(())
    }
}
