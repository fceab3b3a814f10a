//! Document lifecycle.
//!
//! Every derived artifact (scope table, exports, links, diagnostics) is a
//! pure function of one document version plus the exports of the other
//! documents. Any change discards them wholesale; a build computed against
//! an older state is rejected on commit rather than patched.

use indexmap::IndexMap;
use slarti_core::Ast;

use crate::config::ScopeConfig;
use crate::descriptions::{Description, Descriptions, DocumentId};
use crate::diagnostics::Diagnostics;
use crate::exports::compute_exports;
use crate::link::{LinkOutput, link};
use crate::scope::{ScopeTable, compute_local_scopes};
use crate::{Error, Result};

/// A parsed document at a given version.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    id: DocumentId,
    ast: Ast,
    version: u32,
}

impl Document {
    pub fn new(id: DocumentId, ast: Ast) -> Self {
        Self {
            id,
            ast,
            version: 0,
        }
    }

    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn descriptions(&self) -> Descriptions {
        Descriptions::new(self.id)
    }
}

/// Everything computed for one document version.
#[derive(Clone, Debug)]
pub struct DocumentBuild {
    pub version: u32,
    /// Workspace revision the global index was taken at.
    pub revision: u64,
    pub scopes: ScopeTable,
    pub exports: Vec<Description>,
    pub links: LinkOutput,
    pub diagnostics: Diagnostics,
}

impl DocumentBuild {
    /// Compute scopes, exports and links for `document`, with `global` as
    /// the exports of every other document.
    pub fn compute(
        document: &Document,
        global: &[Description],
        config: &ScopeConfig,
    ) -> Result<Self> {
        let descriptions = document.descriptions();
        let scopes = compute_local_scopes(&document.ast, descriptions, config)?;
        let exports = compute_exports(&document.ast, descriptions);

        let mut links = LinkOutput::default();
        let mut diagnostics = Diagnostics::new();
        link(
            &document.ast,
            &scopes,
            global,
            config,
            &mut links,
            &mut diagnostics,
        );

        Ok(Self {
            version: document.version,
            revision: 0,
            scopes,
            exports,
            links,
            diagnostics,
        })
    }
}

#[derive(Debug)]
struct DocumentState {
    document: Document,
    build: Option<DocumentBuild>,
}

/// A set of open documents that link against each other's exports.
///
/// Workspaces share nothing; independent workspaces can be built on
/// independent threads.
#[derive(Debug, Default)]
pub struct Workspace {
    config: ScopeConfig,
    documents: IndexMap<DocumentId, DocumentState>,
    next_id: u32,
    /// Bumped on every open, update and close.
    revision: u64,
}

impl Workspace {
    pub fn new(config: ScopeConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &ScopeConfig {
        &self.config
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn open(&mut self, ast: Ast) -> DocumentId {
        let id = DocumentId::from_raw(self.next_id);
        self.next_id += 1;
        self.documents.insert(
            id,
            DocumentState {
                document: Document::new(id, ast),
                build: None,
            },
        );
        self.invalidate();
        tracing::debug!(document = %id, "opened");
        id
    }

    pub fn open_json(&mut self, json: &str) -> Result<DocumentId> {
        let ast = Ast::from_json(json)?;
        Ok(self.open(ast))
    }

    /// Replace a document's tree. Returns the new version.
    pub fn update(&mut self, id: DocumentId, ast: Ast) -> Result<u32> {
        let state = self
            .documents
            .get_mut(&id)
            .ok_or(Error::UnknownDocument(id))?;
        state.document.ast = ast;
        state.document.version += 1;
        let version = state.document.version;
        self.invalidate();
        tracing::debug!(document = %id, version, "updated");
        Ok(version)
    }

    pub fn update_json(&mut self, id: DocumentId, json: &str) -> Result<u32> {
        let ast = Ast::from_json(json)?;
        self.update(id, ast)
    }

    pub fn close(&mut self, id: DocumentId) -> Result<Document> {
        let state = self
            .documents
            .shift_remove(&id)
            .ok_or(Error::UnknownDocument(id))?;
        self.invalidate();
        tracing::debug!(document = %id, "closed");
        Ok(state.document)
    }

    pub fn document(&self, id: DocumentId) -> Option<&Document> {
        self.documents.get(&id).map(|s| &s.document)
    }

    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.documents.values().map(|s| &s.document)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Exports of every open document except `except`, in open order.
    pub fn global_index(&self, except: DocumentId) -> Vec<Description> {
        self.documents
            .values()
            .filter(|s| s.document.id != except)
            .flat_map(|s| compute_exports(&s.document.ast, s.document.descriptions()))
            .collect()
    }

    /// Compute a build for the current version of `id` without storing it.
    pub fn build(&self, id: DocumentId) -> Result<DocumentBuild> {
        let document = self.document(id).ok_or(Error::UnknownDocument(id))?;
        let global = self.global_index(id);
        let mut build = DocumentBuild::compute(document, &global, &self.config)?;
        build.revision = self.revision;
        Ok(build)
    }

    /// Store `build` if it was computed against the current state.
    ///
    /// Returns `false` and drops the build when the document or any other
    /// document changed since it was computed.
    pub fn commit(&mut self, id: DocumentId, build: DocumentBuild) -> Result<bool> {
        let revision = self.revision;
        let state = self
            .documents
            .get_mut(&id)
            .ok_or(Error::UnknownDocument(id))?;
        if build.version != state.document.version || build.revision != revision {
            tracing::debug!(
                document = %id,
                build_version = build.version,
                version = state.document.version,
                "discarding stale build"
            );
            return Ok(false);
        }
        state.build = Some(build);
        Ok(true)
    }

    /// Build and commit every document that has no current build.
    pub fn build_all(&mut self) -> Result<()> {
        let pending: Vec<DocumentId> = self
            .documents
            .values()
            .filter(|s| s.build.is_none())
            .map(|s| s.document.id)
            .collect();
        for id in pending {
            let build = self.build(id)?;
            self.commit(id, build)?;
        }
        Ok(())
    }

    /// The committed build of `id`, if it is current.
    pub fn current_build(&self, id: DocumentId) -> Option<&DocumentBuild> {
        self.documents.get(&id)?.build.as_ref()
    }

    fn invalidate(&mut self) {
        self.revision += 1;
        for state in self.documents.values_mut() {
            state.build = None;
        }
    }
}
