use indexmap::IndexMap;
use slarti_core::NodeId;

use crate::descriptions::Description;

/// Descriptions visible directly inside each container, keyed in the order
/// containers were finished (post-order).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScopeTable {
    scopes: IndexMap<NodeId, Vec<Description>>,
}

impl ScopeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_all(&mut self, container: NodeId, descriptions: &[Description]) {
        self.scopes
            .entry(container)
            .or_default()
            .extend_from_slice(descriptions);
    }

    /// Entries of `container`, empty when it has none.
    pub fn get(&self, container: NodeId) -> &[Description] {
        self.scopes
            .get(&container)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn contains(&self, container: NodeId) -> bool {
        self.scopes.contains_key(&container)
    }

    /// First entry of `container` named exactly `name`.
    pub fn lookup(&self, container: NodeId, name: &str) -> Option<&Description> {
        self.get(container).iter().find(|d| d.name == name)
    }

    pub fn containers(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.scopes.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &[Description])> {
        self.scopes.iter().map(|(&id, d)| (id, d.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}
