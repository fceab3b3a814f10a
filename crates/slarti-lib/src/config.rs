//! Configuration for scope computation and linking.

/// Default nesting depth before scope computation gives up.
pub const DEFAULT_RECURSION_LIMIT: u32 = 4096;

/// Which members of a required principle get `<principle>.<required>.<member>`
/// aliases next to the `<principle>.<required>` alias itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RequireMembers {
    /// Relations of the required principle.
    #[default]
    Relations,
    /// Relations and terms of the required principle.
    RelationsAndTerms,
    /// Only the principle alias; members are reached through it.
    None,
}

impl RequireMembers {
    pub(crate) fn includes_terms(self) -> bool {
        matches!(self, Self::RelationsAndTerms)
    }

    pub(crate) fn includes_relations(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Configuration for [`compute_local_scopes`](crate::scope::compute_local_scopes)
/// and [`link`](crate::link::link).
#[derive(Clone, Debug)]
pub struct ScopeConfig {
    /// Members aliased through a `require`
    pub(crate) require_members: RequireMembers,
    /// Maximum container nesting depth
    pub(crate) recursion_limit: u32,
    /// Whether unresolved references fall back to other documents' exports
    pub(crate) global_fallback: bool,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            require_members: RequireMembers::default(),
            recursion_limit: DEFAULT_RECURSION_LIMIT,
            global_fallback: true,
        }
    }
}

impl ScopeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set which members of a required principle are aliased.
    pub fn require_members(mut self, value: RequireMembers) -> Self {
        self.require_members = value;
        self
    }

    /// Set the maximum container nesting depth.
    pub fn recursion_limit(mut self, limit: u32) -> Self {
        self.recursion_limit = limit;
        self
    }

    /// Set whether the linker consults other documents' exports.
    pub fn global_fallback(mut self, value: bool) -> Self {
        self.global_fallback = value;
        self
    }
}
