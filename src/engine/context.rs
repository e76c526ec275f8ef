//! Cycle detection for named references.
//!
//! Recursive grammars are expressed through the registry: a rule refers to a
//! name, and the name resolves back to a rule that may (directly or through
//! other names) refer to the same name again. That is fine as long as each
//! round trip consumes input. When it does not, the same `(rule, input)` pair
//! would be matched forever; the context remembers every pair on the current
//! descent path and cuts the branch the second time one shows up.
//!
//! Contexts grow down a single derivation path only. Sibling branches of an
//! alternative each extend the *parent* context, so a reference visited in one
//! branch never poisons another.

use crate::Rule;
use std::collections::HashSet;

/// The set of `(referenced rule, remaining input)` pairs already entered on
/// the current derivation path.
#[derive(Debug, Clone, Default)]
pub(crate) struct Context {
    visited: HashSet<(Rule, String)>,
}

impl Context {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// True if this exact rule has already been entered with this exact
    /// remaining input somewhere up the current path.
    pub(crate) fn has_visited(&self, rule: Rule, input: &str) -> bool {
        self.visited.contains(&(rule, input.to_string()))
    }

    /// A copy of this context with one more visited pair, for descending into
    /// a reference. The parent context is untouched, so siblings explored
    /// afterwards do not see the detour.
    pub(crate) fn child(&self, rule: Rule, input: &str) -> Self {
        let mut next = self.clone();
        next.visited.insert((rule, input.to_string()));
        next
    }
}
