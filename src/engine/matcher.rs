//! First-match rule lookup
//!
//! Pure: no I/O, no state. The same command always yields the same rule.

use crate::rules::catalog::RuleCatalog;
use crate::rules::Rule;

/// Scans a compiled catalog for the first rule matching a command
#[derive(Debug, Clone, Copy)]
pub struct Matcher<'c> {
    catalog: &'c RuleCatalog,
}

impl<'c> Matcher<'c> {
    pub fn new(catalog: &'c RuleCatalog) -> Self {
        Self { catalog }
    }

    /// Return the earliest rule in catalog order whose pattern matches
    /// anywhere in `command`, or `None`
    pub fn evaluate(&self, command: &str) -> Option<&'static Rule> {
        // SetMatches iterates in ascending index order
        self.catalog
            .set()
            .matches(command)
            .iter()
            .next()
            .and_then(|idx| self.catalog.rules().get(idx))
    }

    /// Every matching rule, in catalog order
    pub fn evaluate_all(&self, command: &str) -> Vec<&'static Rule> {
        let rules = self.catalog.rules();
        self.catalog
            .set()
            .matches(command)
            .iter()
            .filter_map(|idx| rules.get(idx))
            .collect()
    }
}
