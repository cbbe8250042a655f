//! Published rule set storage using `ArcSwap`.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::observability::metrics;
use crate::routing::rule::Rule;
use crate::routing::ruleset::{RuleSet, RuleSetSummary};

/// Holds the single live `RuleSet`.
///
/// Reads are lock-free loads of the current snapshot; `publish` is one
/// atomic pointer store, so a reader sees either the old set or the new
/// one in full. The old set is dropped once its last reader lets go.
#[derive(Debug)]
pub struct RuleStore {
    current: ArcSwap<RuleSet>,
}

impl RuleStore {
    /// Creates a store holding an empty rule set.
    pub fn new() -> Self {
        Self::with_rules(RuleSet::empty())
    }

    pub fn with_rules(rules: RuleSet) -> Self {
        Self {
            current: ArcSwap::from_pointee(rules),
        }
    }

    /// Replaces the live rule set and returns its summary.
    pub fn publish(&self, rules: RuleSet) -> RuleSetSummary {
        let summary = rules.summary();
        self.current.store(Arc::new(rules));
        metrics::record_rule_counts(summary);
        summary
    }

    /// Rules for `host` in evaluation order, if any were loaded.
    pub fn lookup(&self, host: &str) -> Option<Arc<[Rule]>> {
        self.current.load().rules_for(host).cloned()
    }

    pub fn summary(&self) -> RuleSetSummary {
        self.current.load().summary()
    }
}

impl Default for RuleStore {
    fn default() -> Self {
        Self::new()
    }
}
