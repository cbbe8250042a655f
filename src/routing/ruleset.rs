//! Immutable per-host rule snapshots.
//!
//! # Responsibilities
//! - Aggregate compiled rules by host (`RuleBatch`)
//! - Sort each host's rules by descending weight and freeze them (`RuleSet`)
//!
//! # Design Decisions
//! - Built from scratch on every load, never mutated afterwards
//! - Stable sort: equal weights keep the order they were added in
//! - Per-host lists are `Arc<[Rule]>` so lookups hand out cheap clones

use std::collections::HashMap;
use std::sync::Arc;

use crate::routing::rule::Rule;

/// Rules gathered from one or more files, not yet ordered.
#[derive(Debug, Default)]
pub struct RuleBatch {
    by_host: HashMap<String, Vec<Rule>>,
    total: usize,
}

impl RuleBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one rule to its host's list.
    pub fn push(&mut self, rule: Rule) {
        self.by_host.entry(rule.source_host.clone()).or_default().push(rule);
        self.total += 1;
    }

    /// Append every rule of `other`, after the rules already held.
    pub fn merge(&mut self, other: RuleBatch) {
        for (host, rules) in other.by_host {
            self.by_host.entry(host).or_default().extend(rules);
        }
        self.total += other.total;
    }

    /// Number of compiled rules across all hosts.
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Sort every host by weight and freeze the result.
    pub fn build(self) -> RuleSet {
        let hosts = self
            .by_host
            .into_iter()
            .map(|(host, mut rules)| {
                rules.sort_by(|a, b| b.weight.cmp(&a.weight));
                (host, Arc::<[Rule]>::from(rules))
            })
            .collect();

        RuleSet {
            hosts,
            total: self.total,
        }
    }
}

impl Extend<Rule> for RuleBatch {
    fn extend<I: IntoIterator<Item = Rule>>(&mut self, iter: I) {
        for rule in iter {
            self.push(rule);
        }
    }
}

impl FromIterator<Rule> for RuleBatch {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        let mut batch = RuleBatch::new();
        batch.extend(iter);
        batch
    }
}

/// Counts reported by health checks and load logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RuleSetSummary {
    pub domains: usize,
    pub redirects: usize,
}

/// Published snapshot: host → rules in descending weight order.
#[derive(Debug, Default)]
pub struct RuleSet {
    hosts: HashMap<String, Arc<[Rule]>>,
    total: usize,
}

impl RuleSet {
    /// A rule set with no hosts.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Rules for `host`, highest weight first.
    pub fn rules_for(&self, host: &str) -> Option<&Arc<[Rule]>> {
        self.hosts.get(host)
    }

    pub fn summary(&self) -> RuleSetSummary {
        RuleSetSummary {
            domains: self.hosts.len(),
            redirects: self.total,
        }
    }
}
