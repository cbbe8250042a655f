//! Redirect resolution for incoming requests.
//!
//! # Responsibilities
//! - Look up a host's rules in the live snapshot
//! - Evaluate them in weight order, first target wins
//! - Return the redirect or an explicit not-found reason
//!
//! # Design Decisions
//! - Pure read: no rule state changes while matching
//! - O(1) host lookup, O(n) scan of that host's rules
//! - Every hit emits one `redirect_hit` event

use std::fmt;
use std::sync::Arc;

use crate::observability::logging::RedirectHit;
use crate::routing::matcher::normalize_path;
use crate::routing::rule::Rule;
use crate::routing::store::RuleStore;

/// The parts of a request that redirect matching looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectRequest {
    /// Domain without any `:port` suffix.
    pub host: String,
    /// Raw request path, starting with `/`.
    pub path: String,
}

impl RedirectRequest {
    /// Build a request from a `Host` header value, dropping the port.
    pub fn new(authority: &str, path: impl Into<String>) -> Self {
        Self {
            host: strip_port(authority).to_string(),
            path: path.into(),
        }
    }
}

/// Remove a trailing `:port`, leaving bracketed IPv6 literals intact.
pub fn strip_port(authority: &str) -> &str {
    match authority.rfind(':') {
        Some(i) if !authority[i..].contains(']') => &authority[..i],
        _ => authority,
    }
}

/// A matched redirect.
#[derive(Debug, Clone)]
pub struct Redirect {
    pub target: String,
    pub status_code: u16,
    pub rule: Rule,
}

/// Why no redirect was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFound {
    /// No rules were loaded for the host.
    UnknownHost,
    /// The host has rules but none produced a target.
    NoRuleMatched,
}

impl fmt::Display for NotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotFound::UnknownHost => write!(f, "unknown host"),
            NotFound::NoRuleMatched => write!(f, "no matching rule"),
        }
    }
}

/// Outcome of resolving one request.
#[derive(Debug, Clone)]
pub enum Resolution {
    Redirect(Redirect),
    NotFound(NotFound),
}

/// Resolves requests against the rules held in a `RuleStore`.
#[derive(Debug, Clone)]
pub struct Redirector {
    store: Arc<RuleStore>,
}

impl Redirector {
    pub fn new(store: Arc<RuleStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<RuleStore> {
        &self.store
    }

    /// Find the redirect for `request`.
    pub fn resolve(&self, request: &RedirectRequest) -> Resolution {
        let Some(rules) = self.store.lookup(&request.host) else {
            return Resolution::NotFound(NotFound::UnknownHost);
        };

        match evaluate(&rules, &request.path) {
            Some(redirect) => {
                RedirectHit::new(&request.host, &request.path, &redirect).emit();
                Resolution::Redirect(redirect)
            }
            None => Resolution::NotFound(NotFound::NoRuleMatched),
        }
    }
}

/// Evaluate `rules` in order against `path`; the first non-empty target wins.
pub fn evaluate(rules: &[Rule], path: &str) -> Option<Redirect> {
    let normalized = normalize_path(path);

    rules.iter().find_map(|rule| {
        rule.path_match
            .rewrite(path, normalized, &rule.target_template)
            .filter(|target| !target.is_empty())
            .map(|target| Redirect {
                target,
                status_code: rule.status_code,
                rule: rule.clone(),
            })
    })
}
