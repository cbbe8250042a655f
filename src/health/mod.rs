//! Health reporting subsystem.
//!
//! # Data Flow
//! ```text
//! GET <health path> (optionally only on the health host)
//!     → HealthEndpoint::serves (path and host check)
//!     → HealthReporter::report (RuleStore summary)
//!     → {"status":"ok","domains":N,"redirects":M}
//! ```
//!
//! # Design Decisions
//! - Pure read of the live rule set; nothing is validated or changed
//! - Disabled unless a path is configured
//! - Requests that are not health checks fall through to redirect matching

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::HealthConfig;
use crate::routing::store::RuleStore;

/// Body of a health check response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub domains: usize,
    pub redirects: usize,
}

/// Summarizes the live rule set.
#[derive(Debug, Clone)]
pub struct HealthReporter {
    store: Arc<RuleStore>,
}

impl HealthReporter {
    pub fn new(store: Arc<RuleStore>) -> Self {
        Self { store }
    }

    pub fn report(&self) -> HealthStatus {
        let summary = self.store.summary();
        HealthStatus {
            status: "ok".to_string(),
            domains: summary.domains,
            redirects: summary.redirects,
        }
    }
}

/// Where the health endpoint answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthEndpoint {
    path: String,
    host: Option<String>,
}

impl HealthEndpoint {
    /// `None` when no health path is configured.
    pub fn from_config(config: &HealthConfig) -> Option<Self> {
        let path = config.path.clone().filter(|p| !p.is_empty())?;
        Some(Self {
            path,
            host: config.host.clone().filter(|h| !h.is_empty()),
        })
    }

    /// True if a request for `host` (port already stripped) and `path` is a
    /// health check.
    pub fn serves(&self, host: &str, path: &str) -> bool {
        path == self.path && self.host.as_deref().map_or(true, |expected| expected == host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::rule::compile_record;
    use crate::routing::ruleset::RuleBatch;

    #[test]
    fn test_report_counts_domains_and_rules() {
        let set = [
            ["a.com", "exact", "/1", "https://x.test", "301", "1"],
            ["a.com", "exact", "/2", "https://x.test", "301", "1"],
            ["a.com", "regex", "^/3", "https://x.test", "301", "1"],
            ["b.com", "exact", "/1", "https://x.test", "301", "1"],
            ["b.com", "exact", "/2", "https://x.test", "301", "1"],
        ]
        .iter()
        .map(|r| compile_record(r).unwrap())
        .collect::<RuleBatch>()
        .build();

        let reporter = HealthReporter::new(Arc::new(RuleStore::with_rules(set)));
        assert_eq!(
            reporter.report(),
            HealthStatus { status: "ok".into(), domains: 2, redirects: 5 }
        );
    }

    #[test]
    fn test_report_serializes() {
        let reporter = HealthReporter::new(Arc::new(RuleStore::new()));
        let json = serde_json::to_string(&reporter.report()).unwrap();
        assert_eq!(json, r#"{"status":"ok","domains":0,"redirects":0}"#);
    }

    #[test]
    fn test_endpoint_disabled_without_path() {
        assert!(HealthEndpoint::from_config(&HealthConfig::default()).is_none());
        let empty = HealthConfig { path: Some(String::new()), host: None };
        assert!(HealthEndpoint::from_config(&empty).is_none());
    }

    #[test]
    fn test_endpoint_any_host() {
        let endpoint = HealthEndpoint::from_config(&HealthConfig {
            path: Some("/healthz".into()),
            host: None,
        })
        .unwrap();
        assert!(endpoint.serves("a.com", "/healthz"));
        assert!(endpoint.serves("b.com", "/healthz"));
        assert!(!endpoint.serves("a.com", "/healthz/"));
    }

    #[test]
    fn test_endpoint_restricted_host() {
        let endpoint = HealthEndpoint::from_config(&HealthConfig {
            path: Some("/healthz".into()),
            host: Some("status.internal".into()),
        })
        .unwrap();
        assert!(endpoint.serves("status.internal", "/healthz"));
        assert!(!endpoint.serves("a.com", "/healthz"));
    }
}
