//! Metrics collection and exposition.
//!
//! # Metrics
//! - `redirector_requests_total` (counter): requests by outcome
//! - `redirector_reloads_total` (counter): reload attempts by result
//! - `redirector_domains` (gauge): hosts in the live rule set
//! - `redirector_rules` (gauge): rules in the live rule set
//!
//! # Design Decisions
//! - Recording is a no-op until `init_metrics` installs the exporter
//! - Labels are fixed, low-cardinality strings

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::routing::ruleset::RuleSetSummary;

/// Install the Prometheus exporter, serving on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Outcome label for `redirector_requests_total`.
#[derive(Debug, Clone, Copy)]
pub enum RequestOutcome {
    Redirect,
    NotFound,
    Health,
    Error,
}

impl RequestOutcome {
    fn as_str(self) -> &'static str {
        match self {
            RequestOutcome::Redirect => "redirect",
            RequestOutcome::NotFound => "not_found",
            RequestOutcome::Health => "health",
            RequestOutcome::Error => "error",
        }
    }
}

pub fn record_request(outcome: RequestOutcome) {
    metrics::counter!("redirector_requests_total", "outcome" => outcome.as_str()).increment(1);
}

pub fn record_reload(success: bool) {
    let result = if success { "success" } else { "failure" };
    metrics::counter!("redirector_reloads_total", "result" => result).increment(1);
}

pub fn record_rule_counts(summary: RuleSetSummary) {
    metrics::gauge!("redirector_domains").set(summary.domains as f64);
    metrics::gauge!("redirector_rules").set(summary.redirects as f64);
}
