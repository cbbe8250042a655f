//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber
//! - Emit the per-hit `redirect_hit` record
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - JSON format for production, pretty format for development
//! - `RUST_LOG` overrides the configured level
//! - The formatter owns the `timestamp` key (RFC 3339, UTC); events never
//!   carry a field of that name

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tracing::Subscriber;
use tracing_subscriber::fmt::{self, time::ChronoUtc, MakeWriter};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

use crate::config::{LogFormat, ObservabilityConfig};
use crate::routing::router::Redirect;

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(config: &ObservabilityConfig) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("redirector={},tower_http=info", config.log_level)));

    let fmt_layer: Box<dyn Layer<Registry> + Send + Sync> = match config.log_format {
        LogFormat::Json => json_layer(std::io::stdout).boxed(),
        LogFormat::Pretty => fmt::layer().with_timer(ChronoUtc::rfc_3339()).boxed(),
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(filter)
        .try_init()
}

/// One JSON object per line, event fields flattened to the top level.
fn json_layer<S, W>(writer: W) -> impl Layer<S> + Send + Sync + 'static
where
    S: Subscriber + for<'a> LookupSpan<'a> + 'static,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    fmt::layer()
        .json()
        .flatten_event(true)
        .with_timer(ChronoUtc::rfc_3339())
        .with_writer(writer)
}

/// Record kind carried in every hit log line.
pub const REDIRECT_HIT: &str = "redirect_hit";

/// One successful redirect, as logged.
///
/// `timestamp` is part of the serialized record; in log output the
/// formatter supplies it.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RedirectHit {
    pub timestamp: String,
    pub host: String,
    pub path: String,
    pub target_url: String,
    pub rule: String,
    pub weight: i64,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl RedirectHit {
    pub fn new(host: &str, path: &str, redirect: &Redirect) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            host: host.to_string(),
            path: path.to_string(),
            target_url: redirect.target.clone(),
            rule: redirect.rule.match_value().to_string(),
            weight: redirect.rule.weight,
            kind: REDIRECT_HIT,
        }
    }

    /// Log this hit as one structured event.
    pub fn emit(&self) {
        tracing::info!(
            r#type = self.kind,
            host = %self.host,
            path = %self.path,
            target_url = %self.target_url,
            rule = %self.rule,
            weight = self.weight,
            "redirect"
        );
    }
}
