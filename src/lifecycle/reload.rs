//! Periodic rule reloading.
//!
//! # Responsibilities
//! - Fetch, compile and publish a fresh rule set
//! - Repeat on a fixed interval until shutdown
//!
//! # Design Decisions
//! - The new set is built completely before the atomic publish
//! - A failed tick keeps the previous set and waits for the next one
//! - The first tick fires one interval after startup; the initial load is
//!   done by startup

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::error::SourceError;
use crate::observability::metrics;
use crate::routing::ruleset::RuleSetSummary;
use crate::routing::store::RuleStore;
use crate::source::RuleSource;

/// Fetches rules from a source and publishes them into a store.
pub struct Reloader {
    source: RuleSource,
    store: Arc<RuleStore>,
}

impl Reloader {
    pub fn new(source: RuleSource, store: Arc<RuleStore>) -> Self {
        Self { source, store }
    }

    /// Run one full load cycle and publish the result.
    pub async fn reload(&self) -> Result<RuleSetSummary, SourceError> {
        let batch = match self.source.fetch_all().await {
            Ok(batch) => batch,
            Err(e) => {
                metrics::record_reload(false);
                return Err(e);
            }
        };

        let summary = self.store.publish(batch.build());
        metrics::record_reload(true);
        tracing::info!(
            rules = summary.redirects,
            domains = summary.domains,
            "Successfully loaded redirect rules"
        );
        Ok(summary)
    }

    /// Reload every `interval` until `shutdown` fires.
    pub async fn run(self, interval: Duration, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(interval_secs = interval.as_secs(), source = %self.source.location(), "Rule reloader starting");

        let mut ticker = time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    tracing::info!("Polling for rule updates");
                    if let Err(e) = self.reload().await {
                        tracing::error!(error = %e, "Failed to reload rules, keeping current rule set");
                    }
                }
                _ = shutdown.recv() => {
                    tracing::info!("Rule reloader received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }
}
