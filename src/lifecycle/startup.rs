//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the rule source and run the initial load
//! - Start the metrics exporter before anything is published
//! - Start the rule reloader
//! - Bind the listener and serve until a termination signal
//!
//! # Design Decisions
//! - Fail fast: a failed initial load is fatal, nothing is served
//! - Listeners start last (traffic only once rules are published)

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

use crate::config::RedirectorConfig;
use crate::error::SourceError;
use crate::http::HttpServer;
use crate::lifecycle::reload::Reloader;
use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::signals::wait_for_termination;
use crate::observability::metrics;
use crate::routing::ruleset::RuleSetSummary;
use crate::routing::store::RuleStore;
use crate::source::RuleSource;

/// Errors that abort startup or end the serving loop.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("invalid rule source: {0}")]
    Source(#[source] SourceError),

    #[error("initial rule load failed: {0}")]
    InitialLoad(#[source] SourceError),

    #[error("invalid address {address}: {source}")]
    Address {
        address: String,
        source: std::net::AddrParseError,
    },

    #[error("could not bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Load the first rule set. Any failure here is fatal.
pub async fn initial_load(reloader: &Reloader) -> Result<RuleSetSummary, StartupError> {
    reloader.reload().await.map_err(StartupError::InitialLoad)
}

/// A service whose first rule set is loaded and published.
pub struct Service {
    config: RedirectorConfig,
    store: Arc<RuleStore>,
    reloader: Reloader,
}

impl Service {
    /// Build the rule source, start the metrics exporter and run the
    /// initial load.
    ///
    /// The exporter goes first so the initial publish is recorded.
    pub async fn prepare(config: RedirectorConfig) -> Result<Self, StartupError> {
        if config.observability.metrics_enabled {
            let address = &config.observability.metrics_address;
            let addr: SocketAddr = address.parse().map_err(|source| StartupError::Address {
                address: address.clone(),
                source,
            })?;
            metrics::init_metrics(addr);
        }

        let source =
            RuleSource::from_config(&config.source, &config.s3).map_err(StartupError::Source)?;
        tracing::info!(source = %source.location(), extension = %config.source.extension, "Rule source configured");

        let store = Arc::new(RuleStore::new());
        let reloader = Reloader::new(source, store.clone());
        initial_load(&reloader).await?;

        Ok(Self {
            config,
            store,
            reloader,
        })
    }

    /// The store the service answers from.
    pub fn store(&self) -> Arc<RuleStore> {
        self.store.clone()
    }

    /// Start the reloader and serve on `listener` until `shutdown` fires.
    pub async fn serve(self, listener: TcpListener, shutdown: Shutdown) -> Result<(), StartupError> {
        let Self {
            config,
            store,
            reloader,
        } = self;

        let reload_task = match config.source.reload_interval_secs {
            0 => {
                tracing::info!("Rule reloading disabled");
                None
            }
            secs => Some(tokio::spawn(
                reloader.run(Duration::from_secs(secs), shutdown.subscribe()),
            )),
        };

        let server = HttpServer::new(&config, store);
        let served = server.run(listener, shutdown.subscribe()).await;

        // Stop the reloader even when the server exits on its own.
        shutdown.trigger();
        if let Some(task) = reload_task {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "Rule reloader task ended abnormally");
            }
        }

        served.map_err(StartupError::Serve)
    }
}

/// Run the service until SIGINT or SIGTERM.
pub async fn run(config: RedirectorConfig) -> Result<(), StartupError> {
    let address = config.listener.bind_address.clone();
    let service = Service::prepare(config).await?;

    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind { address, source })?;

    let shutdown = Shutdown::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        wait_for_termination().await;
        trigger.trigger();
    });

    service.serve(listener, shutdown).await?;
    tracing::info!("Shutdown complete");
    Ok(())
}
