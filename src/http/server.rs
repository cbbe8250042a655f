//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the dispatch handler
//! - Wire up middleware (tracing, timeout, request ID)
//! - Answer health checks, then resolve redirects
//! - Bind server to listener

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Request, State},
    response::Response,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::RedirectorConfig;
use crate::health::{HealthEndpoint, HealthReporter};
use crate::http::request::{propagate_request_id_layer, redirect_request, set_request_id_layer};
use crate::http::response::{health_response, not_found_response, redirect_response};
use crate::observability::metrics::{self, RequestOutcome};
use crate::routing::router::{Redirector, Resolution};
use crate::routing::store::RuleStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub redirector: Redirector,
    pub health: Option<Arc<HealthEndpoint>>,
    pub reporter: HealthReporter,
}

/// HTTP front end for the redirect engine.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a server answering from the rules held in `store`.
    pub fn new(config: &RedirectorConfig, store: Arc<RuleStore>) -> Self {
        let state = AppState {
            redirector: Redirector::new(store.clone()),
            health: HealthEndpoint::from_config(&config.health).map(Arc::new),
            reporter: HealthReporter::new(store),
        };

        let router = Self::build_router(config, state);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &RedirectorConfig, state: AppState) -> Router {
        Router::new()
            .fallback(dispatch)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// The configured router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Single entry point for every method and path.
async fn dispatch(State(state): State<AppState>, request: Request) -> Response {
    let descriptor = redirect_request(&request);

    if let Some(health) = &state.health {
        if health.serves(&descriptor.host, &descriptor.path) {
            metrics::record_request(RequestOutcome::Health);
            return health_response(state.reporter.report());
        }
    }

    match state.redirector.resolve(&descriptor) {
        Resolution::Redirect(redirect) => {
            let response = redirect_response(&redirect);
            let outcome = if response.status().is_server_error() {
                RequestOutcome::Error
            } else {
                RequestOutcome::Redirect
            };
            metrics::record_request(outcome);
            response
        }
        Resolution::NotFound(reason) => {
            tracing::debug!(host = %descriptor.host, path = %descriptor.path, reason = %reason, "No match found");
            metrics::record_request(RequestOutcome::NotFound);
            not_found_response(reason)
        }
    }
}
