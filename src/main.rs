use std::process::ExitCode;

use clap::Parser;

use redirector::cli::Cli;
use redirector::lifecycle::startup;
use redirector::observability::logging::init_logging;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Cli::parse().into_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("redirector: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logging(&config.observability) {
        eprintln!("redirector: could not initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "redirector starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        source = %config.source.location,
        reload_interval_secs = config.source.reload_interval_secs,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    match startup::run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "redirector stopped with an error");
            ExitCode::FAILURE
        }
    }
}
