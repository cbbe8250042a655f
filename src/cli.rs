//! Command-line interface.
//!
//! Flags overlay the optional TOML file, which overlays the built-in
//! defaults. Most flags also read an environment variable.

use std::path::PathBuf;

use clap::Parser;

use crate::config::loader::{read_config, ConfigError};
use crate::config::validation::validate_config;
use crate::config::{LogFormat, RedirectorConfig};

#[derive(Debug, Parser)]
#[command(name = "redirector")]
#[command(about = "Host and path based HTTP redirect service", long_about = None)]
pub struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Address to listen on.
    #[arg(long)]
    pub bind: Option<String>,

    /// Rule location: a local directory or s3://bucket/prefix.
    #[arg(long, env = "REDIRECTOR_CSV_SRC")]
    pub csv_src: Option<String>,

    /// Seconds between rule reloads. 0 disables reloading.
    #[arg(long, env = "REDIRECTOR_RELOAD_INTERVAL_SECS")]
    pub reload_interval_secs: Option<u64>,

    /// Path answered with the health report.
    #[arg(long)]
    pub health_check_path: Option<String>,

    /// Only answer health checks for this host.
    #[arg(long)]
    pub health_check_host: Option<String>,

    #[arg(long, env = "AWS_REGION")]
    pub aws_region: Option<String>,

    #[arg(long, env = "AWS_ACCESS_KEY_ID", hide_env_values = true)]
    pub aws_access_key_id: Option<String>,

    #[arg(long, env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
    pub aws_secret_access_key: Option<String>,

    #[arg(long, env = "AWS_SESSION_TOKEN", hide_env_values = true)]
    pub aws_session_token: Option<String>,

    /// Endpoint of an S3-compatible store.
    #[arg(long)]
    pub s3_endpoint_url: Option<String>,

    /// Log output format.
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,
}

impl Cli {
    /// Build the effective configuration and validate it.
    pub fn into_config(self) -> Result<RedirectorConfig, ConfigError> {
        let base = match &self.config {
            Some(path) => read_config(path)?,
            None => RedirectorConfig::default(),
        };

        let config = self.apply(base);
        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }

    /// Overlay every flag that was given onto `config`.
    pub fn apply(self, mut config: RedirectorConfig) -> RedirectorConfig {
        if let Some(bind) = self.bind {
            config.listener.bind_address = bind;
        }
        if let Some(location) = self.csv_src {
            config.source.location = location;
        }
        if let Some(secs) = self.reload_interval_secs {
            config.source.reload_interval_secs = secs;
        }
        if let Some(path) = self.health_check_path {
            config.health.path = Some(path);
        }
        if let Some(host) = self.health_check_host {
            config.health.host = Some(host);
        }
        if let Some(region) = self.aws_region {
            config.s3.region = Some(region);
        }
        if let Some(id) = self.aws_access_key_id {
            config.s3.access_key_id = Some(id);
        }
        if let Some(secret) = self.aws_secret_access_key {
            config.s3.secret_access_key = Some(secret);
        }
        if let Some(token) = self.aws_session_token {
            config.s3.session_token = Some(token);
        }
        if let Some(endpoint) = self.s3_endpoint_url {
            config.s3.endpoint_url = Some(endpoint);
        }
        if let Some(format) = self.log_format {
            config.observability.log_format = format;
        }
        config
    }
}
