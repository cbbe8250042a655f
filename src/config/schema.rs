//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the redirect service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RedirectorConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Where rules come from and how often they are reloaded.
    pub source: SourceConfig,

    /// Health endpoint settings.
    pub health: HealthConfig,

    /// S3 region and credentials for `s3://` sources.
    pub s3: S3Config,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Rule source configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Local directory, or an `s3://bucket/prefix` URI.
    pub location: String,

    /// File extension (without the dot) of rule files, matched case-insensitively.
    pub extension: String,

    /// Reload interval in seconds. 0 disables reloading.
    pub reload_interval_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            location: "/app/redirects".to_string(),
            extension: "csv".to_string(),
            reload_interval_secs: 0,
        }
    }
}

/// Health endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct HealthConfig {
    /// Path of the health endpoint (e.g., "/healthz"). Disabled when unset.
    pub path: Option<String>,

    /// Only answer health checks for this host. Any host when unset.
    pub host: Option<String>,
}

/// S3 access configuration.
///
/// Explicit keys take precedence over the ambient credential chain
/// (environment, profile, instance or task role).
#[derive(Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct S3Config {
    pub region: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub session_token: Option<String>,

    /// Custom endpoint for S3-compatible stores. Requests use path-style
    /// addressing when set.
    pub endpoint_url: Option<String>,
}

impl S3Config {
    /// Static credentials, when both key id and secret are present.
    /// Empty strings count as unset.
    pub fn static_credentials(&self) -> Option<(&str, &str)> {
        Some((non_empty(&self.access_key_id)?, non_empty(&self.secret_access_key)?))
    }

    pub fn endpoint(&self) -> Option<&str> {
        non_empty(&self.endpoint_url)
    }

    /// True when exactly one of key id and secret is set.
    pub fn has_partial_credentials(&self) -> bool {
        non_empty(&self.access_key_id).is_some() != non_empty(&self.secret_access_key).is_some()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl std::fmt::Debug for S3Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "<redacted>");
        f.debug_struct("S3Config")
            .field("region", &self.region)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &redact(&self.secret_access_key))
            .field("session_token", &redact(&self.session_token))
            .field("endpoint_url", &self.endpoint_url)
            .finish()
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Json,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
