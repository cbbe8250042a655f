//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the rule source location is usable
//! - Validate addresses and paths
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RedirectorConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::RedirectorConfig;
use crate::source::SourceLocation;

/// One semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check `config` and collect every problem found.
pub fn validate_config(config: &RedirectorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let location = match SourceLocation::parse(&config.source.location) {
        Ok(location) => Some(location),
        Err(e) => {
            errors.push(ValidationError::new("source.location", e.to_string()));
            None
        }
    };

    if config.source.extension.trim_start_matches('.').is_empty() {
        errors.push(ValidationError::new("source.extension", "must not be empty"));
    }

    if let Some(path) = &config.health.path {
        if !path.starts_with('/') {
            errors.push(ValidationError::new("health.path", format!("'{path}' must start with '/'")));
        }
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    // Credentials only matter when rules come from S3.
    let reads_s3 = matches!(location, Some(SourceLocation::S3 { .. }));
    if reads_s3 && config.s3.has_partial_credentials() {
        errors.push(ValidationError::new(
            "s3",
            "access_key_id and secret_access_key must be set together",
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&RedirectorConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = RedirectorConfig::default();
        config.source.location = "s3://".into();
        config.health.path = Some("healthz".into());
        config.listener.bind_address = "nowhere".into();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["source.location", "health.path", "listener.bind_address"]);
    }

    #[test]
    fn test_rejects_unknown_scheme() {
        let mut config = RedirectorConfig::default();
        config.source.location = "gs://bucket/prefix".into();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_half_credentials_rejected_for_s3_source() {
        let mut config = RedirectorConfig::default();
        config.source.location = "s3://rules/prod".into();
        config.s3.access_key_id = Some("AKIA".into());
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "s3");
    }

    #[test]
    fn test_empty_credentials_count_as_unset() {
        let mut config = RedirectorConfig::default();
        config.source.location = "s3://rules/prod".into();
        config.s3.access_key_id = Some("AKIA".into());
        config.s3.secret_access_key = Some(String::new());
        assert!(validate_config(&config).is_err());

        config.s3.access_key_id = Some(String::new());
        assert!(validate_config(&config).is_ok());
        assert!(config.s3.static_credentials().is_none());
    }

    #[test]
    fn test_stray_credentials_ignored_for_local_source() {
        let mut config = RedirectorConfig::default();
        config.s3.access_key_id = Some("AKIA".into());
        assert!(validate_config(&config).is_ok());
    }
}
