//! Error types shared across subsystems.
//!
//! # Taxonomy
//! ```text
//! SkipReason   one record dropped        (load continues)
//! FetchError   one file/object dropped   (load continues)
//! SourceError  whole fetch failed        (fatal at startup, logged on reload)
//! ```

use std::path::PathBuf;

/// Why a single record was left out of the rule set.
#[derive(Debug, thiserror::Error)]
pub enum SkipReason {
    #[error("record must have 6 columns, found {found}")]
    FieldCount { found: usize },

    #[error("invalid regex '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// A single file or object could not be turned into rules.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("could not open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not get object {key}: {message}")]
    Object { key: String, message: String },

    #[error("could not parse CSV from {unit}: {source}")]
    Parse {
        unit: String,
        #[source]
        source: csv::Error,
    },
}

/// The rule source as a whole could not be read.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("invalid source location '{0}'")]
    InvalidLocation(String),

    #[error("could not enumerate {}: {source}", .path.display())]
    Enumerate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to list objects in S3 bucket {bucket}: {message}")]
    List { bucket: String, message: String },

    #[error("rule loading task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
