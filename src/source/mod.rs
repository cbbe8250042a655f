//! Rule source subsystem.
//!
//! # Data Flow
//! ```text
//! SourceConfig.location
//!     → SourceLocation::parse (local path or s3://bucket/prefix)
//!     → local.rs (walk directory tree) | s3.rs (paginate bucket listing)
//!     → parser.rs (one file/object → RuleBatch)
//!     → merged RuleBatch
//!     → RuleBatch::build → RuleSet
//! ```
//!
//! # Design Decisions
//! - One unreadable file or object is skipped with a warning
//! - Failing to enumerate or list the source fails the whole fetch
//! - Both strategies sit behind one `RuleSource` enum; the set of
//!   backends is closed, so no trait object is needed

pub mod local;
pub mod parser;
pub mod s3;

use std::fmt;
use std::path::PathBuf;

use crate::config::{S3Config, SourceConfig};
use crate::error::SourceError;
use crate::routing::ruleset::RuleBatch;

pub use local::LocalSource;
pub use s3::S3Source;

const S3_SCHEME: &str = "s3://";

/// Where rule files live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    /// Directory tree on the local filesystem.
    Local(PathBuf),
    /// Objects under a prefix in an S3 bucket.
    S3 { bucket: String, prefix: String },
}

impl SourceLocation {
    /// Parse a local path or an `s3://bucket/prefix` URI.
    pub fn parse(location: &str) -> Result<Self, SourceError> {
        if let Some(rest) = location.strip_prefix(S3_SCHEME) {
            let (bucket, prefix) = rest.split_once('/').unwrap_or((rest, ""));
            if bucket.is_empty() {
                return Err(SourceError::InvalidLocation(location.to_string()));
            }
            return Ok(SourceLocation::S3 {
                bucket: bucket.to_string(),
                prefix: prefix.to_string(),
            });
        }

        if location.is_empty() || location.contains("://") {
            return Err(SourceError::InvalidLocation(location.to_string()));
        }
        Ok(SourceLocation::Local(PathBuf::from(location)))
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLocation::Local(path) => write!(f, "{}", path.display()),
            SourceLocation::S3 { bucket, prefix } => write!(f, "{S3_SCHEME}{bucket}/{prefix}"),
        }
    }
}

/// Case-insensitive check that `name` ends in `.{extension}`.
pub fn has_extension(name: &str, extension: &str) -> bool {
    let extension = extension.trim_start_matches('.');
    let name = name.to_ascii_lowercase();
    name.len() > extension.len()
        && name.ends_with(&extension.to_ascii_lowercase())
        && name[..name.len() - extension.len()].ends_with('.')
}

/// A configured origin of rule files.
#[derive(Debug, Clone)]
pub enum RuleSource {
    Local(LocalSource),
    S3(S3Source),
}

impl RuleSource {
    pub fn from_config(source: &SourceConfig, s3: &S3Config) -> Result<Self, SourceError> {
        let extension = source.extension.trim_start_matches('.').to_string();
        Ok(match SourceLocation::parse(&source.location)? {
            SourceLocation::Local(root) => RuleSource::Local(LocalSource::new(root, extension)),
            SourceLocation::S3 { bucket, prefix } => {
                RuleSource::S3(S3Source::new(bucket, prefix, extension, s3.clone()))
            }
        })
    }

    pub fn location(&self) -> SourceLocation {
        match self {
            RuleSource::Local(local) => SourceLocation::Local(local.root().to_path_buf()),
            RuleSource::S3(s3) => SourceLocation::S3 {
                bucket: s3.bucket().to_string(),
                prefix: s3.prefix().to_string(),
            },
        }
    }

    /// Fetch and compile every rule file in the source.
    pub async fn fetch_all(&self) -> Result<RuleBatch, SourceError> {
        match self {
            RuleSource::Local(local) => local.fetch_all().await,
            RuleSource::S3(s3) => s3.fetch_all().await,
        }
    }
}
