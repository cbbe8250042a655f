//! Rule files from a local directory tree.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::error::{FetchError, SourceError};
use crate::routing::ruleset::RuleBatch;
use crate::source::{has_extension, parser::parse_rules};

/// Reads every matching file below `root`.
#[derive(Debug, Clone)]
pub struct LocalSource {
    root: PathBuf,
    extension: String,
}

impl LocalSource {
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the tree on the blocking pool and compile every rule file.
    pub async fn fetch_all(&self) -> Result<RuleBatch, SourceError> {
        let source = self.clone();
        tokio::task::spawn_blocking(move || source.load_blocking()).await?
    }

    /// Synchronous variant of [`fetch_all`](Self::fetch_all).
    pub fn load_blocking(&self) -> Result<RuleBatch, SourceError> {
        tracing::info!(path = %self.root.display(), "Loading redirects from local directory");

        let mut files = Vec::new();
        collect_files(&self.root, &self.extension, &mut files)?;

        let mut batch = RuleBatch::new();
        for path in files {
            tracing::info!(file = %path.display(), "Processing file");
            match load_file(&path) {
                Ok(rules) => batch.merge(rules),
                Err(e) => tracing::warn!(error = %e, "Skipping rule file"),
            }
        }
        Ok(batch)
    }
}

/// Depth-first walk in file-name order, so equal-weight rules keep a
/// stable first-seen order between loads.
fn collect_files(dir: &Path, extension: &str, out: &mut Vec<PathBuf>) -> Result<(), SourceError> {
    let enumerate = |source: std::io::Error| SourceError::Enumerate {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = fs::read_dir(dir)
        .map_err(enumerate)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(enumerate)?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let path = entry.path();
        let file_type = entry.file_type().map_err(enumerate)?;
        if file_type.is_dir() {
            collect_files(&path, extension, out)?;
        } else if has_extension(&entry.file_name().to_string_lossy(), extension) {
            out.push(path);
        }
    }
    Ok(())
}

fn load_file(path: &Path) -> Result<RuleBatch, FetchError> {
    let file = File::open(path).map_err(|source| FetchError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    parse_rules(BufReader::new(file), &path.display().to_string())
}
