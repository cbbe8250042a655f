//! Path matching and target rewriting.
//!
//! # Responsibilities
//! - Exact path comparison with trailing-slash normalization
//! - Pattern matching against the raw request path
//! - Expand `$path` and capture references into the target
//!
//! # Design Decisions
//! - Patterns use the `regex` crate: matching is linear in the input,
//!   so operator-supplied patterns cannot trigger catastrophic backtracking
//! - Normalization applies to exact matching only; patterns see the raw path

use regex::Regex;

/// Literal token replaced by the raw request path.
pub const PATH_TOKEN: &str = "$path";

/// How a rule decides whether a request path is its concern.
#[derive(Debug, Clone)]
pub enum PathMatch {
    /// Literal path, compared after trailing-slash normalization.
    Exact(String),
    /// Compiled regular expression, tested against the raw path.
    Pattern(Regex),
}

impl PathMatch {
    /// The path or pattern as written in the source file.
    pub fn as_str(&self) -> &str {
        match self {
            PathMatch::Exact(path) => path,
            PathMatch::Pattern(regex) => regex.as_str(),
        }
    }

    pub fn is_pattern(&self) -> bool {
        matches!(self, PathMatch::Pattern(_))
    }

    /// Produce the redirect target for `path`, or `None` if this matcher
    /// does not apply.
    ///
    /// `normalized` must be `normalize_path(path)`; it is passed in so the
    /// caller normalizes once per request rather than once per rule.
    pub fn rewrite(&self, path: &str, normalized: &str, template: &str) -> Option<String> {
        match self {
            PathMatch::Exact(expected) => {
                (normalize_path(expected) == normalized).then(|| template.to_string())
            }
            PathMatch::Pattern(regex) => {
                if !regex.is_match(path) {
                    return None;
                }
                // `$path` goes first; capture expansion then runs over the result.
                let replacement = template.replace(PATH_TOKEN, path);
                Some(regex.replace_all(path, replacement.as_str()).into_owned())
            }
        }
    }
}

/// Strip every trailing `/` unless the path is the root.
pub fn normalize_path(path: &str) -> &str {
    if path.len() > 1 && path.ends_with('/') {
        path.trim_end_matches('/')
    } else {
        path
    }
}
