//! Redirect rules and their compilation from raw records.
//!
//! # Responsibilities
//! - Define the compiled `Rule`
//! - Turn one six-field record into a `Rule` or a `SkipReason`
//!
//! # Design Decisions
//! - Only the token `regex` selects pattern matching; anything else is exact
//! - Unparsable status codes and weights become `0` instead of rejecting
//!   the record
//! - Patterns are compiled here, once, so matching never sees an invalid one

use regex::Regex;

use crate::error::SkipReason;
use crate::routing::matcher::PathMatch;

/// Number of columns every rule record carries.
pub const FIELD_COUNT: usize = 6;

/// Match-kind token that selects regular-expression matching.
pub const PATTERN_TOKEN: &str = "regex";

/// One compiled redirect directive.
#[derive(Debug, Clone)]
pub struct Rule {
    /// Domain this rule applies to.
    pub source_host: String,

    /// Exact path or compiled pattern.
    pub path_match: PathMatch,

    /// Target URL, possibly containing `$path` and capture references.
    pub target_template: String,

    /// HTTP status used for the redirect.
    pub status_code: u16,

    /// Higher weights are evaluated first.
    pub weight: i64,
}

impl Rule {
    /// The path or pattern as written in the source file.
    pub fn match_value(&self) -> &str {
        self.path_match.as_str()
    }
}

/// Where a record came from, for diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct RecordOrigin<'a> {
    pub unit: &'a str,
    pub line: u64,
}

/// Compile one record into a rule.
///
/// Fields are trimmed before use. The record must have exactly
/// [`FIELD_COUNT`] fields: host, match kind, path or pattern, target,
/// status code, weight.
pub fn compile_record<S: AsRef<str>>(fields: &[S]) -> Result<Rule, SkipReason> {
    if fields.len() != FIELD_COUNT {
        return Err(SkipReason::FieldCount { found: fields.len() });
    }

    let field = |i: usize| fields[i].as_ref().trim();
    let match_value = field(2);

    let path_match = if field(1) == PATTERN_TOKEN {
        let regex = Regex::new(match_value).map_err(|source| SkipReason::InvalidPattern {
            pattern: match_value.to_string(),
            source,
        })?;
        PathMatch::Pattern(regex)
    } else {
        PathMatch::Exact(match_value.to_string())
    };

    Ok(Rule {
        source_host: field(0).to_string(),
        path_match,
        target_template: field(3).to_string(),
        status_code: field(4).parse().unwrap_or(0),
        weight: field(5).parse().unwrap_or(0),
    })
}

/// Compile a record, logging and discarding it when it is rejected.
pub fn compile_or_skip<S: AsRef<str>>(fields: &[S], origin: RecordOrigin<'_>) -> Option<Rule> {
    match compile_record(fields) {
        Ok(rule) => Some(rule),
        Err(reason) => {
            tracing::warn!(
                file = %origin.unit,
                line = origin.line,
                reason = %reason,
                "Skipping rule record"
            );
            None
        }
    }
}
