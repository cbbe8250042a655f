//! CSV parsing of one rule file.
//!
//! # Responsibilities
//! - Read records with a variable number of fields
//! - Drop the header row, blank rows and `#` comments
//! - Hand each remaining record to the rule compiler
//!
//! # Design Decisions
//! - The first record is always the header, whatever it contains
//! - A CSV decoding error rejects the whole file, not just one row
//! - Column-count and pattern errors only drop their own row

use std::io::Read;

use csv::{ReaderBuilder, StringRecord};

use crate::error::FetchError;
use crate::routing::rule::{compile_or_skip, RecordOrigin};
use crate::routing::ruleset::RuleBatch;

/// Parse every rule in `reader`. `unit` names the file or object in logs.
pub fn parse_rules<R: Read>(reader: R, unit: &str) -> Result<RuleBatch, FetchError> {
    let mut csv = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut batch = RuleBatch::new();
    let mut record = StringRecord::new();
    let mut header_seen = false;

    loop {
        let more = csv.read_record(&mut record).map_err(|source| FetchError::Parse {
            unit: unit.to_string(),
            source,
        })?;
        if !more {
            break;
        }
        if !header_seen {
            header_seen = true;
            continue;
        }
        if is_skippable(&record) {
            continue;
        }

        let origin = RecordOrigin {
            unit,
            line: record.position().map_or(0, |p| p.line()),
        };
        if let Some(rule) = compile_or_skip(&record.iter().collect::<Vec<_>>(), origin) {
            batch.push(rule);
        }
    }

    Ok(batch)
}

/// Blank rows and comment rows carry no rule.
fn is_skippable(record: &StringRecord) -> bool {
    match record.get(0).map(str::trim) {
        None => true,
        Some(first) => first.is_empty() || first.starts_with('#'),
    }
}
