// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Text decoders for the backend command surface.
//!
//! All three formats here are semi-structured command output, not wire
//! formats, so every decoder is tolerant: malformed entries are dropped
//! silently and the well-formed subset survives. A zone with a handful of
//! non-standard lines must still yield its parseable records.
//!
//! - `whmapi1 dumpzone` output: records delimited by a `Line:` token,
//!   fields as `key: value` lines.
//! - Flat zone files: one record per line, whitespace columns 0-3 as
//!   name/ttl/type/target, `;` comments and blank lines skipped.
//! - `whmapi1 mass_edit_dns_zone` replies: a `result:` code and a `reason:`
//!   diagnostic somewhere in the output.

use std::collections::HashMap;

use crate::constants::DUMP_RECORD_DELIMITER;
use crate::zone::record::{CommitOutcome, ZoneRecord};

/// Parse `whmapi1 dumpzone` output into zone records.
///
/// The dump lists one record per `Line:` block; within a block every field
/// is a `key: value` line. A block only yields a record when `name`, `ttl`,
/// `type` and a target (`nsdname`, falling back to `data`) are all present
/// and non-empty and the TTL is numeric — metadata blocks and malformed
/// records are dropped.
#[must_use]
pub fn parse_zone_dump(output: &str) -> Vec<ZoneRecord> {
    let mut records = Vec::new();
    let mut block: HashMap<String, String> = HashMap::new();

    for line in output.lines() {
        // Records arrive as YAML-ish list items, so the delimiter may carry
        // a leading dash.
        let entry = line.trim();
        let entry = entry.strip_prefix("- ").unwrap_or(entry).trim_start();
        if entry.starts_with(DUMP_RECORD_DELIMITER) {
            // New record block; flush the previous one.
            if let Some(record) = record_from_fields(&block) {
                records.push(record);
            }
            block.clear();
        }
        if let Some((key, value)) = entry.split_once(':') {
            block.insert(key.trim().to_string(), unquote(value.trim()).to_string());
        }
    }
    if let Some(record) = record_from_fields(&block) {
        records.push(record);
    }

    records
}

/// Parse a flat zone file into zone records.
///
/// Blank lines and `;` comment lines are skipped; the remaining lines are
/// split on whitespace and columns 0-3 are taken as name/ttl/type/target.
/// Lines with fewer than four columns or a non-numeric TTL are dropped.
#[must_use]
pub fn parse_zone_file(content: &str) -> Vec<ZoneRecord> {
    content
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            if line.is_empty() || line.starts_with(';') {
                return None;
            }
            let columns: Vec<&str> = line.split_whitespace().collect();
            if columns.len() < 4 {
                return None;
            }
            let ttl = columns[1].parse::<u32>().ok()?;
            Some(ZoneRecord {
                name: columns[0].to_string(),
                ttl,
                record_type: columns[2].to_string(),
                target: columns[3].to_string(),
            })
        })
        .collect()
}

/// Decode a `mass_edit_dns_zone` reply into a commit outcome.
///
/// Scans the reply for the first `result:` line (integer code; the WHM API
/// reports 1 on success and 0 on failure) and the first `reason:` line.
/// A reply with no decodable result code is treated as not applied.
#[must_use]
pub fn parse_update_reply(output: &str) -> CommitOutcome {
    let mut result_code: Option<i64> = None;
    let mut reason: Option<String> = None;

    for line in output.lines() {
        let line = line.trim();
        if result_code.is_none() {
            if let Some(value) = line.strip_prefix("result:") {
                result_code = unquote(value.trim()).parse::<i64>().ok();
            }
        }
        if reason.is_none() {
            if let Some(value) = line.strip_prefix("reason:") {
                reason = Some(unquote(value.trim()).to_string());
            }
        }
        if result_code.is_some() && reason.is_some() {
            break;
        }
    }

    CommitOutcome {
        applied: matches!(result_code, Some(code) if code != 0),
        result_code,
        reason: reason.unwrap_or_default(),
    }
}

/// Build a record from an accumulated `key: value` block, or `None` when any
/// of the four required fields is missing, empty or malformed.
fn record_from_fields(fields: &HashMap<String, String>) -> Option<ZoneRecord> {
    let name = non_empty(fields.get("name")?)?;
    let record_type = non_empty(fields.get("type")?)?;
    let target = fields
        .get("nsdname")
        .and_then(|v| non_empty(v))
        .or_else(|| fields.get("data").and_then(|v| non_empty(v)))?;
    let ttl = fields.get("ttl")?.parse::<u32>().ok()?;

    Some(ZoneRecord {
        name: name.to_string(),
        ttl,
        record_type: record_type.to_string(),
        target: target.to_string(),
    })
}

fn non_empty(value: &str) -> Option<&str> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Strip one layer of surrounding single or double quotes, as emitted by the
/// WHM API's YAML-ish output for numeric-looking strings.
fn unquote(value: &str) -> &str {
    let stripped = value
        .strip_prefix('\'')
        .and_then(|v| v.strip_suffix('\''))
        .or_else(|| value.strip_prefix('"').and_then(|v| v.strip_suffix('"')));
    stripped.unwrap_or(value)
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod parser_tests;
