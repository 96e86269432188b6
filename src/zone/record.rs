// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Zone record data model.

use crate::constants::SERIAL_CONFLICT_MARKER;
use crate::serial::ZoneSerial;

/// One DNS resource record as seen in a zone.
///
/// Records are read fresh from the backend on every run and never mutated;
/// the parsers only produce a `ZoneRecord` when all four fields are present
/// and non-empty, so a partially-parsed entry is treated as not existing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneRecord {
    /// Owner name
    pub name: String,
    /// TTL in seconds
    pub ttl: u32,
    /// Record type string, e.g. `NS`
    pub record_type: String,
    /// Record target (`nsdname` for NS records)
    pub target: String,
}

/// The configured, sanitized nameserver set paired with a fixed TTL and type.
///
/// Built once per run from configuration and immutable for its duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredRecordSet {
    /// Sanitized nameserver hostnames
    pub nameservers: Vec<String>,
    /// TTL every committed record carries
    pub ttl: u32,
    /// Record type, always `NS`
    pub record_type: String,
}

/// The zone's authority state at the start of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoaState {
    /// Serial probed from the zone's SOA record (API backend)
    Serial(ZoneSerial),
    /// The backend edits the zone without a serial handshake (file backend)
    Untracked,
}

/// Per-record result of one commit attempt.
///
/// `applied` is the explicit success signal: the WHM API reports `result: 1`
/// on success and `result: 0` on failure, so no caller assumes which numeric
/// value means which. Consumed immediately by the retry decision, never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitOutcome {
    /// Whether the backend accepted the record
    pub applied: bool,
    /// Raw result code as reported by the backend, if any
    pub result_code: Option<i64>,
    /// Free-text diagnostic, possibly naming a serial conflict
    pub reason: String,
}

impl CommitOutcome {
    /// Whether this rejection names a zone-serial conflict and is therefore
    /// worth retrying with an advanced serial.
    #[must_use]
    pub fn is_serial_conflict(&self) -> bool {
        !self.applied && self.reason.contains(SERIAL_CONFLICT_MARKER)
    }
}
