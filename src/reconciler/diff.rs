// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Desired-minus-existing NS set computation.
//!
//! The diff is what makes the hook idempotent: only nameservers with no
//! matching record in the zone are attempted, so re-running against a
//! converged zone commits nothing.

use crate::zone::record::{DesiredRecordSet, ZoneRecord};

/// Compute the nameservers that still need a record in the zone.
///
/// A desired nameserver is excluded when some existing record matches the
/// desired type and TTL exactly and its whitespace-trimmed target equals the
/// nameserver. Owner names are intentionally ignored — the two backends
/// format them differently (absolute vs. relative), and a matching NS target
/// at the right type and TTL is the same delegation either way.
#[must_use]
pub fn missing_nameservers(existing: &[ZoneRecord], desired: &DesiredRecordSet) -> Vec<String> {
    let mut remaining = desired.nameservers.clone();

    for record in existing {
        if record.record_type != desired.record_type || record.ttl != desired.ttl {
            continue;
        }
        let target = record.target.trim();
        remaining.retain(|nameserver| nameserver != target);
    }

    remaining
}

#[cfg(test)]
#[path = "diff_tests.rs"]
mod diff_tests;
