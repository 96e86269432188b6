// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! DNS operation error types for nshook.
//!
//! This module provides specialized error types for:
//! - SOA availability probing (zone not yet authoritative)
//! - Zone access failures (missing zone file, failed zone dump)
//! - Per-nameserver commit failures
//!
//! Only input, SOA-timeout and zone-access errors abort a run. Commit-stage
//! errors are contained by the orchestrator: they degrade to a logged warning
//! and the run continues with the next nameserver.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::event::EventError;

/// SOA record never became visible within the configured number of polls.
///
/// Fatal for the run: a zone that is not authoritative yet cannot be edited
/// through the serial-checked update command, so no commit is attempted.
#[derive(Debug, Clone, Error)]
#[error("SOA record not found for '{domain}' after {attempts} tries")]
pub struct SoaNotFound {
    /// The domain whose zone never answered
    pub domain: String,
    /// Number of poll attempts performed
    pub attempts: u32,
}

/// Errors that can occur while reading a domain's zone.
#[derive(Debug, Clone, Error)]
pub enum ZoneError {
    /// The flat zone file backing the domain does not exist
    #[error("zone file not found for domain '{domain}' at {}", .path.display())]
    ZoneFileNotFound {
        /// The domain whose zone file is missing
        domain: String,
        /// The path that was probed
        path: PathBuf,
    },

    /// The zone file exists but could not be read
    #[error("failed to read zone file for domain '{domain}' at {}: {reason}", .path.display())]
    ZoneFileUnreadable {
        /// The domain whose zone file failed to read
        domain: String,
        /// The path that failed
        path: PathBuf,
        /// Underlying I/O error text
        reason: String,
    },

    /// The zone dump command failed to produce output
    #[error("zone dump failed for domain '{domain}': {reason}")]
    ZoneDumpFailed {
        /// The domain whose zone could not be dumped
        domain: String,
        /// Specific reason for the failure
        reason: String,
    },
}

/// Errors that can occur while committing a single NS record.
///
/// These are per-nameserver and recoverable: the orchestrator logs a warning
/// and moves on to the next nameserver instead of aborting the run.
#[derive(Debug, Clone, Error)]
pub enum CommitError {
    /// The API backend was asked to commit without a probed serial
    #[error("no zone serial available for domain '{domain}', cannot build update command")]
    MissingSerial {
        /// The domain being updated
        domain: String,
    },

    /// The update command could not be dispatched at all
    #[error("failed to dispatch NS update for '{nameserver}' on domain '{domain}': {reason}")]
    UpdateDispatchFailed {
        /// The domain being updated
        domain: String,
        /// The nameserver that was being added
        nameserver: String,
        /// Specific reason for the failure
        reason: String,
    },

    /// Appending the record line to the zone file failed
    #[error("failed to append NS record for '{nameserver}' to zone file of '{domain}': {reason}")]
    AppendFailed {
        /// The domain being updated
        domain: String,
        /// The nameserver that was being added
        nameserver: String,
        /// Underlying I/O error text
        reason: String,
    },
}

/// Composite error type for a hook run.
///
/// This is the primary error type returned by the orchestrator and the zone
/// backends. It provides a unified interface for the propagation policy in
/// `main`: any `HookError` reaching the top level exits the process non-zero
/// with no JSON on stdout.
#[derive(Debug, Error)]
pub enum HookError {
    /// Input envelope error (missing user/domain, unexpected event)
    #[error(transparent)]
    Event(#[from] EventError),

    /// Configuration file error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// SOA polling exhausted
    #[error(transparent)]
    Probe(#[from] SoaNotFound),

    /// Zone access failure
    #[error(transparent)]
    Zone(#[from] ZoneError),

    /// Per-nameserver commit failure
    #[error(transparent)]
    Commit(#[from] CommitError),

    /// Generic error for operations that don't fit other categories
    #[error("hook execution failed: {0}")]
    Generic(String),
}

impl HookError {
    /// Returns true if the run should continue past this error.
    ///
    /// Commit-stage failures are scoped to one nameserver; everything else
    /// aborts the run.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Commit(_))
    }
}

// Conversion from anyhow::Error for transport-level failures
impl From<anyhow::Error> for HookError {
    fn from(err: anyhow::Error) -> Self {
        Self::Generic(err.to_string())
    }
}
