// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Zone backends.
//!
//! Two backends edit a domain's zone:
//!
//! - [`api::ApiBackend`] goes through the control panel's WHM command
//!   surface: SOA-probed, serial-checked updates with a bounded conflict
//!   retry, followed by a best-effort domain-cache refresh.
//! - [`file::FileBackend`] edits the flat zone file directly: a verbatim
//!   line check for idempotence, an append, and a detached DNS service
//!   restart. No serial handshake.
//!
//! The orchestrator only sees the [`ZoneBackend`] trait and selects the
//! variant at construction time.

pub mod api;
pub mod file;
pub mod parser;
pub mod record;
pub mod soa;

pub use api::ApiBackend;
pub use file::FileBackend;
pub use record::{CommitOutcome, DesiredRecordSet, SoaState, ZoneRecord};

use async_trait::async_trait;

use crate::dns_errors::HookError;

/// One domain's zone, as a backend-agnostic capability.
#[async_trait]
pub trait ZoneBackend: Send + Sync {
    /// Short backend name for logging.
    fn backend_name(&self) -> &'static str;

    /// Establish the zone's authority state before reading it.
    ///
    /// The API backend polls the resolver for the SOA serial; the file
    /// backend has no serial handshake and reports
    /// [`SoaState::Untracked`] immediately.
    ///
    /// # Errors
    ///
    /// Returns a fatal [`HookError`] when the zone never becomes visible.
    async fn probe_soa(&self, domain: &str) -> Result<SoaState, HookError>;

    /// Read the zone's current records, freshly, as a normalized list.
    ///
    /// # Errors
    ///
    /// Returns a fatal [`HookError`] when the zone cannot be accessed at all.
    async fn read_zone(&self, domain: &str) -> Result<Vec<ZoneRecord>, HookError>;

    /// Commit one missing NS record to the zone.
    ///
    /// # Errors
    ///
    /// Returns a recoverable [`HookError::Commit`] when the record could not
    /// be dispatched; a dispatched-but-rejected update is reported through
    /// the [`CommitOutcome`] instead.
    async fn commit_record(
        &self,
        domain: &str,
        nameserver: &str,
        soa: &SoaState,
        ttl: u32,
    ) -> Result<CommitOutcome, HookError>;

    /// Run the backend's best-effort post-run side effects.
    ///
    /// Failures here are logged and swallowed; they never affect the run's
    /// outcome.
    async fn finalize(&self, domain: &str);
}
