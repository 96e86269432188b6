// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Reconciliation orchestrator.
//!
//! Sequences one domain through
//! `probe SOA → read zone → diff → commit each → finalize` and enforces the
//! propagation policy: SOA timeouts and zone access failures abort the run,
//! per-nameserver commit failures degrade to warnings. Partial convergence
//! (some nameservers added, others skipped) is an acceptable terminal state
//! — the next run picks up whatever is still missing.

pub mod diff;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::dns_errors::HookError;
use crate::zone::record::DesiredRecordSet;
use crate::zone::ZoneBackend;

/// Summary of one reconciliation run.
#[derive(Debug, Clone)]
pub struct ReconcileReport {
    /// The reconciled domain
    pub domain: String,
    /// Nameservers already present before the run
    pub already_present: usize,
    /// Nameservers committed by this run
    pub committed: Vec<String>,
    /// Nameservers that could not be committed (logged, not fatal)
    pub skipped: Vec<String>,
    /// Completion timestamp
    pub finished_at: DateTime<Utc>,
}

/// Orchestrates one domain's reconciliation over a zone backend.
pub struct Reconciler {
    backend: Arc<dyn ZoneBackend>,
    desired: DesiredRecordSet,
}

impl Reconciler {
    /// Build an orchestrator over the selected backend and the run's desired
    /// record set.
    #[must_use]
    pub fn new(backend: Arc<dyn ZoneBackend>, desired: DesiredRecordSet) -> Self {
        Self { backend, desired }
    }

    /// Reconcile one domain.
    ///
    /// # Errors
    ///
    /// Returns a [`HookError`] for SOA timeouts and zone access failures.
    /// Commit failures are contained per nameserver and reported through
    /// [`ReconcileReport::skipped`].
    pub async fn reconcile(&self, domain: &str) -> Result<ReconcileReport, HookError> {
        info!(
            domain,
            backend = self.backend.backend_name(),
            desired = self.desired.nameservers.len(),
            "starting zone reconciliation"
        );

        let soa = self.backend.probe_soa(domain).await?;
        let existing = self.backend.read_zone(domain).await?;
        let missing = diff::missing_nameservers(&existing, &self.desired);
        let already_present = self.desired.nameservers.len() - missing.len();

        if missing.is_empty() {
            info!(domain, "zone already converged, nothing to commit");
        }

        let mut committed = Vec::new();
        let mut skipped = Vec::new();

        for nameserver in &missing {
            match self
                .backend
                .commit_record(domain, nameserver, &soa, self.desired.ttl)
                .await
            {
                Ok(outcome) if outcome.applied => {
                    info!(domain, nameserver, reason = %outcome.reason, "nameserver committed");
                    committed.push(nameserver.clone());
                }
                Ok(outcome) => {
                    warn!(
                        domain,
                        nameserver,
                        result_code = ?outcome.result_code,
                        reason = %outcome.reason,
                        "nameserver not applied, continuing with the rest"
                    );
                    skipped.push(nameserver.clone());
                }
                Err(e) if e.is_recoverable() => {
                    warn!(domain, nameserver, error = %e, "commit failed, continuing with the rest");
                    skipped.push(nameserver.clone());
                }
                Err(e) => return Err(e),
            }
        }

        self.backend.finalize(domain).await;

        let report = ReconcileReport {
            domain: domain.to_string(),
            already_present,
            committed,
            skipped,
            finished_at: Utc::now(),
        };
        info!(
            domain,
            already_present = report.already_present,
            committed = report.committed.len(),
            skipped = report.skipped.len(),
            "zone reconciliation finished"
        );
        Ok(report)
    }
}
