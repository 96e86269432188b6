// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! WHM API zone backend.
//!
//! Reads the zone with `whmapi1 dumpzone`, commits NS records with
//! `whmapi1 mass_edit_dns_zone`, and refreshes the panel's domain cache
//! afterwards. Every update carries the caller's view of the zone serial;
//! when the zone moved underneath us the API rejects the edit naming a
//! serial-number conflict, and the committer retries with an advanced local
//! serial up to a fixed attempt bound. Exhausting the bound is a warning,
//! not a run failure.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::command::{CommandRunner, SystemCommandRunner};
use crate::config::HookConfig;
use crate::constants::{
    CACHE_REFRESH_BIN, MAX_COMMIT_ATTEMPTS, NS_RECORD_TYPE, SOA_POLL_INTERVAL_SECS, WHMAPI_BIN,
};
use crate::dns_errors::{CommitError, HookError, ZoneError};
use crate::serial::ZoneSerial;
use crate::zone::parser::{parse_update_reply, parse_zone_dump};
use crate::zone::record::{CommitOutcome, SoaState, ZoneRecord};
use crate::zone::soa::{ResolverSerialLookup, SoaProber};
use crate::zone::ZoneBackend;

/// Zone backend driving the control panel's WHM command surface.
pub struct ApiBackend {
    runner: Arc<dyn CommandRunner>,
    prober: SoaProber,
}

impl ApiBackend {
    /// Build the backend from the resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the configured resolver address is invalid.
    pub fn new(config: &HookConfig) -> Result<Self, HookError> {
        let lookup = Arc::new(ResolverSerialLookup::new(config.resolver_addr()?));
        Ok(Self {
            runner: Arc::new(SystemCommandRunner),
            prober: SoaProber::new(
                lookup,
                config.soa_timeout,
                Duration::from_secs(SOA_POLL_INTERVAL_SECS),
            ),
        })
    }

    /// Build the backend over explicit transports. Used by tests to count
    /// update attempts without spawning processes.
    #[must_use]
    pub fn with_transports(runner: Arc<dyn CommandRunner>, prober: SoaProber) -> Self {
        Self { runner, prober }
    }

    /// Dispatch one `mass_edit_dns_zone` call and decode its reply.
    async fn send_update(
        &self,
        domain: &str,
        nameserver: &str,
        serial: ZoneSerial,
        ttl: u32,
    ) -> Result<CommitOutcome, CommitError> {
        let payload = serde_json::json!({
            "dname": format!("{domain}."),
            "ttl": ttl,
            "record_type": NS_RECORD_TYPE,
            "data": [nameserver],
        });
        let args = vec![
            "mass_edit_dns_zone".to_string(),
            format!("zone={domain}"),
            format!("serial={serial}"),
            format!("add={payload}"),
        ];

        info!(domain, nameserver, %serial, "calling zone update command");
        let reply = self
            .runner
            .run(WHMAPI_BIN, &args)
            .await
            .map_err(|e| CommitError::UpdateDispatchFailed {
                domain: domain.to_string(),
                nameserver: nameserver.to_string(),
                reason: e.to_string(),
            })?;

        Ok(parse_update_reply(&reply.stdout))
    }
}

#[async_trait]
impl ZoneBackend for ApiBackend {
    fn backend_name(&self) -> &'static str {
        "whm-api"
    }

    async fn probe_soa(&self, domain: &str) -> Result<SoaState, HookError> {
        let serial = self.prober.probe(domain).await?;
        Ok(SoaState::Serial(serial))
    }

    async fn read_zone(&self, domain: &str) -> Result<Vec<ZoneRecord>, HookError> {
        let args = vec!["dumpzone".to_string(), format!("zone={domain}")];
        let reply = self
            .runner
            .run(WHMAPI_BIN, &args)
            .await
            .map_err(|e| ZoneError::ZoneDumpFailed {
                domain: domain.to_string(),
                reason: e.to_string(),
            })?;

        if !reply.success {
            return Err(ZoneError::ZoneDumpFailed {
                domain: domain.to_string(),
                reason: first_line(&reply.stderr).to_string(),
            }
            .into());
        }

        let records = parse_zone_dump(&reply.stdout);
        info!(domain, count = records.len(), "zone dump parsed");
        Ok(records)
    }

    async fn commit_record(
        &self,
        domain: &str,
        nameserver: &str,
        soa: &SoaState,
        ttl: u32,
    ) -> Result<CommitOutcome, HookError> {
        let SoaState::Serial(probed) = soa else {
            return Err(CommitError::MissingSerial {
                domain: domain.to_string(),
            }
            .into());
        };

        let mut serial = *probed;
        let mut outcome = CommitOutcome {
            applied: false,
            result_code: None,
            reason: String::new(),
        };

        for attempt in 1..=MAX_COMMIT_ATTEMPTS {
            outcome = self.send_update(domain, nameserver, serial, ttl).await?;
            if outcome.applied {
                info!(domain, nameserver, %serial, attempt, "NS record committed");
                return Ok(outcome);
            }
            if !outcome.is_serial_conflict() {
                // Rejected for some other reason; retrying with a new serial
                // cannot help.
                return Ok(outcome);
            }
            debug!(
                domain,
                nameserver,
                %serial,
                attempt,
                reason = %outcome.reason,
                "zone serial conflict, retrying with advanced serial"
            );
            serial = serial.next();
        }

        warn!(
            domain,
            nameserver,
            attempts = MAX_COMMIT_ATTEMPTS,
            "zone serial still conflicting after retries, skipping nameserver"
        );
        Ok(outcome)
    }

    async fn finalize(&self, domain: &str) {
        // Cache refresh is best-effort; the records are already in the zone.
        match self.runner.run(CACHE_REFRESH_BIN, &[]).await {
            Ok(reply) if reply.success => {
                info!(domain, "domain cache refresh triggered");
            }
            Ok(reply) => {
                warn!(domain, stderr = %first_line(&reply.stderr), "domain cache refresh failed");
            }
            Err(e) => {
                warn!(domain, error = %e, "domain cache refresh could not be dispatched");
            }
        }
    }
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("")
}

#[cfg(test)]
#[path = "api_tests.rs"]
mod api_tests;
