// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Flat zone-file backend.
//!
//! Edits `<zone_dir>/<domain>.db` directly: reads the current records,
//! checks for the literal record line before appending, and restarts the
//! DNS service detached so the hook never blocks on it. There is no serial
//! handshake — the nameserver reloads the file wholesale.
//!
//! The append is a single write on an append-mode handle, so concurrent
//! appends cannot interleave bytes. The read-check-append window itself is
//! not locked; a duplicate line slipping through converges on the next run
//! via the verbatim-line check.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use crate::command::{CommandRunner, SystemCommandRunner};
use crate::config::HookConfig;
use crate::constants::{DNS_SERVICE_NAME, SERVICE_MANAGER_BIN, ZONE_FILE_SUFFIX};
use crate::dns_errors::{CommitError, HookError, ZoneError};
use crate::zone::parser::parse_zone_file;
use crate::zone::record::{CommitOutcome, SoaState, ZoneRecord};
use crate::zone::ZoneBackend;

/// Reply reason when the record line was already present verbatim.
pub const REASON_ALREADY_EXISTS: &str = "NS record already exists";

/// Reply reason when the record line was appended.
pub const REASON_ADDED: &str = "NS record added successfully";

/// Zone backend editing flat zone files under a zone directory.
pub struct FileBackend {
    zone_dir: PathBuf,
    runner: Arc<dyn CommandRunner>,
}

impl FileBackend {
    /// Build the backend from the resolved configuration.
    #[must_use]
    pub fn new(config: &HookConfig) -> Self {
        Self::with_runner(config.zone_dir.clone(), Arc::new(SystemCommandRunner))
    }

    /// Build the backend over an explicit zone directory and command runner.
    /// Used by tests to observe the service-restart side effect.
    #[must_use]
    pub fn with_runner(zone_dir: PathBuf, runner: Arc<dyn CommandRunner>) -> Self {
        Self { zone_dir, runner }
    }

    /// Path of the domain's zone file.
    #[must_use]
    pub fn zone_file_path(&self, domain: &str) -> PathBuf {
        self.zone_dir.join(format!("{domain}{ZONE_FILE_SUFFIX}"))
    }

    /// Read the zone file's raw content, mapping I/O failures to the zone
    /// access taxonomy.
    async fn read_zone_file(&self, domain: &str) -> Result<String, ZoneError> {
        let path = self.zone_file_path(domain);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ZoneError::ZoneFileNotFound {
                    domain: domain.to_string(),
                    path,
                })
            }
            Err(e) => Err(ZoneError::ZoneFileUnreadable {
                domain: domain.to_string(),
                path,
                reason: e.to_string(),
            }),
        }
    }

    /// Restart the DNS service without waiting for it.
    async fn restart_dns_service(&self, domain: &str) {
        let args = vec!["restart".to_string(), DNS_SERVICE_NAME.to_string()];
        if let Err(e) = self.runner.spawn_detached(SERVICE_MANAGER_BIN, &args).await {
            warn!(domain, error = %e, "failed to trigger DNS service restart");
        }
    }
}

#[async_trait]
impl ZoneBackend for FileBackend {
    fn backend_name(&self) -> &'static str {
        "zone-file"
    }

    async fn probe_soa(&self, _domain: &str) -> Result<SoaState, HookError> {
        // The file is edited directly; authority state is the nameserver's
        // problem after the restart.
        Ok(SoaState::Untracked)
    }

    async fn read_zone(&self, domain: &str) -> Result<Vec<ZoneRecord>, HookError> {
        let content = self.read_zone_file(domain).await?;
        let records = parse_zone_file(&content);
        info!(domain, count = records.len(), "zone file parsed");
        Ok(records)
    }

    async fn commit_record(
        &self,
        domain: &str,
        nameserver: &str,
        _soa: &SoaState,
        ttl: u32,
    ) -> Result<CommitOutcome, HookError> {
        let line = format!("{domain}. {ttl} IN NS {nameserver}.");
        let content = self.read_zone_file(domain).await?;

        if content.contains(&line) {
            info!(domain, nameserver, "NS record already present in zone file");
            return Ok(CommitOutcome {
                applied: true,
                result_code: Some(1),
                reason: REASON_ALREADY_EXISTS.to_string(),
            });
        }

        let path = self.zone_file_path(domain);
        let append = async {
            let mut file = tokio::fs::OpenOptions::new()
                .append(true)
                .open(&path)
                .await?;
            file.write_all(format!("\n{line}").as_bytes()).await?;
            file.flush().await
        };
        append.await.map_err(|e| CommitError::AppendFailed {
            domain: domain.to_string(),
            nameserver: nameserver.to_string(),
            reason: e.to_string(),
        })?;

        self.restart_dns_service(domain).await;
        info!(domain, nameserver, "NS record appended to zone file");

        Ok(CommitOutcome {
            applied: true,
            result_code: Some(1),
            reason: REASON_ADDED.to_string(),
        })
    }

    async fn finalize(&self, _domain: &str) {
        // Restarts happen per append; nothing to do after the run.
    }
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod file_tests;
