// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! SOA availability probing.
//!
//! A freshly created domain may not be authoritative yet: the panel writes
//! the account before the nameserver loads the zone. The prober bridges that
//! propagation delay by polling the local resolver for the zone's SOA serial
//! at a fixed interval, bounded by the configured attempt count. A zone that
//! never answers fails the run — no update is attempted against a zone whose
//! serial cannot be read.

use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use hickory_client::client::{Client, SyncClient};
use hickory_client::rr::{DNSClass, Name, RData, RecordType};
use hickory_client::udp::UdpClientConnection;
use tracing::{info, warn};

use crate::dns_errors::SoaNotFound;
use crate::serial::ZoneSerial;

/// One SOA serial lookup against a resolver.
///
/// Split from the polling loop so the attempt bound is testable without a
/// live resolver.
#[async_trait]
pub trait SerialLookup: Send + Sync {
    /// Query the zone's SOA serial, `None` when the zone is not visible yet.
    ///
    /// # Errors
    ///
    /// Returns an error when the query itself fails (resolver unreachable,
    /// malformed domain name).
    async fn lookup(&self, domain: &str) -> Result<Option<ZoneSerial>>;
}

/// [`SerialLookup`] that queries a DNS resolver over UDP.
#[derive(Debug, Clone)]
pub struct ResolverSerialLookup {
    resolver: SocketAddr,
}

impl ResolverSerialLookup {
    /// Create a lookup against the given resolver address.
    #[must_use]
    pub fn new(resolver: SocketAddr) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl SerialLookup for ResolverSerialLookup {
    async fn lookup(&self, domain: &str) -> Result<Option<ZoneSerial>> {
        let domain_str = domain.to_string();
        let resolver = self.resolver;

        tokio::task::spawn_blocking(move || {
            let conn = UdpClientConnection::new(resolver)
                .context("failed to create UDP connection for SOA query")?;
            let client = SyncClient::new(conn);

            let name = Name::from_str(&domain_str)
                .with_context(|| format!("invalid domain name: {domain_str}"))?;

            let response = client
                .query(&name, DNSClass::IN, RecordType::SOA)
                .with_context(|| format!("failed to query SOA record for {domain_str}"))?;

            // The zone's authoritative SOA is the last one in the answer section.
            let serial = response
                .answers()
                .iter()
                .filter_map(|record| match record.data() {
                    Some(RData::SOA(soa)) => Some(ZoneSerial::new(soa.serial())),
                    _ => None,
                })
                .last();

            Ok(serial)
        })
        .await
        .context("SOA query task failed")?
    }
}

/// Bounded fixed-interval poller for a zone's SOA serial.
pub struct SoaProber {
    lookup: Arc<dyn SerialLookup>,
    max_attempts: u32,
    poll_interval: Duration,
}

impl SoaProber {
    /// Create a prober over the given lookup transport.
    #[must_use]
    pub fn new(lookup: Arc<dyn SerialLookup>, max_attempts: u32, poll_interval: Duration) -> Self {
        Self {
            lookup,
            max_attempts,
            poll_interval,
        }
    }

    /// Poll until the zone's SOA serial is visible.
    ///
    /// Performs at most `max_attempts` lookups separated by the fixed poll
    /// interval. A lookup error counts as one attempt and is treated the
    /// same as an empty answer: the zone is not visible yet.
    ///
    /// # Errors
    ///
    /// Returns [`SoaNotFound`] once every attempt is exhausted.
    pub async fn probe(&self, domain: &str) -> Result<ZoneSerial, SoaNotFound> {
        for attempt in 1..=self.max_attempts {
            match self.lookup.lookup(domain).await {
                Ok(Some(serial)) => {
                    info!(domain, %serial, attempt, "zone SOA serial resolved");
                    return Ok(serial);
                }
                Ok(None) => {
                    info!(
                        domain,
                        attempt,
                        max_attempts = self.max_attempts,
                        "domain does not have a SOA yet, the notify will be sent later"
                    );
                }
                Err(e) => {
                    warn!(domain, attempt, error = %e, "SOA lookup failed, treating zone as not visible");
                }
            }
            if attempt < self.max_attempts {
                tokio::time::sleep(self.poll_interval).await;
            }
        }

        Err(SoaNotFound {
            domain: domain.to_string(),
            attempts: self.max_attempts,
        })
    }
}

#[cfg(test)]
#[path = "soa_tests.rs"]
mod soa_tests;
