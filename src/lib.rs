// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! # nshook - Nameserver Reconciliation Hook
//!
//! nshook is a hook binary for hosting control panels that ensures a
//! configured, fixed set of NS records exists in a domain's DNS zone
//! whenever the panel creates or reassigns a domain — idempotently, against
//! a live zone that other writers mutate concurrently.
//!
//! ## Overview
//!
//! One invocation reconciles one domain:
//!
//! 1. Poll the local resolver until the zone's SOA serial is visible
//!    (API backend only — a freshly created zone may not be authoritative
//!    yet).
//! 2. Read the zone's current records through the active backend.
//! 3. Diff the configured nameservers against the records that already
//!    exist, so nothing is ever committed twice.
//! 4. Commit each missing record, contending with the zone-editing API's
//!    serial-conflict protocol under a bounded retry.
//!
//! ## Modules
//!
//! - [`cli`] - Command-line interface (one subcommand per deployment variant)
//! - [`config`] - Hook configuration, loaded once and passed down
//! - [`event`] - Hook event envelope parsing and dispatch
//! - [`reconciler`] - Orchestration and the desired-minus-existing diff
//! - [`zone`] - Zone backends (WHM API and flat zone file), parsers, SOA probing
//! - [`serial`] - Bounded zone-serial arithmetic
//! - [`command`] - Backend command transport
//! - [`dns_errors`] - Error taxonomy and propagation policy
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use nshook::config::HookConfig;
//! use nshook::reconciler::Reconciler;
//! use nshook::zone::{FileBackend, ZoneBackend};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = HookConfig::load(std::path::Path::new("/etc/nshook.yaml"))?;
//! let backend: Arc<dyn ZoneBackend> = Arc::new(FileBackend::new(&config));
//!
//! let report = Reconciler::new(backend, config.desired_records())
//!     .reconcile("example.com")
//!     .await?;
//! println!("committed {} nameservers", report.committed.len());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod command;
pub mod config;
pub mod constants;
pub mod dns_errors;
pub mod event;
pub mod reconciler;
pub mod serial;
pub mod zone;
