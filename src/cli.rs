// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Command-line interface.
//!
//! One subcommand per deployment variant:
//!
//! - `nshook cpanel` — standardized-hook mode; the event envelope arrives as
//!   JSON on stdin and the zone is edited through the WHM API.
//! - `nshook zone-file <domain>` — zone-file mode; the panel passes the
//!   domain as a positional argument and the flat zone file is edited
//!   directly.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use crate::constants::DEFAULT_CONFIG_PATH;

/// NS record reconciliation hook for hosting control panels.
#[derive(Debug, Parser)]
#[command(name = "nshook", version, about, long_about = None)]
pub struct Cli {
    /// Path of the hook configuration file
    #[arg(long, global = true, value_name = "PATH", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

/// Deployment variants and utilities.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run as a cPanel standardized hook (event envelope on stdin)
    Cpanel,

    /// Run against a flat zone file for a single domain
    ZoneFile {
        /// Domain whose zone file is reconciled
        domain: String,
    },

    /// Generate shell completions on stdout
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}
