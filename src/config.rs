// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Hook configuration.
//!
//! Loaded once per invocation from a YAML file and passed explicitly into
//! the orchestrator and downward — no global state. A missing or invalid
//! file aborts the run before any DNS work.
//!
//! ```yaml
//! soa_timeout: 15
//! ttl: 86400
//! nameservers: "ns1.example.com,ns2.example.com"
//! resolver: "127.0.0.1:53"
//! zone_dir: "/var/named"
//! log_file: "/var/log/nshook.log"
//! ```

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::constants::{
    DEFAULT_RECORD_TTL_SECS, DEFAULT_RESOLVER_ADDR, DEFAULT_SOA_POLL_ATTEMPTS, DEFAULT_ZONE_DIR,
    NS_RECORD_TYPE,
};
use crate::zone::record::DesiredRecordSet;

/// Errors raised while loading the configuration file.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// The configuration file does not exist
    #[error("config file not found at {}", .path.display())]
    NotFound {
        /// Path that was probed
        path: PathBuf,
    },

    /// The configuration file exists but could not be read
    #[error("failed to read config file {}: {reason}", .path.display())]
    Unreadable {
        /// Path that failed
        path: PathBuf,
        /// Underlying I/O error text
        reason: String,
    },

    /// The configuration file is not valid YAML or holds invalid values
    #[error("invalid config file {}: {reason}", .path.display())]
    Invalid {
        /// Path that failed
        path: PathBuf,
        /// Decoder or validation error text
        reason: String,
    },

    /// The configured resolver is not an `ip:port` address
    #[error("resolver '{value}' is not an ip:port address: {reason}")]
    InvalidResolver {
        /// Configured resolver value
        value: String,
        /// Parser error text
        reason: String,
    },
}

/// Resolved hook configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct HookConfig {
    /// Maximum SOA poll attempts before the run fails
    #[serde(default = "default_soa_timeout")]
    pub soa_timeout: u32,

    /// TTL applied to committed NS records (and matched during diffing)
    #[serde(default = "default_ttl")]
    pub ttl: u32,

    /// Comma-separated nameserver host list; sanitized before use
    #[serde(default)]
    pub nameservers: String,

    /// Resolver queried for the zone's SOA serial
    #[serde(default = "default_resolver")]
    pub resolver: String,

    /// Directory holding flat zone files (file backend)
    #[serde(default = "default_zone_dir")]
    pub zone_dir: PathBuf,

    /// Append-only run log; no file logging when unset
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

fn default_soa_timeout() -> u32 {
    DEFAULT_SOA_POLL_ATTEMPTS
}

fn default_ttl() -> u32 {
    DEFAULT_RECORD_TTL_SECS
}

fn default_resolver() -> String {
    DEFAULT_RESOLVER_ADDR.to_string()
}

fn default_zone_dir() -> PathBuf {
    PathBuf::from(DEFAULT_ZONE_DIR)
}

impl HookConfig {
    /// Load the configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file is missing, unreadable or not
    /// valid YAML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        serde_yaml::from_str(&raw).map_err(|e| ConfigError::Invalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// The configured nameservers, sanitized.
    ///
    /// Strips every character outside `[A-Za-z0-9.,-]` from the configured
    /// string, splits on commas and discards empty entries, so a trailing
    /// comma or a fully-filtered entry never turns into an empty record
    /// target.
    #[must_use]
    pub fn sanitized_nameservers(&self) -> Vec<String> {
        let cleaned: String = self
            .nameservers
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | ',' | '-'))
            .collect();
        cleaned
            .split(',')
            .filter(|entry| !entry.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Build the desired NS record set for one run.
    #[must_use]
    pub fn desired_records(&self) -> DesiredRecordSet {
        DesiredRecordSet {
            nameservers: self.sanitized_nameservers(),
            ttl: self.ttl,
            record_type: NS_RECORD_TYPE.to_string(),
        }
    }

    /// The resolver address as a socket address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidResolver`] if the configured value does
    /// not parse as `ip:port`.
    pub fn resolver_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.resolver
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidResolver {
                value: self.resolver.clone(),
                reason: e.to_string(),
            })
    }
}
