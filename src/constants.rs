// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for the nshook binary.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// Configuration Constants
// ============================================================================

/// Default path of the hook configuration file
pub const DEFAULT_CONFIG_PATH: &str = "/etc/nshook.yaml";

/// Default TTL for committed NS records (1 day)
pub const DEFAULT_RECORD_TTL_SECS: u32 = 86400;

/// Default number of SOA poll attempts before giving up on a zone
pub const DEFAULT_SOA_POLL_ATTEMPTS: u32 = 15;

/// Fixed sleep between SOA poll attempts (seconds)
pub const SOA_POLL_INTERVAL_SECS: u64 = 1;

/// Default local resolver queried for the zone's SOA serial
pub const DEFAULT_RESOLVER_ADDR: &str = "127.0.0.1:53";

/// Default directory holding flat zone files (file backend)
pub const DEFAULT_ZONE_DIR: &str = "/var/named";

// ============================================================================
// DNS Protocol Constants
// ============================================================================

/// Record type committed by the hook
pub const NS_RECORD_TYPE: &str = "NS";

/// Filename suffix of flat zone files under the zone directory
pub const ZONE_FILE_SUFFIX: &str = ".db";

// ============================================================================
// Commit Retry Constants
// ============================================================================

/// Maximum commit attempts per nameserver while the zone serial keeps conflicting
pub const MAX_COMMIT_ATTEMPTS: u32 = 10;

/// Substring of a rejected update's reason that identifies a serial conflict
pub const SERIAL_CONFLICT_MARKER: &str = "serial number";

// ============================================================================
// Control Panel Command Surface
// ============================================================================

/// WHM API binary used for zone dumps and zone edits
pub const WHMAPI_BIN: &str = "/usr/local/cpanel/bin/whmapi1";

/// Control panel script that refreshes the domain cache after a run
pub const CACHE_REFRESH_BIN: &str = "/usr/local/cpanel/scripts/updateuserdomains";

/// Service manager binary used to restart the DNS server (file backend)
pub const SERVICE_MANAGER_BIN: &str = "systemctl";

/// Name of the DNS service restarted after a zone-file append
pub const DNS_SERVICE_NAME: &str = "named";

/// Per-record delimiter token in `whmapi1 dumpzone` output
pub const DUMP_RECORD_DELIMITER: &str = "Line:";

// ============================================================================
// Hook Event Constants
// ============================================================================

/// Account creation event (domain in `data.domain`)
pub const EVENT_ACCOUNT_CREATE: &str = "Accounts::Create";

/// Add-on domain event (domain in `data.args.newdomain` or `data.args.domain`)
pub const EVENT_ADDON_DOMAIN: &str = "Api2::AddonDomain::addaddondomain";

/// Parked domain event (domain in `data.args.newdomain` or `data.args.domain`)
pub const EVENT_PARK_DOMAIN: &str = "Api2::Park::park";

/// Message emitted on stdout when the hook completes successfully
pub const HOOK_SUCCESS_MESSAGE: &str = "Hook executed successfully";

// ============================================================================
// Runtime Constants
// ============================================================================

/// Number of worker threads for Tokio runtime
pub const TOKIO_WORKER_THREADS: usize = 4;
