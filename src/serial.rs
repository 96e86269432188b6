// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Zone serial arithmetic.
//!
//! DNS zone serials are 32-bit counters compared with RFC 1982 serial
//! arithmetic. The WHM update command takes the caller's view of the serial
//! and rejects the edit when it no longer matches the zone, so the committer
//! advances a local copy between attempts. This module keeps that counter
//! bounded: parsing rejects anything that does not fit 32 bits, and
//! incrementing wraps modulo 2^32 instead of promoting to a wider integer.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Maximum number of decimal digits in a 32-bit serial
const MAX_SERIAL_DIGITS: usize = 10;

/// A zone's SOA serial number.
///
/// # Examples
///
/// ```
/// use nshook::serial::ZoneSerial;
///
/// let serial: ZoneSerial = "2024010101".parse().unwrap();
/// assert_eq!(serial.value(), 2_024_010_101);
/// assert_eq!(serial.next().value(), 2_024_010_102);
///
/// // Wraparound is modular, not widening
/// assert_eq!(ZoneSerial::new(u32::MAX).next().value(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ZoneSerial(u32);

impl ZoneSerial {
    /// Create a serial from a raw 32-bit value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// The raw 32-bit value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// The serial one step ahead, wrapping modulo 2^32 (RFC 1982).
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for ZoneSerial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ZoneSerial {
    type Err = SerialParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(SerialParseError::Empty);
        }
        if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(SerialParseError::NonNumeric {
                value: trimmed.to_string(),
            });
        }
        if trimmed.len() > MAX_SERIAL_DIGITS {
            return Err(SerialParseError::OutOfRange {
                value: trimmed.to_string(),
            });
        }
        trimmed
            .parse::<u32>()
            .map(Self)
            .map_err(|_| SerialParseError::OutOfRange {
                value: trimmed.to_string(),
            })
    }
}

/// Errors produced when decoding a serial from backend output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerialParseError {
    /// The serial field was empty
    #[error("serial number is empty")]
    Empty,

    /// The serial field contained non-digit characters
    #[error("serial number '{value}' is not numeric")]
    NonNumeric {
        /// The offending value
        value: String,
    },

    /// The serial field does not fit a 32-bit counter
    #[error("serial number '{value}' does not fit 32 bits")]
    OutOfRange {
        /// The offending value
        value: String,
    },
}
