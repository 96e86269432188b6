// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Hook event envelope parsing and dispatch.
//!
//! The control panel invokes the hook with a JSON envelope on stdin:
//!
//! ```json
//! {
//!   "context": { "event": "Accounts::Create", "stage": "post" },
//!   "data": { "user": "alice", "domain": "example.com" }
//! }
//! ```
//!
//! Three events are recognized. Account creation carries the domain in
//! `data.domain`; the add-on and park events carry it in
//! `data.args.newdomain`, falling back to `data.args.domain`. Anything else
//! is a fatal input error — the hook must not touch DNS for events it does
//! not understand.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    EVENT_ACCOUNT_CREATE, EVENT_ADDON_DOMAIN, EVENT_PARK_DOMAIN, HOOK_SUCCESS_MESSAGE,
};

/// Errors raised while decoding the event envelope, before any DNS work.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    /// The input was not a valid JSON envelope
    #[error("failed to decode hook input envelope: {reason}")]
    InvalidEnvelope {
        /// Decoder error text
        reason: String,
    },

    /// The username was not found in the input data
    #[error("the username was not found in the input data")]
    MissingUser,

    /// The event was recognized but carried no domain
    #[error("domain name was not found in the input data for event '{event}'")]
    MissingDomain {
        /// The event that was being processed
        event: String,
    },

    /// The event is not one this hook handles
    #[error("unexpected event: '{event}'")]
    UnexpectedEvent {
        /// The offending event name
        event: String,
    },
}

/// The `context` object of the hook envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventContext {
    /// Event name, e.g. `Accounts::Create`
    #[serde(default)]
    pub event: String,
    /// Hook stage, e.g. `post`
    #[serde(default)]
    pub stage: String,
}

/// Event-specific arguments nested under `data.args`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventArgs {
    /// Domain argument of the add-on/park API calls
    #[serde(default)]
    pub domain: Option<String>,
    /// New-domain argument, preferred over `domain` when both are present
    #[serde(default)]
    pub newdomain: Option<String>,
}

/// The `data` object of the hook envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventData {
    /// Account owning the domain
    #[serde(default)]
    pub user: Option<String>,
    /// Domain for account-level events
    #[serde(default)]
    pub domain: Option<String>,
    /// Arguments for API-level events
    #[serde(default)]
    pub args: Option<EventArgs>,
}

/// The full hook input envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HookEnvelope {
    /// Event context
    #[serde(default)]
    pub context: EventContext,
    /// Event payload
    #[serde(default)]
    pub data: EventData,
}

impl HookEnvelope {
    /// Decode an envelope from the raw stdin payload.
    ///
    /// Empty input decodes to an empty envelope, which then fails event
    /// dispatch with [`EventError::UnexpectedEvent`] — the panel sometimes
    /// invokes hooks with no payload at all, and that must not be treated
    /// as a decoder crash.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::InvalidEnvelope`] if the payload is present but
    /// not valid JSON.
    pub fn parse(raw: &str) -> Result<Self, EventError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(trimmed).map_err(|e| EventError::InvalidEnvelope {
            reason: e.to_string(),
        })
    }

    /// The event name.
    #[must_use]
    pub fn event(&self) -> &str {
        &self.context.event
    }

    /// The hook stage.
    #[must_use]
    pub fn stage(&self) -> &str {
        &self.context.stage
    }

    /// The account name, required for every recognized event.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::MissingUser`] if the field is absent or empty.
    pub fn require_user(&self) -> Result<&str, EventError> {
        match self.data.user.as_deref() {
            Some(user) if !user.is_empty() => Ok(user),
            _ => Err(EventError::MissingUser),
        }
    }

    /// Resolve the domain this event targets.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::UnexpectedEvent`] for events this hook does not
    /// handle and [`EventError::MissingDomain`] when a recognized event
    /// carries no domain.
    pub fn domain(&self) -> Result<&str, EventError> {
        let event = self.event();
        let domain = match event {
            EVENT_ACCOUNT_CREATE => self.data.domain.as_deref(),
            EVENT_ADDON_DOMAIN | EVENT_PARK_DOMAIN => self
                .data
                .args
                .as_ref()
                .and_then(|args| args.newdomain.as_deref().or(args.domain.as_deref())),
            _ => {
                return Err(EventError::UnexpectedEvent {
                    event: event.to_string(),
                })
            }
        };
        match domain {
            Some(domain) if !domain.is_empty() => Ok(domain),
            _ => Err(EventError::MissingDomain {
                event: event.to_string(),
            }),
        }
    }
}

/// The JSON object written to stdout when the hook succeeds.
///
/// On any propagated error the process exits non-zero and nothing is written
/// to stdout — callers treat the presence of this object as the success
/// signal.
#[derive(Debug, Clone, Serialize)]
pub struct HookResponse {
    /// 0 on success
    pub result: i32,
    /// Human-readable completion message
    pub message: String,
}

impl HookResponse {
    /// The canonical success response.
    #[must_use]
    pub fn success() -> Self {
        Self {
            result: 0,
            message: HOOK_SUCCESS_MESSAGE.to_string(),
        }
    }
}
