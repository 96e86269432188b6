// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Backend command transport.
//!
//! The control panel exposes its zone surface as executables (`whmapi1`,
//! the cache-refresh script, `systemctl`). This module isolates that
//! transport behind [`CommandRunner`] so the committer's retry logic and the
//! file backend's restart side effect are testable without spawning
//! processes.

use std::process::Stdio;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

/// Captured result of a finished backend command.
#[derive(Debug, Clone)]
pub struct CommandReply {
    /// Whether the process exited with status zero
    pub success: bool,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

/// Transport for the backend command surface.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run a command to completion and capture its output.
    ///
    /// # Errors
    ///
    /// Returns an error only when the process cannot be spawned or awaited;
    /// a non-zero exit is reported through [`CommandReply::success`] because
    /// the WHM API emits its structured reply either way.
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandReply>;

    /// Start a command without waiting for it (service restarts, cache
    /// refreshes that must not delay the hook).
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned.
    async fn spawn_detached(&self, program: &str, args: &[String]) -> Result<()>;
}

/// [`CommandRunner`] backed by `tokio::process`.
#[derive(Debug, Clone, Default)]
pub struct SystemCommandRunner;

#[async_trait]
impl CommandRunner for SystemCommandRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandReply> {
        debug!(program, ?args, "running backend command");
        let output = tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await
            .with_context(|| format!("failed to run {program}"))?;

        Ok(CommandReply {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    async fn spawn_detached(&self, program: &str, args: &[String]) -> Result<()> {
        debug!(program, ?args, "spawning detached backend command");
        tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;
        Ok(())
    }
}
