// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use nshook::{
    cli::{Cli, Commands},
    config::HookConfig,
    constants::TOKIO_WORKER_THREADS,
    event::{HookEnvelope, HookResponse},
    reconciler::Reconciler,
    zone::{ApiBackend, FileBackend, ZoneBackend},
};
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

fn main() -> Result<()> {
    // Build Tokio runtime with custom thread names
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(TOKIO_WORKER_THREADS)
        .thread_name("nshook")
        .enable_all()
        .build()?;

    runtime.block_on(async_main())
}

async fn async_main() -> Result<()> {
    let cli = Cli::parse();

    // Completions need no config and no logging
    if let Commands::Completions { shell } = &cli.command {
        clap_complete::generate(
            *shell,
            &mut Cli::command(),
            "nshook",
            &mut std::io::stdout(),
        );
        return Ok(());
    }

    let config = HookConfig::load(&cli.config)?;
    init_logging(config.log_file.as_deref())?;

    info!("Execution started");
    debug!(config = ?cli.config, "configuration loaded");

    let desired = config.desired_records();

    let report = match &cli.command {
        Commands::Cpanel => {
            let mut raw = String::new();
            tokio::io::stdin().read_to_string(&mut raw).await?;
            let envelope = HookEnvelope::parse(&raw)?;

            let user = envelope.require_user()?;
            let domain = envelope.domain()?;
            info!(
                event = envelope.event(),
                stage = envelope.stage(),
                user,
                domain,
                "processing hook event"
            );

            let backend: Arc<dyn ZoneBackend> = Arc::new(ApiBackend::new(&config)?);
            Reconciler::new(backend, desired).reconcile(domain).await?
        }
        Commands::ZoneFile { domain } => {
            info!(domain, "processing zone-file invocation");
            let backend: Arc<dyn ZoneBackend> = Arc::new(FileBackend::new(&config));
            Reconciler::new(backend, desired).reconcile(domain).await?
        }
        Commands::Completions { .. } => unreachable!("handled above"),
    };

    info!(
        domain = %report.domain,
        committed = report.committed.len(),
        skipped = report.skipped.len(),
        "Execution completed successfully"
    );
    println!("{}", serde_json::to_string(&HookResponse::success())?);
    Ok(())
}

/// Initialize logging with custom format.
///
/// Respects `RUST_LOG` for the filter (default `info`) and `RUST_LOG_FORMAT`
/// for the stderr format (`text` or `json`). When the configuration names a
/// `log_file`, a second plain-text layer appends every event to it with a
/// timestamp prefix — that file is the run's audit trail.
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let log_format = std::env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_file(true)
                        .with_line_number(true)
                        .with_target(false)
                        .with_writer(std::io::stderr)
                        .json(),
                )
                .with(build_file_layer(log_file)?)
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_file(true)
                        .with_line_number(true)
                        .with_target(false)
                        .with_ansi(true)
                        .with_writer(std::io::stderr)
                        .compact(),
                )
                .with(build_file_layer(log_file)?)
                .init();
        }
    }

    Ok(())
}

/// Build the optional plain-text file logging layer.
///
/// Generic over the subscriber so the same layer can be attached to either the
/// JSON or text stderr pipeline, which are distinct subscriber types.
fn build_file_layer<S>(
    log_file: Option<&Path>,
) -> Result<Option<impl tracing_subscriber::Layer<S>>>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    Ok(match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(Arc::new(file)),
            )
        }
        None => None,
    })
}
