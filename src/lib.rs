// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod metrics;
pub mod shutdown;
pub mod types;
pub mod watch;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::cli::CliArgs;
use crate::config::{load_settings, Settings};
use crate::engine::Orchestrator;
use crate::exec::{Supervisor, TokioProcessBackend};
use crate::fs::RealFileSystem;
use crate::metrics::{server, PrometheusMetrics};
use crate::shutdown::ShutdownSignal;
use crate::watch::{start_polling, FingerprintEngine};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - settings resolution
/// - SIGINT / SIGTERM handling (installed before anything is launched)
/// - the `/metrics` listener
/// - fingerprint engine + change signal
/// - process supervisor (initial launch failure is fatal)
/// - orchestrator loop
pub async fn run(args: CliArgs) -> Result<()> {
    info!("starting");

    let settings = load_settings(&RealFileSystem, &args)?;

    if args.dry_run {
        print_dry_run(&settings);
        return Ok(());
    }

    let shutdown = ShutdownSignal::install()?;
    let cancel = CancellationToken::new();

    let metrics = Arc::new(PrometheusMetrics::new()?);
    let metrics_task = match settings.metrics_addr {
        Some(addr) => {
            let listener = server::bind(addr).await?;
            let (metrics, cancel) = (metrics.clone(), cancel.clone());
            Some(tokio::spawn(async move {
                if let Err(err) = server::serve(listener, metrics, cancel).await {
                    error!(error = %format!("{err:#}"), "metrics endpoint stopped");
                }
            }))
        }
        None => {
            debug!("metrics endpoint disabled");
            None
        }
    };

    let engine = Arc::new(FingerprintEngine::new(
        Arc::new(RealFileSystem),
        metrics.clone(),
    ));

    // Baseline first, then launch, so a change during startup is not missed.
    let mut fingerprints = start_polling(
        engine,
        settings.watched_dir.clone(),
        settings.interval,
        cancel.clone(),
    )
    .await;
    let baseline = fingerprints
        .recv()
        .await
        .context("change signal closed before producing a baseline")?;

    let mut supervisor = Supervisor::new(settings.launch.clone(), TokioProcessBackend);
    let child = supervisor.launch()?;

    let orchestrator = Orchestrator::new(baseline, supervisor, child, metrics, cancel);
    orchestrator.run(fingerprints, shutdown.wait()).await?;

    // The orchestrator cancelled the shared token on its way out.
    if let Some(task) = metrics_task {
        let _ = task.await;
    }

    Ok(())
}

/// Simple dry-run output: print the resolved settings.
fn print_dry_run(settings: &Settings) {
    println!("config-watcher dry-run");
    println!("  watched_dir = {}", settings.watched_dir.display());
    println!("  interval    = {:?}", settings.interval);
    println!("  cmd         = {}", settings.launch.program.display());
    if !settings.launch.args.is_empty() {
        println!("  args        = {:?}", settings.launch.args);
    }
    match settings.metrics_addr {
        Some(addr) => println!("  metrics     = http://{addr}/metrics"),
        None => println!("  metrics     = disabled"),
    }

    debug!("dry-run complete (nothing launched)");
}
