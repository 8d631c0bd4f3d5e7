// src/shutdown.rs

//! OS shutdown signals (SIGINT and, on unix, SIGTERM).

use anyhow::Result;
use tracing::info;

/// Shutdown listeners that are registered at construction time.
///
/// Create it before launching the supervised process: once installed, a
/// signal is queued for [`ShutdownSignal::wait`] instead of taking the
/// default action and killing us with the child still running.
#[derive(Debug)]
pub struct ShutdownSignal {
    #[cfg(unix)]
    interrupt: tokio::signal::unix::Signal,
    #[cfg(unix)]
    terminate: tokio::signal::unix::Signal,
}

impl ShutdownSignal {
    #[cfg(unix)]
    pub fn install() -> Result<Self> {
        use anyhow::Context;
        use tokio::signal::unix::{signal, SignalKind};

        let interrupt =
            signal(SignalKind::interrupt()).context("installing SIGINT handler")?;
        let terminate =
            signal(SignalKind::terminate()).context("installing SIGTERM handler")?;
        Ok(Self {
            interrupt,
            terminate,
        })
    }

    #[cfg(not(unix))]
    pub fn install() -> Result<Self> {
        Ok(Self {})
    }

    /// Resolve on the first signal received.
    #[cfg(unix)]
    pub async fn wait(mut self) {
        tokio::select! {
            _ = self.interrupt.recv() => info!(signal = "SIGINT", "signal received"),
            _ = self.terminate.recv() => info!(signal = "SIGTERM", "signal received"),
        }
    }

    #[cfg(not(unix))]
    pub async fn wait(self) {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!(signal = "SIGINT", "signal received"),
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
        }
    }
}
