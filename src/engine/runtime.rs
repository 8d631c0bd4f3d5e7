// src/engine/runtime.rs

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::errors::Result;
use crate::exec::{ProcessBackend, ProcessHandle, Supervisor};
use crate::metrics::MetricsSink;
use crate::types::Fingerprint;
use crate::watch::FingerprintStream;

use super::core::{ChangeTracker, Decision};

/// Single-threaded decision loop.
///
/// Waits on two inputs, an external shutdown request and the fingerprint
/// stream, and restarts the supervised process whenever the fingerprint
/// changes. A restart blocks the loop until it has finished, so changes
/// arriving meanwhile simply queue in the channel.
pub struct Orchestrator<B: ProcessBackend> {
    tracker: ChangeTracker,
    supervisor: Supervisor<B>,
    child: Option<ProcessHandle<B::Child>>,
    metrics: Arc<dyn MetricsSink>,
    cancel: CancellationToken,
}

impl<B: ProcessBackend> fmt::Debug for Orchestrator<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator")
            .field("tracker", &self.tracker)
            .field("state", &self.supervisor.state())
            .finish_non_exhaustive()
    }
}

impl<B: ProcessBackend> Orchestrator<B> {
    /// `baseline` must be the first fingerprint of the stream and `child`
    /// the instance launched after it was taken.
    pub fn new(
        baseline: Fingerprint,
        supervisor: Supervisor<B>,
        child: ProcessHandle<B::Child>,
        metrics: Arc<dyn MetricsSink>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            tracker: ChangeTracker::new(baseline),
            supervisor,
            child: Some(child),
            metrics,
            cancel,
        }
    }

    /// Run until `shutdown` resolves or the stream closes.
    ///
    /// On shutdown the producer is cancelled and the supervised process is
    /// stopped before returning, so no child outlives the loop.
    pub async fn run<S>(mut self, mut fingerprints: FingerprintStream, shutdown: S) -> Result<()>
    where
        S: Future<Output = ()> + Send,
    {
        info!(fingerprint = %self.tracker.current(), "orchestrator started");
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("shutdown requested");
                    break;
                }
                next = fingerprints.recv() => {
                    match next {
                        Some(fp) => self.on_fingerprint(fp).await,
                        None => {
                            warn!("fingerprint stream closed; exiting");
                            break;
                        }
                    }
                }
            }
        }

        self.cancel.cancel();
        if let Err(err) = self.supervisor.stop(self.child.take()).await {
            error!(error = %err, "failed to stop supervised process during shutdown");
        }

        info!("exiting");
        Ok(())
    }

    async fn on_fingerprint(&mut self, fingerprint: Fingerprint) {
        let (previous, current) = match self.tracker.observe(fingerprint) {
            Decision::Unchanged => {
                debug!(fingerprint = %self.tracker.current(), "fingerprint unchanged");
                return;
            }
            Decision::Changed { previous, current } => (previous, current),
        };

        info!(old_hash = %previous, new_hash = %current, "total hash changed");
        self.metrics.fingerprint_changed();
        self.metrics.process_restarted();
        self.metrics.reset_file_digests();

        let outcome = match self.child.take() {
            Some(child) => self.supervisor.restart(Some(child)).await,
            None => {
                warn!("no supervised process running; launching a fresh instance");
                self.supervisor.launch()
            }
        };

        match outcome {
            Ok(child) => self.child = Some(child),
            Err(err) => {
                error!(error = %err, "process restart failed; will retry on next change");
            }
        }
    }
}
