// src/watch/poller.rs

//! Poll-based change signal.
//!
//! [`start_polling`] computes one fingerprint up front and then one per tick
//! of a fixed-period timer, delivering each through a small bounded channel.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::types::Fingerprint;
use crate::watch::fingerprint::FingerprintEngine;

/// Slots in the fingerprint channel. A slow consumer lets fingerprints queue
/// up to this depth before the producer waits.
pub const CHANNEL_CAPACITY: usize = 2;

/// Receiving end of the change signal.
///
/// The stream ends (`recv` returns `None`) once the producer has observed
/// cancellation.
#[derive(Debug)]
pub struct FingerprintStream {
    rx: mpsc::Receiver<Fingerprint>,
    producer: JoinHandle<()>,
}

impl FingerprintStream {
    pub async fn recv(&mut self) -> Option<Fingerprint> {
        self.rx.recv().await
    }

    /// Non-blocking receive, mostly useful in tests.
    pub fn try_recv(&mut self) -> Option<Fingerprint> {
        self.rx.try_recv().ok()
    }

    /// Whether the producing task has exited.
    pub fn is_finished(&self) -> bool {
        self.producer.is_finished()
    }
}

/// Start polling `dir` every `period`.
///
/// The first fingerprint is computed and queued before this returns, so the
/// caller can take a baseline immediately. The producer stops (and the
/// stream closes) within one period after `cancel` fires.
pub async fn start_polling(
    engine: Arc<FingerprintEngine>,
    dir: impl Into<PathBuf>,
    period: Duration,
    cancel: CancellationToken,
) -> FingerprintStream {
    let dir = dir.into();
    let (tx, rx) = mpsc::channel::<Fingerprint>(CHANNEL_CAPACITY);

    let initial = engine.compute(&dir).await;
    info!(dir = ?dir, fingerprint = %initial, "initial fingerprint computed");
    // Fresh channel with capacity >= 1, so this cannot be full.
    if tx.try_send(initial).is_err() {
        warn!("failed to queue initial fingerprint");
    }

    let producer = tokio::spawn(poll_loop(engine, dir, period, tx, cancel));

    FingerprintStream { rx, producer }
}

async fn poll_loop(
    engine: Arc<FingerprintEngine>,
    dir: PathBuf,
    period: Duration,
    tx: mpsc::Sender<Fingerprint>,
    cancel: CancellationToken,
) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately and the initial fingerprint has
    // already been sent.
    ticker.tick().await;

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let fingerprint = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            fp = engine.compute(&dir) => fp,
        };

        if fingerprint.is_unreadable() {
            debug!(dir = ?dir, "watched dir unreadable; skipping this cycle");
            continue;
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            sent = tx.send(fingerprint) => {
                if sent.is_err() {
                    debug!("fingerprint receiver dropped");
                    break;
                }
            }
        }
    }

    debug!("stopping ticker");
}
