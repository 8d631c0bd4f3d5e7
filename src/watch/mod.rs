// src/watch/mod.rs

//! Change detection.
//!
//! - [`hash`]: per-file and aggregate BLAKE3 digests.
//! - [`fingerprint`]: concurrent, order-independent directory fingerprint.
//! - [`poller`]: timer-driven change signal delivering fingerprints over a
//!   channel.
//!
//! This is poll based on purpose; there are no filesystem push
//! notifications involved.

pub mod fingerprint;
pub mod hash;
pub mod poller;

pub use fingerprint::FingerprintEngine;
pub use hash::{compute_aggregate_hash, compute_file_hash};
pub use poller::{start_polling, FingerprintStream, CHANNEL_CAPACITY};
