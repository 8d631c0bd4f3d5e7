// src/metrics/mod.rs

//! Metrics sink consumed by the fingerprint engine and the orchestrator.
//!
//! The core only pushes counter/gauge events through [`MetricsSink`]; how
//! they are exported is up to the implementation. [`PrometheusMetrics`] keeps
//! them in a private `prometheus` registry, which `server` exposes over HTTP.

pub mod registry;
pub mod server;

pub use registry::PrometheusMetrics;

/// Receiver of observability events.
pub trait MetricsSink: Send + Sync {
    /// One full directory fingerprint was computed.
    fn fingerprint_computed(&self);

    /// A file contributed `digest` to the fingerprint `total`.
    fn file_digest(&self, file: &str, digest: &str, total: &str);

    /// Forget all per-file digest state.
    fn reset_file_digests(&self);

    /// The directory fingerprint differs from the last known one.
    fn fingerprint_changed(&self);

    /// A restart of the supervised process is about to be attempted.
    fn process_restarted(&self);
}

/// Sink that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMetrics;

impl MetricsSink for NoopMetrics {
    fn fingerprint_computed(&self) {}
    fn file_digest(&self, _file: &str, _digest: &str, _total: &str) {}
    fn reset_file_digests(&self) {}
    fn fingerprint_changed(&self) {}
    fn process_restarted(&self) {}
}
