// src/metrics/registry.rs

use anyhow::{anyhow, Context, Result};
use prometheus::{
    register_int_counter_with_registry, register_int_gauge_vec_with_registry, Encoder,
    IntCounter, IntGaugeVec, Registry, TextEncoder,
};

use super::MetricsSink;

const NAMESPACE: &str = "cfgw";

/// Prometheus-backed sink with its own registry.
#[derive(Clone)]
pub struct PrometheusMetrics {
    hashes_calculated: IntCounter,
    hash_updates: IntCounter,
    file_hashes: IntGaugeVec,
    process_restarts: IntCounter,
    registry: Registry,
}

impl std::fmt::Debug for PrometheusMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrometheusMetrics").finish_non_exhaustive()
    }
}

impl PrometheusMetrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let hashes_calculated = register_int_counter_with_registry!(
            format!("{NAMESPACE}_hash_calculated_total"),
            "Total number of calculated hashes.",
            registry
        )
        .map_err(|e| anyhow!("registering hash_calculated_total: {e}"))?;

        let hash_updates = register_int_counter_with_registry!(
            format!("{NAMESPACE}_hash_updates_total"),
            "Total number of updated hashes.",
            registry
        )
        .map_err(|e| anyhow!("registering hash_updates_total: {e}"))?;

        let file_hashes = register_int_gauge_vec_with_registry!(
            format!("{NAMESPACE}_file_hash"),
            "Calculated file hash in the watched directory.",
            &["file", "hash", "total_hash"],
            registry
        )
        .map_err(|e| anyhow!("registering file_hash: {e}"))?;

        let process_restarts = register_int_counter_with_registry!(
            format!("{NAMESPACE}_process_restarts_total"),
            "Total number of process restarts.",
            registry
        )
        .map_err(|e| anyhow!("registering process_restarts_total: {e}"))?;

        Ok(Self {
            hashes_calculated,
            hash_updates,
            file_hashes,
            process_restarts,
            registry,
        })
    }

    /// Text exposition of everything in the registry.
    pub fn render(&self) -> Result<String> {
        let mut buf = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buf)
            .map_err(|e| anyhow!("encoding metrics: {e}"))?;
        String::from_utf8(buf).context("metrics output is not UTF-8")
    }
}

impl MetricsSink for PrometheusMetrics {
    fn fingerprint_computed(&self) {
        self.hashes_calculated.inc();
    }

    fn file_digest(&self, file: &str, digest: &str, total: &str) {
        self.file_hashes
            .with_label_values(&[file, digest, total])
            .set(1);
    }

    fn reset_file_digests(&self) {
        self.file_hashes.reset();
    }

    fn fingerprint_changed(&self) {
        self.hash_updates.inc();
    }

    fn process_restarted(&self) {
        self.process_restarts.inc();
    }
}
