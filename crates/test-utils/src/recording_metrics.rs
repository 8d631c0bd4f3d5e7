use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use config_watcher::metrics::MetricsSink;

/// A metrics sink that counts every event, for assertions in tests.
#[derive(Debug, Default)]
pub struct RecordingMetrics {
    computed: AtomicUsize,
    changed: AtomicUsize,
    restarts: AtomicUsize,
    resets: AtomicUsize,
    /// Current per-file gauges: (file, digest, total).
    files: Mutex<Vec<(String, String, String)>>,
}

impl RecordingMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn computed(&self) -> usize {
        self.computed.load(Ordering::SeqCst)
    }

    pub fn changed(&self) -> usize {
        self.changed.load(Ordering::SeqCst)
    }

    pub fn restarts(&self) -> usize {
        self.restarts.load(Ordering::SeqCst)
    }

    pub fn resets(&self) -> usize {
        self.resets.load(Ordering::SeqCst)
    }

    pub fn file_events(&self) -> Vec<(String, String, String)> {
        self.files.lock().unwrap().clone()
    }
}

impl MetricsSink for RecordingMetrics {
    fn fingerprint_computed(&self) {
        self.computed.fetch_add(1, Ordering::SeqCst);
    }

    fn file_digest(&self, file: &str, digest: &str, total: &str) {
        self.files
            .lock()
            .unwrap()
            .push((file.to_string(), digest.to_string(), total.to_string()));
    }

    fn reset_file_digests(&self) {
        self.resets.fetch_add(1, Ordering::SeqCst);
        self.files.lock().unwrap().clear();
    }

    fn fingerprint_changed(&self) {
        self.changed.fetch_add(1, Ordering::SeqCst);
    }

    fn process_restarted(&self) {
        self.restarts.fetch_add(1, Ordering::SeqCst);
    }
}
