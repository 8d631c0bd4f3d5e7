#![allow(dead_code)]

use std::path::Path;

use config_watcher::config::{RawSettings, Settings};

/// Builder for `Settings` to simplify test setup.
pub struct SettingsBuilder {
    raw: RawSettings,
}

impl SettingsBuilder {
    pub fn new() -> Self {
        Self {
            raw: RawSettings::default(),
        }
    }

    pub fn watched_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.raw.watch.dir = dir.as_ref().to_string_lossy().into_owned();
        self
    }

    pub fn interval(mut self, interval: &str) -> Self {
        self.raw.watch.interval = interval.to_string();
        self
    }

    pub fn cmd(mut self, cmd: &str) -> Self {
        self.raw.process.cmd = cmd.to_string();
        self
    }

    pub fn args(mut self, args: &[&str]) -> Self {
        self.raw.process.args = args.iter().map(|a| a.to_string()).collect();
        self
    }

    /// Empty disables the metrics endpoint.
    pub fn metrics_listen(mut self, listen: &str) -> Self {
        self.raw.metrics.listen = listen.to_string();
        self
    }

    pub fn build(self) -> Settings {
        Settings::try_from(self.raw).expect("Failed to build valid settings from builder")
    }
}

impl Default for SettingsBuilder {
    fn default() -> Self {
        Self::new()
    }
}
