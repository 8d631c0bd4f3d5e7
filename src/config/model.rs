// src/config/model.rs

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::exec::LaunchSpec;

pub const DEFAULT_CMD: &str = "/fluent-bit/bin/fluent-bit";
pub const DEFAULT_WATCHED_DIR: &str = "/fluent-bit/etc";
pub const DEFAULT_INTERVAL: &str = "3s";
pub const DEFAULT_METRICS_LISTEN: &str = ":8888";

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [watch]
/// dir = "/fluent-bit/etc"
/// interval = "3s"
///
/// [process]
/// cmd = "/fluent-bit/bin/fluent-bit"
/// args = ["-c", "/fluent-bit/etc/fluent-bit.conf"]
///
/// [metrics]
/// listen = ":8888"
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSettings {
    #[serde(default)]
    pub watch: WatchSection,

    #[serde(default)]
    pub process: ProcessSection,

    #[serde(default)]
    pub metrics: MetricsSection,
}

/// `[watch]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchSection {
    /// Directory whose direct regular files are fingerprinted.
    #[serde(default = "default_dir")]
    pub dir: String,

    /// Poll interval, e.g. `"3s"`, `"500ms"`, `"1m"`.
    #[serde(default = "default_interval")]
    pub interval: String,
}

fn default_dir() -> String {
    DEFAULT_WATCHED_DIR.to_string()
}

fn default_interval() -> String {
    DEFAULT_INTERVAL.to_string()
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            interval: default_interval(),
        }
    }
}

/// `[process]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessSection {
    /// Executable to launch.
    #[serde(default = "default_cmd")]
    pub cmd: String,

    /// Fixed argument vector.
    #[serde(default = "default_args")]
    pub args: Vec<String>,
}

fn default_cmd() -> String {
    DEFAULT_CMD.to_string()
}

fn default_args() -> Vec<String> {
    vec!["-c".to_string(), "/fluent-bit/etc/fluent-bit.conf".to_string()]
}

impl Default for ProcessSection {
    fn default() -> Self {
        Self {
            cmd: default_cmd(),
            args: default_args(),
        }
    }
}

/// `[metrics]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSection {
    /// Address serving `/metrics`; `":port"` binds all interfaces and an
    /// empty string turns the endpoint off.
    #[serde(default = "default_metrics_listen")]
    pub listen: String,
}

fn default_metrics_listen() -> String {
    DEFAULT_METRICS_LISTEN.to_string()
}

impl Default for MetricsSection {
    fn default() -> Self {
        Self {
            listen: default_metrics_listen(),
        }
    }
}

/// Validated runtime settings.
///
/// Build via `Settings::try_from(RawSettings)` (see `validate.rs`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub watched_dir: PathBuf,
    pub interval: Duration,
    pub launch: LaunchSpec,
    pub metrics_addr: Option<SocketAddr>,
}

impl Settings {
    pub(crate) fn new_unchecked(
        watched_dir: PathBuf,
        interval: Duration,
        launch: LaunchSpec,
        metrics_addr: Option<SocketAddr>,
    ) -> Self {
        Self {
            watched_dir,
            interval,
            launch,
            metrics_addr,
        }
    }
}
