// src/config/mod.rs

//! Settings resolution: TOML model, loading, CLI overrides and validation.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{apply_cli_overrides, load_from_path, load_settings};
pub use model::{MetricsSection, ProcessSection, RawSettings, Settings, WatchSection};
pub use validate::{parse_duration, parse_listen_addr};
