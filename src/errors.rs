// src/errors.rs

//! Crate-wide error taxonomy and `Result` alias.
//!
//! Directory and file errors are absorbed by the fingerprint engine and only
//! surface through logs. Process lifecycle errors are returned to the
//! orchestrator as explicit values.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigWatcherError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// The watched directory could not be listed for this cycle.
    #[error("watched directory {path:?} is unreadable: {reason}")]
    DirectoryUnreadable { path: PathBuf, reason: String },

    /// A single file could not be stat'ed or read for this cycle.
    #[error("failed to read {path:?}: {reason}")]
    FileReadError { path: PathBuf, reason: String },

    #[error("failed to launch '{program}': {reason}")]
    LaunchFailure { program: String, reason: String },

    #[error("failed to stop process (pid {pid:?}) for restart: {reason}")]
    RestartFailure { pid: Option<u32>, reason: String },

    #[error("invalid supervisor state: {0}")]
    InvalidState(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, ConfigWatcherError>;
