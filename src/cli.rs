// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `config-watcher`.
///
/// Every setting is optional here; unset flags fall back to the config
/// file (if any) and then to built-in defaults.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "config-watcher",
    version,
    about = "Restart a companion process when files in a watched directory change.",
    long_about = None
)]
pub struct CliArgs {
    /// Optional TOML config file.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Executable of the supervised process, e.g. /fluent-bit/bin/fluent-bit.
    #[arg(short = 'c', long = "cmdline", value_name = "PATH")]
    pub cmdline: Option<String>,

    /// Watched directory, e.g. /fluent-bit/etc.
    #[arg(short = 'w', long = "watched-dir", alias = "watchedDir", value_name = "DIR")]
    pub watched_dir: Option<String>,

    /// Poll interval such as "3s", "500ms" or "1m".
    #[arg(long, value_name = "DURATION")]
    pub interval: Option<String>,

    /// Argument passed to the supervised process. Repeat for several; when
    /// given, replaces the configured argument list.
    #[arg(long = "arg", value_name = "ARG", allow_hyphen_values = true)]
    pub args: Vec<String>,

    /// Address serving Prometheus metrics on `/metrics`, e.g. ":8888".
    /// An empty value disables the endpoint.
    #[arg(long = "metrics-addr", value_name = "ADDR")]
    pub metrics_addr: Option<String>,

    /// Shorthand for `--log-level debug`.
    #[arg(short = 'd', long)]
    pub debug: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `--debug`, `CONFIG_WATCHER_LOG` or a default level will be
    /// used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve and print settings, but don't launch or watch anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
