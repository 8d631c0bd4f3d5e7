// src/config/loader.rs

use std::path::Path;

use crate::cli::CliArgs;
use crate::config::model::{RawSettings, Settings};
use crate::errors::Result;
use crate::fs::FileSystem;

/// Load a TOML config file and return the raw, unvalidated settings.
pub fn load_from_path(fs: &dyn FileSystem, path: impl AsRef<Path>) -> Result<RawSettings> {
    let contents = fs.read_to_string(path.as_ref())?;
    let raw: RawSettings = toml::from_str(&contents)?;
    Ok(raw)
}

/// Overlay CLI flags on top of file/default settings. Flags win.
pub fn apply_cli_overrides(mut raw: RawSettings, args: &CliArgs) -> RawSettings {
    if let Some(ref cmd) = args.cmdline {
        raw.process.cmd = cmd.clone();
    }
    if !args.args.is_empty() {
        raw.process.args = args.args.clone();
    }
    if let Some(ref dir) = args.watched_dir {
        raw.watch.dir = dir.clone();
    }
    if let Some(ref interval) = args.interval {
        raw.watch.interval = interval.clone();
    }
    if let Some(ref listen) = args.metrics_addr {
        raw.metrics.listen = listen.clone();
    }
    raw
}

/// Resolve the effective settings: built-in defaults, then the optional
/// `--config` file, then CLI flags, then validation.
pub fn load_settings(fs: &dyn FileSystem, args: &CliArgs) -> Result<Settings> {
    let raw = match args.config {
        Some(ref path) => load_from_path(fs, path)?,
        None => RawSettings::default(),
    };

    Settings::try_from(apply_cli_overrides(raw, args))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use super::*;
    use crate::errors::ConfigWatcherError;
    use crate::fs::mock::MockFileSystem;

    #[test]
    fn file_values_fill_in_and_flags_override() {
        let fs = MockFileSystem::new();
        fs.add_file(
            "cw.toml",
            r#"
            [watch]
            dir = "/etc/app/"
            interval = "500ms"

            [process]
            cmd = "/usr/bin/app"
            args = ["--config", "/etc/app/app.conf"]
            "#,
        );

        let args = CliArgs {
            config: Some("cw.toml".to_string()),
            interval: Some("2s".to_string()),
            ..CliArgs::default()
        };

        let settings = load_settings(&fs, &args).unwrap();
        assert_eq!(settings.watched_dir, PathBuf::from("/etc/app"));
        assert_eq!(settings.interval, Duration::from_secs(2));
        assert_eq!(settings.launch.program, PathBuf::from("/usr/bin/app"));
        assert_eq!(settings.launch.args, vec!["--config", "/etc/app/app.conf"]);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let fs = MockFileSystem::new();
        fs.add_file("cw.toml", "[process]\ncmd = \"/bin/app\"\n");

        let args = CliArgs {
            config: Some("cw.toml".to_string()),
            ..CliArgs::default()
        };

        let settings = load_settings(&fs, &args).unwrap();
        assert_eq!(settings.watched_dir, PathBuf::from("/fluent-bit/etc"));
        assert_eq!(settings.launch.args, vec!["-c", "/fluent-bit/etc/fluent-bit.conf"]);
    }

    #[test]
    fn metrics_listener_can_be_moved_or_disabled() {
        let fs = MockFileSystem::new();
        fs.add_file("cw.toml", "[metrics]\nlisten = \"127.0.0.1:9100\"\n");

        let mut args = CliArgs {
            config: Some("cw.toml".to_string()),
            ..CliArgs::default()
        };
        let settings = load_settings(&fs, &args).unwrap();
        assert_eq!(settings.metrics_addr, Some("127.0.0.1:9100".parse().unwrap()));

        args.metrics_addr = Some(String::new());
        let settings = load_settings(&fs, &args).unwrap();
        assert_eq!(settings.metrics_addr, None);
    }

    #[test]
    fn malformed_toml_is_reported() {
        let fs = MockFileSystem::new();
        fs.add_file("cw.toml", "[watch\ndir = 1");

        let args = CliArgs {
            config: Some("cw.toml".to_string()),
            ..CliArgs::default()
        };

        assert!(matches!(
            load_settings(&fs, &args),
            Err(ConfigWatcherError::TomlError(_))
        ));
    }

    #[test]
    fn missing_file_is_an_error() {
        let fs = MockFileSystem::new();
        let args = CliArgs {
            config: Some("nope.toml".to_string()),
            ..CliArgs::default()
        };

        assert!(load_settings(&fs, &args).is_err());
    }
}
