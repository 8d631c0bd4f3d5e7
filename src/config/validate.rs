// src/config/validate.rs

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::model::{RawSettings, Settings};
use crate::errors::{ConfigWatcherError, Result};
use crate::exec::LaunchSpec;

impl TryFrom<RawSettings> for Settings {
    type Error = ConfigWatcherError;

    fn try_from(raw: RawSettings) -> std::result::Result<Self, Self::Error> {
        let cmd = raw.process.cmd.trim();
        if cmd.is_empty() {
            return Err(ConfigWatcherError::ConfigError(
                "[process].cmd must not be empty".to_string(),
            ));
        }

        let watched_dir = normalize_dir(&raw.watch.dir)?;
        let interval = parse_duration(&raw.watch.interval).map_err(|e| {
            ConfigWatcherError::ConfigError(format!("[watch].interval: {e}"))
        })?;
        if interval.is_zero() {
            return Err(ConfigWatcherError::ConfigError(
                "[watch].interval must be greater than zero".to_string(),
            ));
        }

        let metrics_addr = parse_listen_addr(&raw.metrics.listen).map_err(|e| {
            ConfigWatcherError::ConfigError(format!("[metrics].listen: {e}"))
        })?;

        Ok(Settings::new_unchecked(
            watched_dir,
            interval,
            LaunchSpec::new(cmd, raw.process.args),
            metrics_addr,
        ))
    }
}

/// Trim whitespace and trailing slashes (keeping a bare `/`).
fn normalize_dir(dir: &str) -> Result<PathBuf> {
    let trimmed = dir.trim();
    if trimmed.is_empty() {
        return Err(ConfigWatcherError::ConfigError(
            "[watch].dir must not be empty".to_string(),
        ));
    }

    let without_slash = trimmed.trim_end_matches('/');
    if without_slash.is_empty() {
        Ok(PathBuf::from("/"))
    } else {
        Ok(PathBuf::from(without_slash))
    }
}

/// Parse a simple duration string like `"3s"`, `"250ms"`, `"1m"`, `"2h"`.
pub fn parse_duration(s: &str) -> std::result::Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    // Find the boundary between digits and suffix.
    let idx = s
        .chars()
        .position(|c| !c.is_ascii_digit())
        .ok_or_else(|| "duration missing unit suffix".to_string())?;

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| format!("invalid duration number '{}': {}", num_part, e))?;
    let unit = unit_part.trim().to_lowercase();

    let secs_per_unit = match unit.as_str() {
        "ms" => return Ok(Duration::from_millis(value)),
        "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        _ => {
            return Err(format!(
                "unsupported duration unit '{}'; expected ms, s, m, or h",
                unit
            ))
        }
    };

    value
        .checked_mul(secs_per_unit)
        .map(Duration::from_secs)
        .ok_or_else(|| format!("duration '{}' is too large", s))
}

/// Parse a listen address. A bare `:port` binds every interface; an empty
/// string disables the listener.
pub fn parse_listen_addr(s: &str) -> std::result::Result<Option<SocketAddr>, String> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(None);
    }

    let full = if s.starts_with(':') {
        format!("0.0.0.0{s}")
    } else {
        s.to_string()
    };
    full.parse::<SocketAddr>()
        .map(Some)
        .map_err(|e| format!("invalid listen address '{}': {}", s, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supported_units() {
        assert_eq!(parse_duration("3s"), Ok(Duration::from_secs(3)));
        assert_eq!(parse_duration("250ms"), Ok(Duration::from_millis(250)));
        assert_eq!(parse_duration(" 1m "), Ok(Duration::from_secs(60)));
        assert_eq!(parse_duration("2h"), Ok(Duration::from_secs(7200)));
    }

    #[test]
    fn rejects_malformed_durations() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("10").is_err());
        assert!(parse_duration("s").is_err());
        assert!(parse_duration("5d").is_err());
    }

    #[test]
    fn oversized_durations_are_rejected() {
        assert!(parse_duration("99999999999999999h").is_err());
        assert!(parse_duration("999999999999999999m").is_err());
        assert_eq!(
            parse_duration("18446744073709551615s"),
            Ok(Duration::from_secs(u64::MAX))
        );
    }

    #[test]
    fn listen_addresses() {
        assert_eq!(
            parse_listen_addr(":8888"),
            Ok(Some("0.0.0.0:8888".parse().unwrap()))
        );
        assert_eq!(
            parse_listen_addr("127.0.0.1:9000"),
            Ok(Some("127.0.0.1:9000".parse().unwrap()))
        );
        assert_eq!(parse_listen_addr(""), Ok(None));
        assert!(parse_listen_addr("localhost").is_err());
    }

    #[test]
    fn defaults_validate() {
        let settings = Settings::try_from(RawSettings::default()).unwrap();
        assert_eq!(settings.watched_dir, PathBuf::from("/fluent-bit/etc"));
        assert_eq!(settings.interval, Duration::from_secs(3));
        assert_eq!(settings.launch.program, PathBuf::from("/fluent-bit/bin/fluent-bit"));
        assert_eq!(settings.launch.args, vec!["-c", "/fluent-bit/etc/fluent-bit.conf"]);
        assert_eq!(settings.metrics_addr, Some("0.0.0.0:8888".parse().unwrap()));
    }

    #[test]
    fn trailing_slashes_are_trimmed() {
        assert_eq!(normalize_dir("/etc/app//").unwrap(), PathBuf::from("/etc/app"));
        assert_eq!(normalize_dir("/").unwrap(), PathBuf::from("/"));
        assert!(normalize_dir("  ").is_err());
    }

    #[test]
    fn zero_interval_is_rejected() {
        let mut raw = RawSettings::default();
        raw.watch.interval = "0s".to_string();
        assert!(matches!(
            Settings::try_from(raw),
            Err(ConfigWatcherError::ConfigError(_))
        ));
    }

    #[test]
    fn empty_cmd_is_rejected() {
        let mut raw = RawSettings::default();
        raw.process.cmd = " ".to_string();
        assert!(Settings::try_from(raw).is_err());
    }
}
