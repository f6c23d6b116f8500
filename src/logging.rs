//! Logging setup for ReefTag.
//!
//! The crate logs through the `log` facade. Native hosts call
//! [`init_logging`] to install `env_logger`; the browser bindings install a
//! console logger instead. Host-side (JavaScript) log lines are forwarded
//! into the same pipeline with [`log_from_host`].

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Log levels matching the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "../wasm/player-bindings/types/")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" | "trace" => Ok(LogLevel::Debug),
            "info" | "log" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level: {}", other)),
        }
    }
}

impl From<LogLevel> for log::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Info => log::Level::Info,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Error => log::Level::Error,
        }
    }
}

/// Install `env_logger` (filter from `RUST_LOG`, default `info`).
///
/// Safe to call more than once; later calls are no-ops.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("info");
    if env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .try_init()
        .is_ok()
    {
        log::info!("[ReefTag] Logging system initialized");
    }
}

/// Forward a host log line, tagged with its source component.
pub fn log_from_host(level: LogLevel, source: &str, message: &str) {
    log::log!(target: "reeftag::host", level.into(), "[{}] {}", source, message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_parse() {
        assert_eq!("WARN".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert_eq!(" log ".parse::<LogLevel>(), Ok(LogLevel::Info));
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_level_display_and_mapping() {
        assert_eq!(LogLevel::Error.to_string(), "ERROR");
        assert_eq!(log::Level::from(LogLevel::Debug), log::Level::Debug);
    }

    #[test]
    fn test_init_is_idempotent() {
        init_logging();
        init_logging();
        log_from_host(LogLevel::Info, "TaggerPage", "loaded 4 videos");
    }
}
