//! Logging configuration
//!
//! Controls diagnostic logging. Logs go to stderr so report output on
//! stdout stays machine-readable.

use std::str::FromStr;

use serde::Deserialize;

/// Crates whose events are governed by the configured level.
///
/// Everything else (polars internals, etc.) is held at `warn`.
const RETAIN_TARGETS: &[&str] = &["retain", "retain_config", "retain_query", "retain_analytics"];

/// Log level
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level - very verbose
    Trace,
    /// Debug level - per-table load stats and per-report row counts
    Debug,
    /// Info level - normal operation (default)
    #[default]
    Info,
    /// Warn level - unparseable values and other data problems
    Warn,
    /// Error level - errors only
    Error,
}

impl LogLevel {
    /// Convert to tracing level filter string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(format!("unknown log level: {}", other)),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable console output (default)
    #[default]
    Console,
    /// JSON structured logging
    Json,
}

/// Logging configuration
///
/// # Example
///
/// ```toml
/// [log]
/// level = "debug"
/// format = "json"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    /// Default: info
    pub level: LogLevel,

    /// Output format (console, json)
    /// Default: console
    pub format: LogFormat,
}

impl LogConfig {
    /// Build an `EnvFilter`-compatible directive for this level
    ///
    /// Our own crates log at the configured level; dependencies stay at
    /// `warn` unless the configured level is stricter.
    pub fn directive(&self) -> String {
        let level = self.level.as_str();
        let base = match self.level {
            LogLevel::Error => "error",
            _ => "warn",
        };

        let mut directive = base.to_string();
        for target in RETAIN_TARGETS {
            directive.push_str(&format!(",{}={}", target, level));
        }
        directive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert_eq!(config.level, LogLevel::Info);
        assert_eq!(config.format, LogFormat::Console);
    }

    #[test]
    fn test_deserialize_empty() {
        let config: LogConfig = toml::from_str("").unwrap();
        assert_eq!(config.level, LogLevel::Info);
        assert_eq!(config.format, LogFormat::Console);
    }

    #[test]
    fn test_deserialize_full() {
        let toml = r#"
level = "debug"
format = "json"
"#;
        let config: LogConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.format, LogFormat::Json);
    }

    #[test]
    fn test_parse_level() {
        assert_eq!("TRACE".parse::<LogLevel>().unwrap(), LogLevel::Trace);
        assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_directive_scopes_own_crates() {
        let config = LogConfig {
            level: LogLevel::Debug,
            format: LogFormat::Console,
        };
        let directive = config.directive();

        assert!(directive.starts_with("warn,"));
        assert!(directive.contains("retain_analytics=debug"));
        assert!(directive.contains("retain_query=debug"));
    }

    #[test]
    fn test_directive_error_level() {
        let config = LogConfig {
            level: LogLevel::Error,
            format: LogFormat::Console,
        };
        assert!(config.directive().starts_with("error,"));
    }
}
