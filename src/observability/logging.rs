//! Structured logging configuration.

use crate::config::LoggingSettings;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive.
pub const LOG_FILTER_ENV: &str = "FEEDBUCKETS_LOG";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Parses a format name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pretty" | "text" => Some(Self::Pretty),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Resolved logging configuration.
#[derive(Debug)]
pub struct LoggingConfig {
    /// Output format.
    pub format: LogFormat,
    /// Event filter.
    pub filter: EnvFilter,
    /// Append log output to this file instead of stderr.
    pub file: Option<PathBuf>,
}

impl LoggingConfig {
    /// Builds the logging configuration from file settings.
    ///
    /// The filter comes from `FEEDBUCKETS_LOG`, then `RUST_LOG`, then the
    /// configured level; `verbose` raises the fallback level to `debug`.
    #[must_use]
    pub fn from_settings(settings: Option<&LoggingSettings>, verbose: bool) -> Self {
        let format = settings
            .and_then(|s| s.format.as_deref())
            .and_then(LogFormat::parse)
            .unwrap_or_default();
        let file = settings.and_then(|s| s.file.clone());

        let fallback_level = if verbose {
            "debug".to_string()
        } else {
            settings
                .and_then(|s| s.level.clone())
                .unwrap_or_else(|| "warn".to_string())
        };

        let directive = std::env::var(LOG_FILTER_ENV)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(fallback_level);
        let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("warn"));

        Self {
            format,
            filter,
            file,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("json"), Some(LogFormat::Json));
        assert_eq!(LogFormat::parse(" Pretty "), Some(LogFormat::Pretty));
        assert_eq!(LogFormat::parse("text"), Some(LogFormat::Pretty));
        assert_eq!(LogFormat::parse("xml"), None);
    }

    #[test]
    fn test_from_settings_reads_format_and_file() {
        let settings = LoggingSettings {
            format: Some("json".to_string()),
            level: Some("info".to_string()),
            file: Some(PathBuf::from("/tmp/feedbuckets.log")),
        };
        let config = LoggingConfig::from_settings(Some(&settings), false);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.file, Some(PathBuf::from("/tmp/feedbuckets.log")));
    }

    #[test]
    fn test_from_settings_defaults() {
        let config = LoggingConfig::from_settings(None, false);
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(config.file.is_none());
    }
}
