//! Configuration management.
//!
//! Settings come from a TOML file, then environment overrides, then CLI
//! flags (applied by the binary).
//!
//! ```toml
//! database_path = "/var/lib/feedbuckets/entries.db"
//! scheme = "calendar"
//!
//! [logging]
//! format = "json"
//! level = "info"
//! file = "/var/log/feedbuckets.log"
//! ```

use crate::buckets::PartitionScheme;
use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "FEEDBUCKETS_CONFIG_PATH";
/// Environment variable overriding the partition scheme.
pub const SCHEME_ENV: &str = "FEEDBUCKETS_SCHEME";
/// Environment variable overriding the database path.
pub const DATABASE_ENV: &str = "FEEDBUCKETS_DATABASE";
/// Environment variable overriding the log format.
pub const LOG_FORMAT_ENV: &str = "FEEDBUCKETS_LOG_FORMAT";
/// Environment variable overriding the log file.
pub const LOG_FILE_ENV: &str = "FEEDBUCKETS_LOG_FILE";

const APP_DIR: &str = "feedbuckets";

/// Main configuration for feedbuckets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedBucketsConfig {
    /// Path to the `SQLite` entry database.
    pub database_path: PathBuf,
    /// Partition scheme used for both displaying and marking buckets.
    pub scheme: PartitionScheme,
    /// Logging settings.
    pub logging: LoggingSettings,
}

/// Logging section of the configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoggingSettings {
    /// `pretty` or `json`.
    pub format: Option<String>,
    /// Fallback filter directive when no env filter is set.
    pub level: Option<String>,
    /// Append logs to this file.
    pub file: Option<PathBuf>,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Database path.
    pub database_path: Option<String>,
    /// Partition scheme name.
    pub scheme: Option<String>,
    /// Logging section.
    pub logging: Option<LoggingSettings>,
}

impl Default for FeedBucketsConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            scheme: PartitionScheme::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl FeedBucketsConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or names an
    /// unknown scheme.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::OperationFailed {
            operation: "read_config_file".to_string(),
            cause: format!("{}: {e}", path.display()),
        })?;

        let file: ConfigFile = toml::from_str(&contents).map_err(|e| Error::OperationFailed {
            operation: "parse_config_file".to_string(),
            cause: e.to_string(),
        })?;

        Self::from_config_file(file)
    }

    /// Loads configuration from the default location.
    ///
    /// Checks the following paths in order:
    /// 1. Platform-specific config dir (`~/Library/Application Support/feedbuckets/` on macOS)
    /// 2. XDG config dir (`~/.config/feedbuckets/` for Unix compatibility)
    ///
    /// Returns default configuration if no config file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing config file cannot be read or parsed,
    /// or names an unknown scheme.
    pub fn load_default() -> Result<Self> {
        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Ok(Self::default());
        };

        Self::load_first_existing(&[
            base_dirs.config_dir().join(APP_DIR).join("config.toml"),
            base_dirs
                .home_dir()
                .join(".config")
                .join(APP_DIR)
                .join("config.toml"),
        ])
    }

    /// Loads the first candidate file that exists.
    ///
    /// # Errors
    ///
    /// Returns the load error of that file; later candidates are not tried.
    pub fn load_first_existing(candidates: &[PathBuf]) -> Result<Self> {
        candidates
            .iter()
            .find(|candidate| candidate.exists())
            .map_or_else(|| Ok(Self::default()), |path| Self::load_from_file(path))
    }

    /// Converts a `ConfigFile` to `FeedBucketsConfig`.
    fn from_config_file(file: ConfigFile) -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = file.database_path {
            config.database_path = PathBuf::from(path);
        }
        if let Some(scheme) = file.scheme {
            config.scheme = parse_scheme(&scheme)?;
        }
        if let Some(logging) = file.logging {
            config.logging = logging;
        }

        Ok(config)
    }

    /// Applies `FEEDBUCKETS_*` overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `FEEDBUCKETS_SCHEME` names an
    /// unknown scheme.
    pub fn apply_env_overrides(self) -> Result<Self> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary key lookup.
    ///
    /// Empty values are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the scheme override is unknown.
    pub fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(scheme) = get(SCHEME_ENV) {
            self.scheme = parse_scheme(&scheme)?;
        }
        if let Some(path) = get(DATABASE_ENV) {
            self.database_path = PathBuf::from(path);
        }
        if let Some(format) = get(LOG_FORMAT_ENV) {
            self.logging.format = Some(format);
        }
        if let Some(file) = get(LOG_FILE_ENV) {
            self.logging.file = Some(PathBuf::from(file));
        }

        Ok(self)
    }

    /// Sets the database path.
    #[must_use]
    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = path.into();
        self
    }

    /// Sets the partition scheme.
    #[must_use]
    pub const fn with_scheme(mut self, scheme: PartitionScheme) -> Self {
        self.scheme = scheme;
        self
    }
}

fn parse_scheme(raw: &str) -> Result<PartitionScheme> {
    PartitionScheme::parse(raw).ok_or_else(|| {
        Error::InvalidInput(format!(
            "unknown partition scheme '{raw}', expected 'rolling' or 'calendar'"
        ))
    })
}

/// Returns the default database location.
///
/// Uses the platform data directory when available, otherwise
/// `./feedbuckets.db`.
#[must_use]
pub fn default_database_path() -> PathBuf {
    directories::BaseDirs::new().map_or_else(
        || PathBuf::from("feedbuckets.db"),
        |dirs| dirs.data_dir().join(APP_DIR).join("entries.db"),
    )
}
