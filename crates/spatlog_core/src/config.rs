//! Session configuration.
//!
//! # Responsibility
//! - Describe where collections are stored and how logging starts.
//! - Read overrides from the process environment.
//!
//! # Invariants
//! - Blank environment values count as unset.
//! - Without a log directory, logging is left uninitialized.

use crate::logging::{default_log_level, init_logging, LoggingError};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "SPATLOG_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "SPATLOG_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "SPATLOG_LOG_DIR";

/// Backing store for the four collections.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StorageLocation {
    /// Ephemeral; lost when the session ends.
    #[default]
    Memory,
    /// SQLite key-value file at the given path.
    Sqlite(PathBuf),
}

/// Startup configuration for a core session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub storage: StorageLocation,
    pub log_level: String,
    /// Absolute directory for rolling log files.
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            storage: StorageLocation::Memory,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    /// Builds configuration from `SPATLOG_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(path) = read(ENV_DB_PATH) {
            config.storage = StorageLocation::Sqlite(PathBuf::from(path));
        }
        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level = level;
        }
        config.log_dir = read(ENV_LOG_DIR).map(PathBuf::from);
        config
    }

    /// Starts logging when a log directory is configured.
    ///
    /// Returns `Ok(false)` when no directory is set and logging stays off.
    pub fn init_logging(&self) -> Result<bool, LoggingError> {
        let Some(log_dir) = &self.log_dir else {
            return Ok(false);
        };
        init_logging(&self.log_level, log_dir)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::{CoreConfig, StorageLocation, ENV_DB_PATH, ENV_LOG_DIR, ENV_LOG_LEVEL};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn defaults_to_memory_without_logging() {
        let config = CoreConfig::from_lookup(lookup(&[]));
        assert_eq!(config, CoreConfig::default());
        assert_eq!(config.storage, StorageLocation::Memory);
        assert!(!config.init_logging().unwrap());
    }

    #[test]
    fn reads_all_overrides() {
        let config = CoreConfig::from_lookup(lookup(&[
            (ENV_DB_PATH, "/var/lib/spatlog/data.sqlite3"),
            (ENV_LOG_LEVEL, "warn"),
            (ENV_LOG_DIR, "/var/log/spatlog"),
        ]));
        assert_eq!(
            config.storage,
            StorageLocation::Sqlite(PathBuf::from("/var/lib/spatlog/data.sqlite3"))
        );
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/spatlog")));
    }

    #[test]
    fn blank_values_are_ignored() {
        let config = CoreConfig::from_lookup(lookup(&[(ENV_DB_PATH, "  "), (ENV_LOG_DIR, "")]));
        assert_eq!(config.storage, StorageLocation::Memory);
        assert!(config.log_dir.is_none());
    }
}
