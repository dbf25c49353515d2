use std::env;
use std::path::PathBuf;

use dotenv::dotenv;
use health_core::{DataSource, Mode};
use thiserror::Error;

const DEFAULT_LOG_FILE: &str = "health-dashboard.log";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown comparison mode `{0}` (expected local, national or global)")]
    UnknownMode(String),
    #[error("data directory path is empty")]
    EmptyDataDir,
}

/// Start-up settings resolved from `.env`, the environment and the CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub initial_mode: Mode,
    pub log_file: PathBuf,
    pub debug: bool,
}

impl AppConfig {
    /// Loads `.env` (if any) and reads the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let data_dir = match lookup("DASHBOARD_DATA_DIR") {
            Some(dir) if dir.trim().is_empty() => return Err(ConfigError::EmptyDataDir),
            Some(dir) => PathBuf::from(dir.trim()),
            None => PathBuf::from("."),
        };

        let initial_mode = match lookup("DASHBOARD_MODE") {
            Some(value) => Mode::parse(&value).ok_or(ConfigError::UnknownMode(value))?,
            None => Mode::default(),
        };

        let log_file = lookup("DASHBOARD_LOG_FILE")
            .filter(|path| !path.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_LOG_FILE), PathBuf::from);

        let debug = lookup("DEBUG").is_some_and(|value| matches!(value.as_str(), "1" | "true"));

        Ok(Self {
            data_dir,
            initial_mode,
            log_file,
            debug,
        })
    }

    /// Primary base the dataset paths resolve against; the loader falls
    /// back to the working directory on its own.
    pub fn data_source(&self) -> DataSource {
        if self.data_dir == PathBuf::from(".") {
            DataSource::relative()
        } else {
            DataSource::new(self.data_dir.to_string_lossy())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars = pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect::<HashMap<_, _>>();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let config = config(&[]).unwrap();
        assert_eq!(config.initial_mode, Mode::Local);
        assert_eq!(config.log_file, PathBuf::from("health-dashboard.log"));
        assert!(!config.debug);
        assert!(config.data_source().is_relative());
    }

    #[test]
    fn reads_mode_and_data_dir() {
        let config = config(&[
            ("DASHBOARD_MODE", "National"),
            ("DASHBOARD_DATA_DIR", "/srv/dashboard"),
            ("DEBUG", "1"),
        ])
        .unwrap();
        assert_eq!(config.initial_mode, Mode::National);
        assert_eq!(config.data_source().base(), "/srv/dashboard/");
        assert!(config.debug);
    }

    #[test]
    fn rejects_unknown_mode() {
        assert_eq!(
            config(&[("DASHBOARD_MODE", "regional")]),
            Err(ConfigError::UnknownMode("regional".to_string()))
        );
    }

    #[test]
    fn rejects_blank_data_dir() {
        assert_eq!(
            config(&[("DASHBOARD_DATA_DIR", "  ")]),
            Err(ConfigError::EmptyDataDir)
        );
    }
}
