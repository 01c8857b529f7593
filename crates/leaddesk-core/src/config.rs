//! Controller configuration.
//!
//! # Environment Variables
//!
//! - `LEADDESK_BASE_URL`: backend base URL (default `http://127.0.0.1:8000`)
//! - `LEADDESK_LOG_DIR`: where the TUI writes its log file
//!   (default `~/.leaddesk/logs`)

use std::path::PathBuf;

/// Environment variable for the backend base URL.
pub const BASE_URL_ENV: &str = "LEADDESK_BASE_URL";

/// Environment variable for the log directory.
pub const LOG_DIR_ENV: &str = "LEADDESK_LOG_DIR";

/// Backend used when nothing is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

const DEFAULT_STATE_DIR: &str = ".leaddesk";
const LOGS_SUBDIR: &str = "logs";
const LOG_FILE: &str = "leaddesk.log";

/// Get the LeadDesk state directory (`~/.leaddesk`, or `.leaddesk` in the
/// current directory when there is no home).
pub fn state_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(DEFAULT_STATE_DIR))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_DIR))
}

/// Configuration for a dashboard session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeskConfig {
    /// Backend base URL.
    pub base_url: String,
    /// Directory for log files.
    pub log_dir: PathBuf,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            log_dir: state_dir().join(LOGS_SUBDIR),
        }
    }
}

impl DeskConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads overrides from the environment.
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var(BASE_URL_ENV).ok(),
            std::env::var(LOG_DIR_ENV).ok(),
        )
    }

    fn from_vars(base_url: Option<String>, log_dir: Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            config = config.with_base_url(url);
        }
        if let Some(dir) = log_dir.filter(|d| !d.trim().is_empty()) {
            config = config.with_log_dir(dir);
        }
        config
    }

    /// Sets the backend base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim().to_string();
        self
    }

    /// Sets the log directory.
    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = dir.into();
        self
    }

    /// Path of the TUI log file.
    pub fn log_file(&self) -> PathBuf {
        self.log_dir.join(LOG_FILE)
    }
}
