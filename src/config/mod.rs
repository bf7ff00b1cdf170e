// src/config/mod.rs
//
// Client configuration
//
// Loaded from `<config_dir>/filmdiary/config.toml` when the file exists,
// otherwise defaults. Environment variables override whatever the file said.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

pub const ENV_API_URL: &str = "FILMDIARY_API_URL";
pub const ENV_DB_PATH: &str = "FILMDIARY_DB_PATH";
pub const ENV_SESSION_ID: &str = "FILMDIARY_SESSION_ID";
pub const ENV_CSRF_TOKEN: &str = "FILMDIARY_CSRF_TOKEN";

/// What the diary does with local state after a successful write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStrategy {
    /// Fetch the whole collection again; the backend stays the source of truth
    Refetch,

    /// Insert the record the backend returned into local state
    Merge,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiaryConfig {
    /// Backend origin, e.g. `http://localhost:8000`
    pub api_base_url: String,

    pub csrf_cookie_name: String,
    pub csrf_header_name: String,

    /// Per-request timeout; 0 disables it
    pub request_timeout_secs: u64,

    pub sync_strategy: SyncStrategy,

    /// Local SQLite store for rubrics and lists. Defaults to the app data dir.
    pub database_path: Option<PathBuf>,

    /// Seeds the `sessionid` cookie for a non-browser session
    pub session_id: Option<String>,

    /// Seeds the CSRF cookie
    pub csrf_token: Option<String>,
}

impl Default for DiaryConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            csrf_cookie_name: "csrftoken".to_string(),
            csrf_header_name: "X-CSRFToken".to_string(),
            request_timeout_secs: 30,
            sync_strategy: SyncStrategy::Refetch,
            database_path: None,
            session_id: None,
            csrf_token: None,
        }
    }
}

impl DiaryConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    /// Apply overrides from a variable lookup (normally `std::env::var`)
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL) {
            self.api_base_url = url;
        }
        if let Some(path) = lookup(ENV_DB_PATH) {
            self.database_path = Some(PathBuf::from(path));
        }
        if let Some(session) = lookup(ENV_SESSION_ID) {
            self.session_id = Some(session);
        }
        if let Some(token) = lookup(ENV_CSRF_TOKEN) {
            self.csrf_token = Some(token);
        }
        self
    }

    pub fn validate(&self) -> AppResult<()> {
        let url = self.api_base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(AppError::Config(format!(
                "api_base_url must be an http(s) URL, got '{}'",
                self.api_base_url
            )));
        }
        if self.csrf_cookie_name.trim().is_empty() || self.csrf_header_name.trim().is_empty() {
            return Err(AppError::Config(
                "CSRF cookie and header names cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Default location of the config file
pub fn default_config_path() -> AppResult<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| AppError::Config("Could not determine config directory".to_string()))?;
    Ok(config_dir.join("filmdiary").join("config.toml"))
}

/// Read and parse a config file. Missing keys take their defaults.
pub fn load_config(path: &Path) -> AppResult<DiaryConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        AppError::Config(format!("Failed to read config file {}: {}", path.display(), e))
    })?;
    let config: DiaryConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Config file if present, else defaults, then environment overrides
pub fn load_effective_config() -> AppResult<DiaryConfig> {
    let path = default_config_path()?;
    let config = if path.exists() {
        log::info!("Loading config from {}", path.display());
        load_config(&path)?
    } else {
        log::debug!("No config file at {}, using defaults", path.display());
        DiaryConfig::default()
    };

    let config = config.with_overrides(|key| std::env::var(key).ok());
    config.validate()?;
    Ok(config)
}
