//! Configuration for the logwatch dashboard.
//!
//! A TOML file in the platform config directory, overridden by
//! `LOGWATCH_*` environment variables, translated into the transport and
//! refresh settings the TUI needs. CLI flags are applied on top by the
//! binary.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use logwatch_api::{TlsMode, TransportConfig};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Where the monitor's web API lives.
    #[serde(default)]
    pub backend: Backend,

    /// Refresh and paging behavior.
    #[serde(default)]
    pub dashboard: Dashboard,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Backend {
    /// Base URL of the monitor web app (e.g., "http://localhost:5000").
    #[serde(default = "default_url")]
    pub url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Accept invalid TLS certificates.
    #[serde(default)]
    pub insecure: bool,
}

impl Default for Backend {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout: default_timeout(),
            insecure: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Dashboard {
    /// Seconds between background refreshes of the error list.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: u64,

    /// Errors per page on the error list.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Rows in the dashboard's recent-errors table.
    #[serde(default = "default_recent_errors")]
    pub recent_errors: u32,

    /// Screen redraws per second.
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self {
            refresh_interval: default_refresh_interval(),
            page_size: default_page_size(),
            recent_errors: default_recent_errors(),
            frame_rate: default_frame_rate(),
        }
    }
}

fn default_url() -> String {
    "http://localhost:5000".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_refresh_interval() -> u64 {
    30
}
fn default_page_size() -> u32 {
    20
}
fn default_recent_errors() -> u32 {
    5
}
fn default_frame_rate() -> u32 {
    30
}

impl Config {
    /// Reject values that would make the dashboard unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url: url::Url = self
            .backend
            .url
            .parse()
            .map_err(|_| ConfigError::Validation {
                field: "backend.url".into(),
                reason: format!("invalid URL: {}", self.backend.url),
            })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Validation {
                field: "backend.url".into(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        if self.dashboard.refresh_interval == 0 {
            return Err(ConfigError::Validation {
                field: "dashboard.refresh_interval".into(),
                reason: "must be at least 1 second".into(),
            });
        }
        if self.dashboard.page_size == 0 {
            return Err(ConfigError::Validation {
                field: "dashboard.page_size".into(),
                reason: "must be at least 1".into(),
            });
        }
        if !(1..=120).contains(&self.dashboard.frame_rate) {
            return Err(ConfigError::Validation {
                field: "dashboard.frame_rate".into(),
                reason: format!("{} is outside 1-120", self.dashboard.frame_rate),
            });
        }
        Ok(())
    }

    /// HTTP transport settings for [`logwatch_api::ApiClient`].
    pub fn transport(&self) -> TransportConfig {
        let tls = if self.backend.insecure {
            TlsMode::DangerAcceptInvalid
        } else {
            TlsMode::System
        };
        TransportConfig::default()
            .with_timeout(Duration::from_secs(self.backend.timeout))
            .with_tls(tls)
    }

    /// Interval of the background error-list refresh.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.dashboard.refresh_interval)
    }

    /// Time between redraws for the configured frame rate.
    pub fn render_interval(&self) -> Duration {
        Duration::from_secs(1) / self.dashboard.frame_rate.max(1)
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "logwatch", "logwatch").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("logwatch");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load Config from an explicit file + environment.
///
/// A missing file is not an error: defaults and environment still apply.
/// Environment keys nest with a double underscore, e.g.
/// `LOGWATCH_BACKEND__URL` or `LOGWATCH_DASHBOARD__PAGE_SIZE`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("LOGWATCH_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`, creating parent dirs.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}
