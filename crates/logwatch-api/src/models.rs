// Wire types for the monitor backend.
//
// Field names follow the backend's JSON exactly. Optional columns are
// `Option`, aggregate counters default to zero so a partially populated
// stats payload still renders.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use strum::{AsRefStr, Display};

/// Treat an explicit JSON `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ── Error records ────────────────────────────────────────────────────

/// Triage state of a recorded error.
///
/// Values outside the known set are kept verbatim in `Other` so they can
/// be shown as the backend stored them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ErrorStatus {
    #[default]
    New,
    Investigating,
    Resolved,
    Other(String),
}

impl ErrorStatus {
    /// Selectable statuses, in selector order.
    pub const ALL: [ErrorStatus; 3] = [Self::New, Self::Investigating, Self::Resolved];

    /// Wire value sent to and received from the backend.
    pub fn as_str(&self) -> &str {
        match self {
            Self::New => "new",
            Self::Investigating => "investigating",
            Self::Resolved => "resolved",
            Self::Other(raw) => raw,
        }
    }

    /// Human label used in lists and the detail selector.
    pub fn label(&self) -> &str {
        match self {
            Self::New => "New",
            Self::Investigating => "Investigating",
            Self::Resolved => "Resolved",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for ErrorStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "new" => Self::New,
            "investigating" => Self::Investigating,
            "resolved" => Self::Resolved,
            _ => Self::Other(raw),
        }
    }
}

impl From<ErrorStatus> for String {
    fn from(status: ErrorStatus) -> Self {
        match status {
            ErrorStatus::Other(raw) => raw,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for ErrorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity assigned by the monitor's analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Severity {
    Critical,
    Error,
    Warning,
    Other(String),
}

impl Severity {
    /// Filterable severities, most severe first.
    pub const ALL: [Severity; 3] = [Self::Critical, Self::Error, Self::Warning];

    pub fn as_str(&self) -> &str {
        match self {
            Self::Critical => "critical",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for Severity {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "critical" => Self::Critical,
            "error" => Self::Error,
            "warning" => Self::Warning,
            _ => Self::Other(raw),
        }
    }
}

impl From<Severity> for String {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Other(raw) => raw,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single error captured from a container's log stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub id: i64,
    pub container_name: String,
    pub error_message: String,
    #[serde(default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub severity: Option<Severity>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: ErrorStatus,
    /// ISO-8601 timestamp as sent by the backend (usually without offset).
    pub timestamp: String,
    #[serde(default)]
    pub log_content: Option<String>,
    #[serde(default)]
    pub ai_analysis: Option<String>,
    #[serde(default)]
    pub ai_solution: Option<String>,
}

/// One page of the filtered error list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorPage {
    #[serde(default)]
    pub errors: Vec<ErrorRecord>,
    /// Total number of pages for the current filter.
    #[serde(default)]
    pub pages: u32,
    /// Total number of matching records.
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub current_page: Option<u32>,
}

/// Query for `GET /api/errors`.
///
/// Unset filters are sent as empty strings; the backend treats an empty
/// value as "no constraint".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorQuery {
    pub page: u32,
    pub per_page: u32,
    pub search: String,
    pub status: Option<ErrorStatus>,
    pub severity: Option<Severity>,
    pub container: Option<String>,
}

impl Default for ErrorQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 20,
            search: String::new(),
            status: None,
            severity: None,
            container: None,
        }
    }
}

impl ErrorQuery {
    /// Query-string pairs in the order the backend documents them.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("page", self.page.to_string()),
            ("per_page", self.per_page.to_string()),
            ("search", self.search.clone()),
            (
                "status",
                self.status.as_ref().map(ToString::to_string).unwrap_or_default(),
            ),
            (
                "severity",
                self.severity.as_ref().map(ToString::to_string).unwrap_or_default(),
            ),
            ("container", self.container.clone().unwrap_or_default()),
        ]
    }
}

// ── Stats ────────────────────────────────────────────────────────────

/// Error count for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: String,
    pub count: u64,
}

/// Error count for one error type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCount {
    #[serde(rename = "type")]
    pub error_type: String,
    pub count: u64,
}

/// Error count for one container; doubles as a filter option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerCount {
    pub name: String,
    pub count: u64,
}

/// Aggregate counters from `GET /api/stats`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    #[serde(default)]
    pub total_errors: u64,
    #[serde(default)]
    pub today_errors: u64,
    #[serde(default)]
    pub unresolved: u64,
    #[serde(default)]
    pub critical_errors: u64,
    #[serde(default)]
    pub daily_trend: Vec<TrendPoint>,
    #[serde(default)]
    pub error_types: Vec<TypeCount>,
    #[serde(default)]
    pub containers: Vec<ContainerCount>,
}

// ── Containers ───────────────────────────────────────────────────────

/// Docker container state as reported by the engine.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ContainerStatus {
    Running,
    Exited,
    Paused,
    Created,
    Restarting,
    Removing,
    Dead,
    #[serde(other)]
    Other,
}

/// A container known to the Docker host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerRecord {
    /// Short (12-character) container id.
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub image: String,
    pub status: ContainerStatus,
    #[serde(default)]
    pub created: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ContainerList {
    #[serde(default)]
    pub containers: Vec<ContainerRecord>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ContainerLogs {
    #[serde(default)]
    pub logs: String,
}

// ── Config / monitor ─────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ConfigEnvelope {
    pub config: serde_json::Value,
}

/// Liveness of the background log monitor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorStatus {
    #[serde(default)]
    pub running: bool,
    #[serde(default)]
    pub uptime: Option<String>,
    #[serde(default)]
    pub last_check: Option<String>,
}
