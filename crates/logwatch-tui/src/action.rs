//! All possible UI actions. Actions are the sole mechanism for state mutation.

use logwatch_api::{
    ContainerCount, ContainerRecord, ErrorPage, ErrorRecord, ErrorStatus, MonitorStatus, Stats,
};

use crate::screen::ScreenId;
use crate::state::FilterState;

/// Outcome a toast reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

/// A toast notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Error,
        }
    }
}

/// Backend resources fetched in the background. Each one carries its own
/// generation counter so only the newest response is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    ErrorList,
    FilterOptions,
    Stats,
    RecentErrors,
    MonitorStatus,
    Containers,
    Config,
    ErrorDetail,
    ContainerLogs,
}

impl Resource {
    /// Toast text shown when a fetch of this resource fails, or `None`
    /// when the failure is only logged.
    pub fn failure_message(self) -> Option<&'static str> {
        match self {
            Self::ErrorList => Some("Failed to load error list"),
            Self::Stats => Some("Failed to load dashboard data"),
            Self::Containers => Some("Failed to load containers"),
            Self::Config => Some("Failed to load config"),
            Self::ErrorDetail => Some("Failed to load error detail"),
            Self::ContainerLogs => Some("Failed to load container logs"),
            Self::FilterOptions | Self::RecentErrors | Self::MonitorStatus => None,
        }
    }
}

/// Identifies one issued fetch: which resource, and which generation of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestId {
    pub resource: Resource,
    pub generation: u64,
}

/// Payload of a successful fetch.
#[derive(Debug, Clone)]
pub enum Loaded {
    Errors { page: u32, data: ErrorPage },
    FilterOptions(Vec<ContainerCount>),
    Stats(Box<Stats>),
    RecentErrors(Vec<ErrorRecord>),
    MonitorStatus(MonitorStatus),
    Containers(Vec<ContainerRecord>),
    Config(serde_json::Value),
    ErrorDetail(Box<ErrorRecord>),
    ContainerLogs { name: String, logs: String },
}

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,

    // ── Navigation ────────────────────────────────────────────────
    SwitchScreen(ScreenId),
    GoBack,

    // ── Loaders ───────────────────────────────────────────────────
    LoadErrors(u32),
    RefreshErrors,
    LoadDashboard,
    LoadContainers,
    LoadConfig,
    ShowErrorDetail(i64),
    ShowContainerLogs { id: String, name: String },

    // ── Fetch results ─────────────────────────────────────────────
    Loaded(RequestId, Loaded),
    RequestFailed(RequestId),

    // ── Filters ───────────────────────────────────────────────────
    SetFilters(FilterState),

    // ── Mutations ─────────────────────────────────────────────────
    UpdateErrorStatus { id: i64, status: ErrorStatus },
    ErrorStatusUpdated { id: i64, status: ErrorStatus },
    SaveConfig(String),

    // ── Modal ─────────────────────────────────────────────────────
    CloseModal,

    // ── Help ──────────────────────────────────────────────────────
    ToggleHelp,

    // ── Notifications ─────────────────────────────────────────────
    Notify(Notification),
}
