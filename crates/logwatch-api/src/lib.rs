// logwatch-api: Async Rust client for the logwatch monitor REST API

pub mod client;
mod containers;
pub mod error;
mod logs;
pub mod models;
mod system;
pub mod transport;

pub use client::ApiClient;
pub use error::Error;
pub use models::{
    ContainerCount, ContainerRecord, ContainerStatus, ErrorPage, ErrorQuery, ErrorRecord,
    ErrorStatus, MonitorStatus, Severity, Stats, TrendPoint, TypeCount,
};
pub use transport::{TlsMode, TransportConfig};
