// System endpoints
//
// Aggregate statistics, the monitor's YAML configuration (exchanged as
// JSON), and monitor liveness.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{ConfigEnvelope, MonitorStatus, Stats};

impl ApiClient {
    /// Aggregate counters, 7-day trend, type and container breakdowns.
    ///
    /// `GET /api/stats`
    pub async fn get_stats(&self) -> Result<Stats, Error> {
        self.get("stats").await
    }

    /// Current monitor configuration.
    ///
    /// `GET /api/config`
    ///
    /// Returned as loosely-typed JSON: the client edits it as text and
    /// never interprets individual keys.
    pub async fn get_config(&self) -> Result<serde_json::Value, Error> {
        let envelope: ConfigEnvelope = self.get("config").await?;
        Ok(envelope.config)
    }

    /// Replace the monitor configuration.
    ///
    /// `PUT /api/config` with `{"config": {...}}`
    pub async fn update_config(&self, config: serde_json::Value) -> Result<(), Error> {
        debug!("writing monitor config");
        self.put_no_response("config", &ConfigEnvelope { config }).await
    }

    /// Whether the background log monitor is alive.
    ///
    /// `GET /api/monitor/status`
    pub async fn monitor_status(&self) -> Result<MonitorStatus, Error> {
        self.get("monitor/status").await
    }
}
