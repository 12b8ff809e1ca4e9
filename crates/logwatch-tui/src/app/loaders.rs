//! Background fetches and mutations against the monitor API.
//!
//! Each loader bumps its resource's generation, spawns a task, and reports
//! back through the action channel. Failures are logged here; the app
//! decides whether they also raise a toast.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::{debug, warn};

use logwatch_api::{ApiClient, ErrorStatus};

use super::App;
use crate::action::{Action, Loaded, Notification, Resource};

/// Counts a running fetch for the status-bar spinner until dropped.
struct InFlight(Arc<AtomicUsize>);

impl InFlight {
    fn new(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::Relaxed);
        Self(Arc::clone(counter))
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::Relaxed);
    }
}

impl App {
    /// Spawn `fetch` as the newest request for `resource`. Its result
    /// comes back as `Loaded` or `RequestFailed` tagged with the request id.
    fn spawn_fetch<F, Fut>(&mut self, resource: Resource, fetch: F)
    where
        F: FnOnce(ApiClient) -> Fut + Send + 'static,
        Fut: Future<Output = Result<Loaded, logwatch_api::Error>> + Send + 'static,
    {
        let req = self.requests.begin(resource);
        let client = self.client.clone();
        let tx = self.action_tx.clone();
        let guard = InFlight::new(&self.in_flight);

        tokio::spawn(async move {
            let _guard = guard;
            let action = match fetch(client).await {
                Ok(loaded) => Action::Loaded(req, loaded),
                Err(e) => {
                    warn!(
                        error = %e,
                        ?resource,
                        http_status = ?e.status(),
                        transient = e.is_transient(),
                        "fetch failed"
                    );
                    Action::RequestFailed(req)
                }
            };
            let _ = tx.send(action);
        });
    }

    /// Fetch `page` of the error list with the current filters.
    pub(super) fn load_errors(&mut self, page: u32) {
        let query = self.filters.to_query(page, self.settings.page_size);
        debug!(page, ?query, "loading errors");
        self.spawn_fetch(Resource::ErrorList, move |client| async move {
            let data = client.list_errors(&query).await?;
            Ok(Loaded::Errors { page, data })
        });
    }

    /// Refresh the container filter options from the aggregate stats.
    pub(super) fn load_filter_options(&mut self) {
        self.spawn_fetch(Resource::FilterOptions, |client| async move {
            let stats = client.get_stats().await?;
            Ok(Loaded::FilterOptions(stats.containers))
        });
    }

    /// Stats cards and charts, plus the monitor header.
    pub(super) fn load_dashboard(&mut self) {
        self.spawn_fetch(Resource::Stats, |client| async move {
            let stats = client.get_stats().await?;
            Ok(Loaded::Stats(Box::new(stats)))
        });
        self.spawn_fetch(Resource::MonitorStatus, |client| async move {
            Ok(Loaded::MonitorStatus(client.monitor_status().await?))
        });
    }

    pub(super) fn load_recent_errors(&mut self) {
        let limit = self.settings.recent_errors;
        self.spawn_fetch(Resource::RecentErrors, move |client| async move {
            Ok(Loaded::RecentErrors(client.list_recent_errors(limit).await?))
        });
    }

    pub(super) fn load_containers(&mut self) {
        self.spawn_fetch(Resource::Containers, |client| async move {
            Ok(Loaded::Containers(client.list_containers().await?))
        });
    }

    pub(super) fn load_config(&mut self) {
        self.spawn_fetch(Resource::Config, |client| async move {
            Ok(Loaded::Config(client.get_config().await?))
        });
    }

    pub(super) fn show_error_detail(&mut self, id: i64) {
        self.spawn_fetch(Resource::ErrorDetail, move |client| async move {
            let record = client.get_error(id).await?;
            Ok(Loaded::ErrorDetail(Box::new(record)))
        });
    }

    pub(super) fn show_container_logs(&mut self, id: String, name: String) {
        self.spawn_fetch(Resource::ContainerLogs, move |client| async move {
            let logs = client.container_logs(&id).await?;
            Ok(Loaded::ContainerLogs { name, logs })
        });
    }

    // ── Mutations ─────────────────────────────────────────────────────

    /// Persist a status change. Success re-fetches the list; failure only
    /// notifies, leaving the modal's selector as the user set it.
    pub(super) fn update_error_status(&self, id: i64, status: ErrorStatus) {
        let client = self.client.clone();
        let tx = self.action_tx.clone();
        let guard = InFlight::new(&self.in_flight);

        tokio::spawn(async move {
            let _guard = guard;
            let action = match client.update_error_status(id, status.clone()).await {
                Ok(()) => Action::ErrorStatusUpdated { id, status },
                Err(e) => {
                    warn!(
                        error = %e,
                        id,
                        %status,
                        transient = e.is_transient(),
                        "status update failed"
                    );
                    Action::Notify(Notification::error(status_failure_message(id, &e)))
                }
            };
            let _ = tx.send(action);
        });
    }

    /// Write the already-parsed config. The editor keeps its text either way.
    pub(super) fn save_config(&self, config: serde_json::Value) {
        let client = self.client.clone();
        let tx = self.action_tx.clone();
        let guard = InFlight::new(&self.in_flight);

        tokio::spawn(async move {
            let _guard = guard;
            let notification = match client.update_config(config).await {
                Ok(()) => Notification::success("Configuration saved"),
                Err(e) => {
                    warn!(error = %e, http_status = ?e.status(), "config save failed");
                    Notification::error(format!("Failed to save config: {e}"))
                }
            };
            let _ = tx.send(Action::Notify(notification));
        });
    }
}

/// Toast for a failed status change. A record deleted on the backend
/// since the list was fetched gets its own wording.
fn status_failure_message(id: i64, error: &logwatch_api::Error) -> String {
    if error.is_not_found() {
        format!("Error #{id} no longer exists")
    } else {
        format!("Failed to update error #{id}")
    }
}
