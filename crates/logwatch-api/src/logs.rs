// Error-log endpoints
//
// Listing, detail, and triage status of errors captured by the monitor.

use serde_json::json;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{ErrorPage, ErrorQuery, ErrorRecord, ErrorStatus};

impl ApiClient {
    /// List errors matching a filter, one page at a time.
    ///
    /// `GET /api/errors?page&per_page&search&status&severity&container`
    pub async fn list_errors(&self, query: &ErrorQuery) -> Result<ErrorPage, Error> {
        debug!(page = query.page, per_page = query.per_page, "listing errors");
        self.get_with_params("errors", &query.to_params()).await
    }

    /// The `limit` most recent errors, unfiltered.
    ///
    /// `GET /api/errors?per_page={limit}`
    pub async fn list_recent_errors(&self, limit: u32) -> Result<Vec<ErrorRecord>, Error> {
        let page: ErrorPage = self
            .get_with_params("errors", &[("per_page", limit.to_string())])
            .await?;
        Ok(page.errors)
    }

    /// Fetch a single error with its full log and analysis.
    ///
    /// `GET /api/errors/{id}`
    pub async fn get_error(&self, id: i64) -> Result<ErrorRecord, Error> {
        self.get(&format!("errors/{id}")).await
    }

    /// Change the triage status of an error.
    ///
    /// `PUT /api/errors/{id}/status` with `{"status": "..."}`
    pub async fn update_error_status(&self, id: i64, status: ErrorStatus) -> Result<(), Error> {
        debug!(id, %status, "updating error status");
        self.put_no_response(&format!("errors/{id}/status"), &json!({ "status": status }))
            .await
    }
}
