// Container endpoints
//
// Read-only view of the Docker host the monitor is attached to.

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{ContainerList, ContainerLogs, ContainerRecord};

impl ApiClient {
    /// List all containers, running or not.
    ///
    /// `GET /api/containers`
    pub async fn list_containers(&self) -> Result<Vec<ContainerRecord>, Error> {
        let list: ContainerList = self.get("containers").await?;
        Ok(list.containers)
    }

    /// Tail of a container's log output (the backend returns the last 100 lines).
    ///
    /// `GET /api/containers/{id}/logs`
    pub async fn container_logs(&self, id: &str) -> Result<String, Error> {
        let logs: ContainerLogs = self.get(&format!("containers/{id}/logs")).await?;
        Ok(logs.logs)
    }
}
