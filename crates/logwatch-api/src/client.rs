// Backend HTTP client
//
// Wraps `reqwest::Client` with base-URL normalization and uniform
// response handling. Endpoint groups (error logs, containers, system)
// are implemented as inherent methods in separate files to keep this
// module focused on transport mechanics.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Error body shape returned by the backend on failures: `{"error": "..."}`.
#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Async client for the monitor's REST API under `/api/`.
///
/// Cheap to clone: the inner `reqwest::Client` is reference counted, so
/// each background fetch task gets its own handle.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client for the backend at `base_url` (e.g. `http://localhost:5000`).
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(http, base_url)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: &str) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// The backend base URL, always ending in `/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Ensure the path ends with a slash so relative joins append
    /// instead of replacing the last segment.
    ///
    /// `http://host:5000` → `http://host:5000/`
    /// `https://host/monitor` → `https://host/monitor/`
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        url.set_query(None);
        Ok(url)
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative API path (e.g. `"errors/12"`) onto `{base}/api/`.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(&format!("api/{path}"))?)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self.http.get(url).query(params).send().await?;
        self.handle_response(resp).await
    }

    /// PUT a JSON body; the backend's success payload is ignored.
    pub(crate) async fn put_no_response<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");

        let resp = self.http.put(url).json(body).send().await?;
        self.handle_empty(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn handle_empty(&self, resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    #[allow(clippy::unused_self)]
    async fn parse_error(&self, status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();

        let message = match serde_json::from_str::<ErrorResponse>(&raw) {
            Ok(ErrorResponse {
                error: Some(msg), ..
            })
            | Ok(ErrorResponse {
                message: Some(msg), ..
            }) => msg,
            _ if raw.is_empty() => status.to_string(),
            _ => raw.chars().take(200).collect(),
        };

        Error::Api {
            status: status.as_u16(),
            message,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::with_client(reqwest::Client::new(), base).unwrap()
    }

    #[test]
    fn base_url_gains_trailing_slash() {
        assert_eq!(client("http://localhost:5000").base_url().as_str(), "http://localhost:5000/");
        assert_eq!(
            client("https://ops.example.com/monitor").base_url().as_str(),
            "https://ops.example.com/monitor/"
        );
    }

    #[test]
    fn api_paths_are_joined_under_prefix() {
        let c = client("https://ops.example.com/monitor/");
        assert_eq!(
            c.url("errors/12/status").unwrap().as_str(),
            "https://ops.example.com/monitor/api/errors/12/status"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = ApiClient::with_client(reqwest::Client::new(), "not a url");
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }
}
