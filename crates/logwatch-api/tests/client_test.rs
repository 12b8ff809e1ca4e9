#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use logwatch_api::{ApiClient, ContainerStatus, Error, ErrorQuery, ErrorStatus, Severity};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let client = ApiClient::with_client(reqwest::Client::new(), &server.uri()).unwrap();
    (server, client)
}

fn error_json(id: i64, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "timestamp": "2024-06-15T10:30:00.123456",
        "container_name": "web",
        "error_type": "ConnectionError",
        "error_message": "upstream connect error",
        "log_content": "line 1\nline 2",
        "severity": "critical",
        "ai_analysis": null,
        "ai_solution": null,
        "status": status
    })
}

// ── Error list ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_errors_sends_all_filter_params() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/errors"))
        .and(query_param("page", "2"))
        .and(query_param("per_page", "20"))
        .and(query_param("search", "timeout"))
        .and(query_param("status", ""))
        .and(query_param("severity", "critical"))
        .and(query_param("container", ""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [error_json(41, "new")],
            "total": 21,
            "pages": 2,
            "current_page": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let query = ErrorQuery {
        page: 2,
        search: "timeout".into(),
        severity: Some(Severity::Critical),
        ..ErrorQuery::default()
    };
    let page = client.list_errors(&query).await.unwrap();

    assert_eq!(page.pages, 2);
    assert_eq!(page.total, 21);
    assert_eq!(page.errors.len(), 1);
    assert_eq!(page.errors[0].id, 41);
    assert_eq!(page.errors[0].severity, Some(Severity::Critical));
    assert_eq!(page.errors[0].status, ErrorStatus::New);
}

#[tokio::test]
async fn test_list_recent_errors_only_sends_limit() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/errors"))
        .and(query_param("per_page", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [error_json(1, "resolved"), error_json(2, "investigating")],
            "pages": 1
        })))
        .mount(&server)
        .await;

    let errors = client.list_recent_errors(5).await.unwrap();

    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0].status, ErrorStatus::Resolved);
    assert_eq!(errors[1].status, ErrorStatus::Investigating);
}

#[tokio::test]
async fn test_get_error_detail() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/errors/41"))
        .respond_with(ResponseTemplate::new(200).set_body_json(error_json(41, "new")))
        .mount(&server)
        .await;

    let error = client.get_error(41).await.unwrap();

    assert_eq!(error.container_name, "web");
    assert_eq!(error.log_content.as_deref(), Some("line 1\nline 2"));
    assert_eq!(error.ai_analysis, None);
}

// ── Status update ───────────────────────────────────────────────────

#[tokio::test]
async fn test_update_error_status_sends_body() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/errors/41/status"))
        .and(body_json(json!({ "status": "resolved" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "error": error_json(41, "resolved")
        })))
        .expect(1)
        .mount(&server)
        .await;

    client
        .update_error_status(41, ErrorStatus::Resolved)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_update_error_status_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/errors/999/status"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&server)
        .await;

    let result = client.update_error_status(999, ErrorStatus::New).await;

    let err = result.unwrap_err();
    assert!(
        matches!(err, Error::Api { status: 404, .. }),
        "expected 404 Api error, got: {err:?}"
    );
    assert!(err.is_not_found());
}

// ── Containers ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_containers_and_logs() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/containers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "containers": [
                {"id": "0123456789ab", "name": "web", "status": "running",
                 "image": "nginx:1.27", "created": "2024-06-01T00:00:00Z"},
                {"id": "ba9876543210", "name": "batch", "status": "exited",
                 "image": "unknown", "created": "2024-06-02T00:00:00Z"}
            ]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/containers/0123456789ab/logs"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "logs": "started\nready\n" })),
        )
        .mount(&server)
        .await;

    let containers = client.list_containers().await.unwrap();
    assert_eq!(containers.len(), 2);
    assert_eq!(containers[0].status, ContainerStatus::Running);
    assert_eq!(containers[1].status, ContainerStatus::Exited);

    let logs = client.container_logs("0123456789ab").await.unwrap();
    assert_eq!(logs, "started\nready\n");
}

#[tokio::test]
async fn test_backend_error_message_is_surfaced() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/containers"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(json!({ "error": "Cannot connect to the Docker daemon" })),
        )
        .mount(&server)
        .await;

    let result = client.list_containers().await;

    let err = result.unwrap_err();
    assert!(err.is_transient());
    match err {
        Error::Api { message, status } => {
            assert_eq!(status, 500);
            assert!(message.contains("Docker daemon"), "got: {message}");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

// ── Stats / config / monitor ────────────────────────────────────────

#[tokio::test]
async fn test_get_stats() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_errors": 120,
            "today_errors": 8,
            "unresolved": 30,
            "critical_errors": 4,
            "containers": [{"name": "web", "count": 90}, {"name": "db", "count": 30}],
            "error_types": [{"type": "Timeout", "count": 70}],
            "daily_trend": [{"date": "2024-06-14", "count": 5}, {"date": "2024-06-15", "count": 8}]
        })))
        .mount(&server)
        .await;

    let stats = client.get_stats().await.unwrap();

    assert_eq!(stats.total_errors, 120);
    assert_eq!(stats.critical_errors, 4);
    assert_eq!(stats.containers[1].name, "db");
    assert_eq!(stats.daily_trend[1].count, 8);
}

#[tokio::test]
async fn test_config_round_trip() {
    let (server, client) = setup().await;

    let config = json!({ "docker": { "containers": ["web"] }, "ai": { "enabled": true } });

    Mock::given(method("GET"))
        .and(path("/api/config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "config": config })))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/api/config"))
        .and(body_json(json!({ "config": config })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": true, "message": "ok" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let fetched = client.get_config().await.unwrap();
    assert_eq!(fetched, config);
    client.update_config(fetched).await.unwrap();
}

#[tokio::test]
async fn test_monitor_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/monitor/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "running": true, "uptime": "2h 15m", "last_check": "2024-06-15T10:30:00"
        })))
        .mount(&server)
        .await;

    let status = client.monitor_status().await.unwrap();
    assert!(status.running);
    assert_eq!(status.uptime.as_deref(), Some("2h 15m"));
}

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy error</html>"))
        .mount(&server)
        .await;

    let result = client.get_stats().await;

    match result {
        Err(Error::Deserialization { body, .. }) => {
            assert!(body.contains("proxy error"));
        }
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    // Port 1 (tcpmux) is never bound on test machines.
    let client = ApiClient::with_client(reqwest::Client::new(), "http://127.0.0.1:1").unwrap();

    let result = client.get_stats().await;

    assert!(
        matches!(result, Err(Error::Transport(_))),
        "expected Transport error, got: {result:?}"
    );
}
