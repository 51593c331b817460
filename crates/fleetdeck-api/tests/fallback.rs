//! LiveSource against a stub backend

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use fleetdeck_api::{ApiClient, ApiError, DataSource, LiveSource, MockSource};
use fleetdeck_core::{CheckStatus, HealthCheckQuery};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

type Hits = Arc<AtomicUsize>;

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn live(endpoint: &str) -> LiveSource {
    LiveSource::new(ApiClient::new(endpoint), Arc::new(MockSource::new()))
}

fn host_json(hostname: &str) -> Value {
    json!({
        "id": 1,
        "hostname": hostname,
        "ip_address": "192.168.0.10",
        "status": "online",
        "last_heartbeat": "2024-05-01T10:00:00Z"
    })
}

async fn failing(State(hits): State<Hits>) -> impl IntoResponse {
    hits.fetch_add(1, Ordering::SeqCst);
    (StatusCode::INTERNAL_SERVER_ERROR, "boom")
}

async fn counted_ack(State(hits): State<Hits>) -> impl IntoResponse {
    hits.fetch_add(1, Ordering::SeqCst);
    (StatusCode::SERVICE_UNAVAILABLE, "down")
}

#[tokio::test]
async fn test_enveloped_body_is_unwrapped() {
    let app = Router::new().route(
        "/api/v1/hosts",
        get(|| async { Json(json!({ "data": [host_json("stub-01")] })) }),
    );
    let source = live(&serve(app).await);

    let hosts = source.hosts().await;
    assert_eq!(hosts.len(), 1);
    assert_eq!(hosts[0].hostname, "stub-01");
    assert_eq!(hosts[0].id, "1");
}

#[tokio::test]
async fn test_bare_body_is_used_directly() {
    let app = Router::new().route(
        "/api/v1/hosts",
        get(|| async { Json(json!([host_json("bare-01"), host_json("bare-02")])) }),
    );
    let source = live(&serve(app).await);
    assert_eq!(source.hosts().await.len(), 2);
}

#[tokio::test]
async fn test_server_error_falls_back_without_retry() {
    let hits = Hits::default();
    let app = Router::new()
        .route("/api/v1/hosts", get(failing))
        .with_state(hits.clone());
    let source = live(&serve(app).await);

    let hosts = source.hosts().await;
    assert_eq!(hosts.len(), 12);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_malformed_body_falls_back() {
    let app = Router::new().route(
        "/api/v1/fleet/overview",
        get(|| async { Json(json!({ "data": { "total_hosts": "lots" } })) }),
    );
    let source = live(&serve(app).await);
    let overview = source.fleet_overview().await;
    assert_eq!(overview.total_hosts, 12);
}

#[tokio::test]
async fn test_unreachable_backend_falls_back() {
    // bind then drop to get a port nothing listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let source = live(&format!("http://{}", addr));
    assert_eq!(source.alerts().await.len(), 8);
    assert_eq!(
        source.health_checks(&HealthCheckQuery::default()).await.len(),
        4
    );
}

#[tokio::test]
async fn test_fallback_returned_unchanged() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ApiClient::new(format!("http://{}", addr));
    let fallback = vec![json!({ "x": 1 }), json!("y"), Value::Null];
    let got: Vec<Value> = client.fetch_or("/hosts", fallback.clone()).await;
    assert_eq!(got, fallback);

    let mock = MockSource::new();
    let expected = mock.hosts().await;
    let got = client.fetch_or("/hosts", expected.clone()).await;
    assert_eq!(got, expected);
}

#[tokio::test]
async fn test_malformed_body_returns_fallback_unchanged() {
    let app = Router::new().route(
        "/api/v1/hosts",
        get(|| async { Json(json!({ "data": "not-a-list" })) }),
    );
    let client = ApiClient::new(serve(app).await);
    let fallback = MockSource::new().hosts().await;
    let got = client.fetch_or("/hosts", fallback.clone()).await;
    assert_eq!(got, fallback);
}

#[tokio::test]
async fn test_ack_swallows_failure() {
    let hits = Hits::default();
    let app = Router::new()
        .route("/api/v1/alerts/:id/ack", post(counted_ack))
        .with_state(hits.clone());
    let source = live(&serve(app).await);

    source.acknowledge_alert("a1").await;
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_approve_failure_propagates() {
    let app = Router::new().route(
        "/api/v1/health-checks/:id/approve",
        post(|| async { (StatusCode::CONFLICT, "already reviewed") }),
    );
    let source = live(&serve(app).await);

    let err = source.approve_health_check("hc-1").await.unwrap_err();
    assert!(matches!(err, ApiError::Conflict(ref body) if body == "already reviewed"));
}

#[tokio::test]
async fn test_approve_accepts_empty_body() {
    let app = Router::new().route(
        "/api/v1/health-checks/:id/approve",
        post(|| async { StatusCode::NO_CONTENT }),
    );
    let source = live(&serve(app).await);
    source.approve_health_check("hc-1").await.unwrap();
}

#[tokio::test]
async fn test_execute_sends_action_index() {
    let app = Router::new().route(
        "/api/v1/health-checks/:id/execute",
        post(|Json(body): Json<Value>| async move {
            let index = body["action_index"].as_u64().unwrap_or(99);
            Json(json!({
                "data": {
                    "status": "completed",
                    "results": [{
                        "command": format!("action {}", index),
                        "result": { "stdout": "ok", "stderr": "", "exit_code": 0, "duration_ms": 12 },
                        "success": true
                    }]
                }
            }))
        }),
    );
    let source = live(&serve(app).await);

    let outcome = source.execute_health_check("hc-7", Some(2)).await.unwrap();
    assert_eq!(outcome.check_id, "hc-7");
    assert_eq!(outcome.status, CheckStatus::Completed);
    assert_eq!(outcome.results[0].command, "action 2");
}

#[tokio::test]
async fn test_execute_unreachable_is_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let source = live(&format!("http://{}", addr));
    let err = source.execute_health_check("hc-2", None).await.unwrap_err();
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_invalid_id_rejected_before_request() {
    let source = live("http://127.0.0.1:9");
    let err = source.reject_health_check("../hosts").await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidId(_)));
}

#[tokio::test]
async fn test_unknown_status_values_survive() {
    let app = Router::new().route(
        "/api/v1/health-checks/:id",
        get(|| async {
            Json(json!({
                "id": 42,
                "hostname": "stub-01",
                "status": "queued",
                "severity": "notice",
                "proposed_actions": "not-a-list",
                "created_at": "2024-05-01T10:00:00Z"
            }))
        }),
    );
    let source = live(&serve(app).await);

    let check = source.health_check("42").await.unwrap();
    assert_eq!(check.id, "42");
    assert_eq!(check.status, CheckStatus::Other("queued".to_string()));
    assert!(check.proposed_actions.is_empty());
}
