use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use hooklog::api::{build_router, ApiConfig};
use hooklog::models::WebhookLog;
use hooklog::repositories::LogRepository;
use serde_json::{json, Value};
use sqlx::PgPool;
use std::collections::HashMap;
use tower::ServiceExt;
use uuid::Uuid;

fn app(pool: PgPool) -> Router {
    build_router(
        pool,
        ApiConfig {
            webhook_secret: None,
        },
    )
}

fn secured_app(pool: PgPool, secret: &str) -> Router {
    build_router(
        pool,
        ApiConfig {
            webhook_secret: Some(secret.to_string()),
        },
    )
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_webhook(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/webhook")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[sqlx::test(migrations = "src/db/migrations")]
async fn test_webhook_roundtrip(pool: PgPool) {
    let app = app(pool);

    let request = Request::builder()
        .method("POST")
        .uri("/api/webhook?source=ci")
        .header("content-type", "application/json")
        .header("x-forwarded-for", "203.0.113.9, 10.0.0.1")
        .header("user-agent", "curl/8.0")
        .body(Body::from(r#"{"message":"hello"}"#))
        .unwrap();

    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Webhook received and logged");
    let id = body["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, get("/api/logs?limit=1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["limit"], 1);
    assert_eq!(body["skip"], 0);

    let log = &body["logs"][0];
    assert_eq!(log["id"], id.as_str());
    assert_eq!(log["method"], "POST");
    assert_eq!(log["body"]["message"], "hello");
    assert_eq!(log["query"]["source"], "ci");
    assert_eq!(log["ip"], "203.0.113.9");
    assert_eq!(log["userAgent"], "curl/8.0");
    assert_eq!(log["headers"]["user-agent"], "curl/8.0");
}

#[sqlx::test(migrations = "src/db/migrations")]
async fn test_get_requests_are_logged_with_null_body(pool: PgPool) {
    let app = app(pool);

    let (status, _) = send(&app, get("/api/webhook?foo=bar")).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, get("/api/logs")).await;
    let log = &body["logs"][0];
    assert_eq!(log["method"], "GET");
    assert_eq!(log["query"]["foo"], "bar");
    assert_eq!(log["body"], Value::Null);
    assert_eq!(log["ip"], "unknown");
    assert_eq!(log["userAgent"], "unknown");
}

#[sqlx::test(migrations = "src/db/migrations")]
async fn test_malformed_body_still_creates_a_record(pool: PgPool) {
    let app = app(pool);

    let (status, _) = send(&app, post_webhook("definitely not json {{")).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, get("/api/logs")).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["logs"][0]["body"], json!({}));
}

#[sqlx::test(migrations = "src/db/migrations")]
async fn test_each_request_creates_one_record_with_unique_id(pool: PgPool) {
    let app = app(pool);

    let mut ids = Vec::new();
    for i in 0..3 {
        let (status, body) = send(&app, post_webhook(&format!(r#"{{"seq":{i}}}"#))).await;
        assert_eq!(status, StatusCode::OK);
        ids.push(body["id"].as_str().unwrap().to_string());
    }

    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 3);

    let (_, body) = send(&app, get("/api/logs")).await;
    assert_eq!(body["total"], 3);
}

#[sqlx::test(migrations = "src/db/migrations")]
async fn test_secret_enforcement(pool: PgPool) {
    let app = secured_app(pool, "s3cret");

    // Missing secret.
    let (status, body) = send(&app, post_webhook(r#"{"message":"nope"}"#)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized");

    // Mismatching secret.
    let request = Request::builder()
        .method("POST")
        .uri("/api/webhook")
        .header("x-webhook-secret", "wrong")
        .body(Body::from(r#"{"message":"nope"}"#))
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Rejected requests persist nothing.
    let (_, body) = send(&app, get("/api/logs")).await;
    assert_eq!(body["total"], 0);

    // Matching header form.
    let request = Request::builder()
        .method("POST")
        .uri("/api/webhook")
        .header("x-webhook-secret", "s3cret")
        .body(Body::from(r#"{"message":"yes"}"#))
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);

    // Matching bearer form.
    let request = Request::builder()
        .method("POST")
        .uri("/api/webhook")
        .header("authorization", "Bearer s3cret")
        .body(Body::from(r#"{"message":"yes"}"#))
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);

    // The secret gates GET ingestion too.
    let (status, _) = send(&app, get("/api/webhook")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, body) = send(&app, get("/api/logs")).await;
    assert_eq!(body["total"], 2);
}

#[sqlx::test(migrations = "src/db/migrations")]
async fn test_unconfigured_secret_accepts_everything(pool: PgPool) {
    let app = app(pool);

    let request = Request::builder()
        .method("POST")
        .uri("/api/webhook")
        .header("x-webhook-secret", "anything-at-all")
        .body(Body::from(r#"{"message":"hi"}"#))
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, get("/api/logs")).await;
    assert_eq!(body["total"], 1);
}

#[sqlx::test(migrations = "src/db/migrations")]
async fn test_pagination_window(pool: PgPool) {
    let repo = LogRepository::new(&pool);
    for i in 0..5 {
        let mut log = WebhookLog::new(
            "POST".to_string(),
            HashMap::new(),
            json!({"seq": i}),
            HashMap::new(),
            "unknown".to_string(),
            "unknown".to_string(),
        );
        log.timestamp = Utc::now() - Duration::minutes(5 - i);
        repo.insert(&log).await.unwrap();
    }

    let app = app(pool);
    let (status, body) = send(&app, get("/api/logs?limit=2&skip=1")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 5);
    assert_eq!(body["limit"], 2);
    assert_eq!(body["skip"], 1);

    let logs = body["logs"].as_array().unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0]["body"]["seq"], 3);
    assert_eq!(logs[1]["body"]["seq"], 2);
}

#[sqlx::test(migrations = "src/db/migrations")]
async fn test_delete_by_id_then_bulk(pool: PgPool) {
    let app = app(pool);

    let mut ids = Vec::new();
    for i in 0..3 {
        let (_, body) = send(&app, post_webhook(&format!(r#"{{"seq":{i}}}"#))).await;
        ids.push(body["id"].as_str().unwrap().to_string());
    }

    let (status, body) = send(&app, delete(&format!("/api/logs?id={}", ids[0]))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Log deleted");

    let (_, body) = send(&app, get("/api/logs")).await;
    assert_eq!(body["total"], 2);

    // Absent id: still a success, nothing removed.
    let (status, _) = send(&app, delete(&format!("/api/logs?id={}", Uuid::new_v4()))).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = send(&app, get("/api/logs")).await;
    assert_eq!(body["total"], 2);

    let (status, body) = send(&app, delete("/api/logs")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Deleted 2 logs");

    let (_, body) = send(&app, get("/api/logs")).await;
    assert_eq!(body["total"], 0);
    assert_eq!(body["logs"].as_array().unwrap().len(), 0);
}

#[sqlx::test(migrations = "src/db/migrations")]
async fn test_health_check(pool: PgPool) {
    let app = app(pool);
    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
