use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, Method, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::{error, info};

use crate::api::{response::ApiError, AppState};
use crate::models::WebhookLog;
use crate::repositories::LogRepository;

// Ingestion endpoint. Accepts anything, persists exactly one record per
// accepted request; a configured secret gates all methods.
pub async fn receive_webhook(
    State(state): State<AppState>,
    method: Method,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(secret) = &state.config.webhook_secret {
        if !secret_matches(&headers, secret) {
            return Ok((
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "Unauthorized"})),
            ));
        }
    }

    let log = WebhookLog::new(
        method.to_string(),
        header_map(&headers),
        parse_body(&body),
        query,
        client_ip(&headers),
        user_agent(&headers),
    );

    if let Err(err) = LogRepository::new(&state.pool).insert(&log).await {
        error!("Failed to save webhook log: {}", err);
        return Err(ApiError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Internal server error".to_string(),
        });
    }

    info!("Logged {} webhook request {}", log.method, log.id);

    Ok((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "message": "Webhook received and logged",
            "id": log.id,
        })),
    ))
}

fn secret_matches(headers: &HeaderMap, secret: &str) -> bool {
    if let Some(provided) = headers
        .get("x-webhook-secret")
        .and_then(|value| value.to_str().ok())
    {
        return provided == secret;
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.strip_prefix("Bearer ").unwrap_or(value) == secret)
        .unwrap_or(false)
}

// Empty body stays null; a body that is not JSON degrades to an empty object
// instead of rejecting the request.
fn parse_body(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }

    serde_json::from_slice(bytes).unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}

fn header_map(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect()
}

fn client_ip(headers: &HeaderMap) -> String {
    if let Some(forwarded) = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
    {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    if let Some(real_ip) = headers
        .get("x-real-ip")
        .and_then(|value| value.to_str().ok())
    {
        if !real_ip.is_empty() {
            return real_ip.to_string();
        }
    }

    "unknown".to_string()
}

fn user_agent(headers: &HeaderMap) -> String {
    headers
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}
