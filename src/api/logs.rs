use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use tracing::{error, info, warn};

use crate::api::AppState;
use crate::models::log::{DeleteLogsQuery, ListLogsQuery};
use crate::repositories::LogRepository;

pub async fn list_logs(
    State(state): State<AppState>,
    Query(query): Query<ListLogsQuery>,
) -> impl IntoResponse {
    let limit = query.limit.unwrap_or(50);
    let skip = query.skip.unwrap_or(0);

    let repo = LogRepository::new(&state.pool);

    let logs = match repo.list(limit as i64, skip as i64).await {
        Ok(logs) => logs,
        Err(err) => {
            error!("Failed to fetch logs: {}", err);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to fetch logs"})),
            );
        }
    };

    let total = match repo.count().await {
        Ok(total) => total,
        Err(err) => {
            error!("Failed to count logs: {}", err);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to fetch logs"})),
            );
        }
    };

    (
        StatusCode::OK,
        Json(json!({
            "logs": logs,
            "total": total,
            "limit": limit,
            "skip": skip,
        })),
    )
}

// Point delete with ?id=, otherwise wipes the whole collection. The endpoint
// itself does not gate the bulk path; callers confirm upstream.
pub async fn delete_logs(
    State(state): State<AppState>,
    Query(query): Query<DeleteLogsQuery>,
) -> impl IntoResponse {
    let repo = LogRepository::new(&state.pool);

    match query.id {
        Some(id) => match repo.delete_by_id(id).await {
            Ok(removed) => {
                info!("Deleted log {} ({} row(s))", id, removed);
                (
                    StatusCode::OK,
                    Json(json!({"success": true, "message": "Log deleted"})),
                )
            }
            Err(err) => {
                error!("Failed to delete log {}: {}", id, err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": "Failed to delete logs"})),
                )
            }
        },
        None => match repo.delete_all().await {
            Ok(removed) => {
                warn!("Deleted all {} webhook logs", removed);
                (
                    StatusCode::OK,
                    Json(json!({
                        "success": true,
                        "message": format!("Deleted {} logs", removed),
                    })),
                )
            }
            Err(err) => {
                error!("Failed to delete logs: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": "Failed to delete logs"})),
                )
            }
        },
    }
}
