use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WebhookLog {
    pub id: Uuid,

    pub timestamp: DateTime<Utc>,

    pub method: String,

    #[sqlx(json)]
    pub headers: HashMap<String, String>,

    #[sqlx(json)]
    pub body: serde_json::Value,

    #[sqlx(json)]
    pub query: HashMap<String, String>,

    pub ip: String,

    #[serde(rename = "userAgent")]
    pub user_agent: String,
}

#[derive(Debug, Deserialize)]
pub struct ListLogsQuery {
    pub limit: Option<u32>,
    pub skip: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteLogsQuery {
    pub id: Option<Uuid>,
}

impl WebhookLog {
    pub fn new(
        method: String,
        headers: HashMap<String, String>,
        body: serde_json::Value,
        query: HashMap<String, String>,
        ip: String,
        user_agent: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            method,
            headers,
            body,
            query,
            ip,
            user_agent,
        }
    }
}
