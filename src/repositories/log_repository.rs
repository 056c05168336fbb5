use anyhow::Result;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::WebhookLog;

pub struct LogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> LogRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, log: &WebhookLog) -> Result<()> {
        sqlx::query(
            r#"INSERT INTO webhook_logs (id, "timestamp", method, headers, body, query, ip, user_agent)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"#,
        )
        .bind(log.id)
        .bind(log.timestamp)
        .bind(&log.method)
        .bind(Json(&log.headers))
        .bind(Json(&log.body))
        .bind(Json(&log.query))
        .bind(&log.ip)
        .bind(&log.user_agent)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    pub async fn list(&self, limit: i64, skip: i64) -> Result<Vec<WebhookLog>> {
        let logs = sqlx::query_as::<_, WebhookLog>(
            r#"SELECT * FROM webhook_logs ORDER BY "timestamp" DESC LIMIT $1 OFFSET $2"#,
        )
        .bind(limit)
        .bind(skip)
        .fetch_all(self.pool)
        .await?;

        Ok(logs)
    }

    pub async fn count(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM webhook_logs")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }

    pub async fn delete_by_id(&self, id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM webhook_logs WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete_all(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM webhook_logs")
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
