use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::sync::models::SyncStatusRecord;
use crate::sync::repositories::SyncStatusRepository;
use adlift_common::error::{AdliftError, AdliftResult};

#[derive(Clone)]
pub struct PgSyncStatusRepository {
    pool: PgPool,
}

impl PgSyncStatusRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SyncStatusRepository for PgSyncStatusRepository {
    async fn update_status(
        &self,
        client_id: Uuid,
        category: &str,
        campaign_id: Option<&str>,
        status: &str,
        record_count: i64,
        error_message: Option<&str>,
    ) -> AdliftResult<()> {
        sqlx::query(
            "insert into sync_status
               (id, client_id, category, campaign_id, status, record_count, error_message, synced_at)
             values ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(Uuid::new_v4())
        .bind(client_id)
        .bind(category)
        .bind(campaign_id)
        .bind(status)
        .bind(record_count)
        .bind(error_message)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| AdliftError::Database(e.to_string()))?;

        Ok(())
    }

    async fn recent_statuses(
        &self,
        client_id: Uuid,
        limit: i64,
    ) -> AdliftResult<Vec<SyncStatusRecord>> {
        let rows = sqlx::query(
            "select id, client_id, category, campaign_id, status, record_count,
                    error_message, synced_at
             from sync_status
             where client_id = $1
             order by synced_at desc
             limit $2",
        )
        .bind(client_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AdliftError::Database(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|row| SyncStatusRecord {
                id: row.get("id"),
                client_id: row.get("client_id"),
                category: row.get("category"),
                campaign_id: row.get("campaign_id"),
                status: row.get("status"),
                record_count: row.get("record_count"),
                error_message: row.get("error_message"),
                synced_at: row.get("synced_at"),
            })
            .collect())
    }
}
