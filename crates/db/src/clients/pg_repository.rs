use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::clients::models::Client;
use crate::clients::repositories::ClientRepository;
use adlift_common::error::{AdliftError, AdliftResult};

#[derive(Clone)]
pub struct PgClientRepository {
    pool: PgPool,
}

impl PgClientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_row(row: PgRow) -> AdliftResult<Client> {
        Ok(Client {
            id: row.get("id"),
            name: row.get("name"),
            upstream_org_id: row.get("upstream_org_id"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}

#[async_trait]
impl ClientRepository for PgClientRepository {
    async fn get_by_id(&self, id: Uuid) -> AdliftResult<Option<Client>> {
        let row = sqlx::query(
            "select id, name, upstream_org_id, created_at, updated_at
             from clients where id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AdliftError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::map_row(r)?)),
            None => Ok(None),
        }
    }

    async fn list_all(&self) -> AdliftResult<Vec<Client>> {
        let rows = sqlx::query(
            "select id, name, upstream_org_id, created_at, updated_at
             from clients order by created_at",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AdliftError::Database(e.to_string()))?;

        rows.into_iter().map(Self::map_row).collect()
    }
}
