pub mod cache;
pub mod clients;
pub mod sync;

use adlift_common::error::{AdliftError, AdliftResult};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Create a Postgres connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> AdliftResult<PgPool> {
    tracing::info!("connecting to database");
    PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .map_err(|e| AdliftError::Database(e.to_string()))
}
