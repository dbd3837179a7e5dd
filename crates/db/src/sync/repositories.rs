use async_trait::async_trait;
use uuid::Uuid;

use crate::sync::models::SyncStatusRecord;
use adlift_common::error::AdliftResult;

/// Ledger of per-category sync attempts. `campaign_id` is `None` for
/// client-level entries (the campaign list itself).
#[async_trait]
pub trait SyncStatusRepository: Send + Sync {
    async fn update_status(
        &self,
        client_id: Uuid,
        category: &str,
        campaign_id: Option<&str>,
        status: &str,
        record_count: i64,
        error_message: Option<&str>,
    ) -> AdliftResult<()>;

    /// The most recent ledger entries for a client, newest first.
    async fn recent_statuses(
        &self,
        client_id: Uuid,
        limit: i64,
    ) -> AdliftResult<Vec<SyncStatusRecord>>;
}
