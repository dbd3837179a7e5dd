use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One entry in the per-category sync status ledger. The ledger is
/// append-only so past runs stay auditable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncStatusRecord {
    pub id: Uuid,
    pub client_id: Uuid,
    pub category: String,
    pub campaign_id: Option<String>,
    pub status: String,
    pub record_count: i64,
    pub error_message: Option<String>,
    pub synced_at: DateTime<Utc>,
}

pub const STATUS_SUCCESS: &str = "success";
pub const STATUS_ERROR: &str = "error";
