use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A reporting client. Only clients linked to an upstream organization
/// can be synced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    pub upstream_org_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Client {
    pub fn is_linked(&self) -> bool {
        self.upstream_org_id
            .as_deref()
            .is_some_and(|org| !org.is_empty())
    }
}
