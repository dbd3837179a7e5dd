use async_trait::async_trait;
use uuid::Uuid;

use crate::clients::models::Client;
use adlift_common::error::AdliftResult;

#[async_trait]
pub trait ClientRepository: Send + Sync {
    /// Look up a single client. Returns `None` for unknown ids.
    async fn get_by_id(&self, id: Uuid) -> AdliftResult<Option<Client>>;

    /// All clients, in stable (creation) order.
    async fn list_all(&self) -> AdliftResult<Vec<Client>>;
}
