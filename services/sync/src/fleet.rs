use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use adlift_db::cache::repositories::CampaignCacheRepository;
use adlift_db::clients::repositories::ClientRepository;
use adlift_db::sync::repositories::SyncStatusRepository;

use crate::orchestrator::ClientSyncOrchestrator;
use crate::pacing::{RateGate, SyncPacing};
use crate::report_center::api::ReportCenterApi;
use crate::run::{SyncOptions, SyncRun};
use crate::upstream::api::UpstreamApi;

/// Walks every linked client sequentially. Clients are never synced in
/// parallel; the gap between them keeps the fleet under the upstream
/// rate limit.
pub struct FleetSyncDriver<U, R, C, K, S> {
    clients: Arc<C>,
    orchestrator: Arc<ClientSyncOrchestrator<U, R, C, K, S>>,
    gate: Arc<RateGate>,
    pacing: SyncPacing,
}

impl<U, R, C, K, S> FleetSyncDriver<U, R, C, K, S>
where
    U: UpstreamApi,
    R: ReportCenterApi,
    C: ClientRepository,
    K: CampaignCacheRepository,
    S: SyncStatusRepository,
{
    pub fn new(
        clients: Arc<C>,
        orchestrator: Arc<ClientSyncOrchestrator<U, R, C, K, S>>,
        gate: Arc<RateGate>,
        pacing: SyncPacing,
    ) -> Self {
        Self {
            clients,
            orchestrator,
            gate,
            pacing,
        }
    }

    /// One run per linked client, in stable listing order. Returns the
    /// runs that actually started; unlinked clients are skipped.
    pub async fn sync_all(&self, options: SyncOptions, cancel: &CancellationToken) -> Vec<SyncRun> {
        let clients = match self.clients.list_all().await {
            Ok(clients) => clients,
            Err(e) => {
                tracing::error!(error = %e, "failed to list clients for fleet sync");
                return Vec::new();
            }
        };
        tracing::info!(clients = clients.len(), "starting fleet sync");

        let mut runs = Vec::new();
        for client in clients {
            if cancel.is_cancelled() {
                tracing::info!("fleet sync cancelled");
                break;
            }
            if !client.is_linked() {
                tracing::debug!(client = %client.id, name = %client.name, "not linked, skipping");
                continue;
            }
            self.gate.pause(self.pacing.client_gap, cancel).await;
            let run = self
                .orchestrator
                .sync_client(client.id, options, cancel)
                .await;
            runs.push(run);
        }
        runs
    }
}
