use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use adlift_db::cache::models::CampaignRecord;
use adlift_db::cache::repositories::CampaignCacheRepository;
use adlift_db::clients::repositories::ClientRepository;
use adlift_db::sync::models::{STATUS_ERROR, STATUS_SUCCESS};
use adlift_db::sync::repositories::SyncStatusRepository;

use crate::campaign::{campaign_to_record, CampaignDataSyncer};
use crate::pacing::{RateGate, SyncPacing};
use crate::registry::ActiveRunRegistry;
use crate::report_center::api::ReportCenterApi;
use crate::run::{category, RunStatus, SyncOptions, SyncRun};
use crate::upstream::api::UpstreamApi;

/// Runs one full sync for a single client: campaign list first, then a
/// per-campaign drill-down for every campaign that is still delivering.
pub struct ClientSyncOrchestrator<U, R, C, K, S> {
    clients: Arc<C>,
    upstream: Arc<U>,
    cache: Arc<K>,
    ledger: Arc<S>,
    registry: Arc<ActiveRunRegistry>,
    syncer: CampaignDataSyncer<U, R, K, S>,
    gate: Arc<RateGate>,
    pacing: SyncPacing,
}

impl<U, R, C, K, S> ClientSyncOrchestrator<U, R, C, K, S>
where
    U: UpstreamApi,
    R: ReportCenterApi,
    C: ClientRepository,
    K: CampaignCacheRepository,
    S: SyncStatusRepository,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        clients: Arc<C>,
        upstream: Arc<U>,
        report_center: Option<Arc<R>>,
        cache: Arc<K>,
        ledger: Arc<S>,
        registry: Arc<ActiveRunRegistry>,
        gate: Arc<RateGate>,
        pacing: SyncPacing,
    ) -> Self {
        let syncer = CampaignDataSyncer::new(
            Arc::clone(&upstream),
            report_center,
            Arc::clone(&cache),
            Arc::clone(&ledger),
            Arc::clone(&gate),
            pacing,
        );
        Self {
            clients,
            upstream,
            cache,
            ledger,
            registry,
            syncer,
            gate,
            pacing,
        }
    }

    pub async fn sync_client(
        &self,
        client_id: Uuid,
        options: SyncOptions,
        cancel: &CancellationToken,
    ) -> SyncRun {
        let Some(_guard) = self.registry.try_acquire(client_id) else {
            tracing::info!(client = %client_id, "sync already in flight, skipping");
            return SyncRun::already_running(client_id);
        };
        let mut run = SyncRun::started(client_id);

        let client = match self.clients.get_by_id(client_id).await {
            Ok(Some(client)) => client,
            Ok(None) => {
                run.finish(RunStatus::Error, Some("client not found".to_string()));
                return run;
            }
            Err(e) => {
                run.finish(
                    RunStatus::Error,
                    Some(format!("failed to load client: {e}")),
                );
                return run;
            }
        };
        let Some(org_id) = client
            .upstream_org_id
            .as_deref()
            .filter(|org| !org.is_empty())
        else {
            run.finish(
                RunStatus::Error,
                Some("client is not linked to an upstream organization".to_string()),
            );
            return run;
        };

        tracing::info!(
            client = %client_id,
            org = org_id,
            full_sync = options.full_sync,
            "starting client sync"
        );

        // The campaign list is the run's backbone: without it there is
        // nothing to drill into, so a failure here ends the run.
        self.gate.pause(self.pacing.category_gap, cancel).await;
        let campaigns = match self.upstream.list_campaigns_with_ads(org_id).await {
            Ok(campaigns) => campaigns,
            Err(e) => {
                let msg = format!("campaign list fetch failed: {e}");
                tracing::error!(client = %client_id, error = %e, "campaign list fetch failed");
                run.categories.campaigns.errors.push(msg.clone());
                self.record_status(
                    client_id,
                    category::CAMPAIGNS,
                    STATUS_ERROR,
                    0,
                    Some(&e.to_string()),
                )
                .await;
                run.finish(RunStatus::Error, Some(msg));
                return run;
            }
        };

        let records: Vec<CampaignRecord> = campaigns.iter().map(campaign_to_record).collect();
        match self.cache.cache_campaigns(client_id, &records).await {
            Ok(count) => {
                run.categories.campaigns.synced = count as u64;
                self.record_status(client_id, category::CAMPAIGNS, STATUS_SUCCESS, count as i64, None)
                    .await;
            }
            Err(e) => {
                tracing::warn!(client = %client_id, error = %e, "caching campaign list failed");
                run.categories
                    .campaigns
                    .errors
                    .push(format!("caching campaign list failed: {e}"));
                self.record_status(
                    client_id,
                    category::CAMPAIGNS,
                    STATUS_ERROR,
                    0,
                    Some(&e.to_string()),
                )
                .await;
            }
        }

        for campaign in campaigns.iter().filter(|c| c.is_drillable()) {
            if cancel.is_cancelled() {
                tracing::info!(client = %client_id, "sync cancelled, stopping campaign loop");
                break;
            }
            self.gate.pause(self.pacing.campaign_gap, cancel).await;
            let outcome = self
                .syncer
                .sync_campaign(client_id, org_id, campaign, &options, cancel)
                .await;
            run.categories.merge_campaign(&outcome);
        }

        // Category-level failures stay visible in the nested error lists
        // but do not flip the run status; only the fatal paths above do.
        let error_count = run.categories.total_errors();
        run.finish(RunStatus::Success, None);
        tracing::info!(
            client = %client_id,
            status = ?run.status,
            campaigns = run.categories.campaigns.synced,
            stats = run.categories.stats.synced,
            ads = run.categories.ads.synced,
            errors = error_count,
            "client sync finished"
        );
        run
    }

    async fn record_status(
        &self,
        client_id: Uuid,
        cat: &str,
        status: &str,
        count: i64,
        error: Option<&str>,
    ) {
        if let Err(e) = self
            .ledger
            .update_status(client_id, cat, None, status, count, error)
            .await
        {
            tracing::warn!(category = cat, error = %e, "failed to write sync status");
        }
    }
}
