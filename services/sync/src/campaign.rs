use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use adlift_common::error::AdliftResult;
use adlift_db::cache::models::{
    AdRecord, CampaignRecord, GeoFenceRecord, KeywordRecord, ReportMetric, StatRecord,
};
use adlift_db::cache::repositories::CampaignCacheRepository;
use adlift_db::sync::models::{STATUS_ERROR, STATUS_SUCCESS};
use adlift_db::sync::repositories::SyncStatusRepository;

use crate::pacing::{RateGate, SyncPacing};
use crate::report_center::api::ReportCenterApi;
use crate::run::{category, CampaignOutcome, FetchOutcome, SyncOptions};
use crate::upstream::api::UpstreamApi;
use crate::upstream::models::{Ad, Campaign, CampaignStat, GeoFence, Keyword};

pub const FULL_SYNC_DAYS: i64 = 90;
pub const DEFAULT_BACKFILL_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Compute the incremental fetch window, or `None` if the campaign is
/// already current.
///
/// The window ends at the last complete day: upstream stats for the
/// current day are still accumulating, and caching them would advance
/// the watermark past data that is not final yet.
pub fn compute_window(
    full_sync: bool,
    watermark: Option<NaiveDate>,
    today: NaiveDate,
) -> Option<DateWindow> {
    let end = today - Duration::days(1);
    let start = if full_sync {
        end - Duration::days(FULL_SYNC_DAYS)
    } else {
        match watermark {
            Some(wm) => wm + Duration::days(1),
            None => end - Duration::days(DEFAULT_BACKFILL_DAYS),
        }
    };
    (start <= end).then_some(DateWindow { start, end })
}

pub(crate) fn campaign_to_record(c: &Campaign) -> CampaignRecord {
    CampaignRecord {
        campaign_id: c.id.clone(),
        name: c.name.clone(),
        status: c.status.clone(),
        payload: serde_json::to_value(c).ok(),
    }
}

fn stat_to_record(s: &CampaignStat) -> StatRecord {
    StatRecord {
        stat_date: s.date,
        impressions: s.impressions,
        clicks: s.clicks,
        total_spend: s.total_spend,
        payload: serde_json::to_value(s).ok(),
    }
}

fn ad_to_record(a: &Ad) -> AdRecord {
    AdRecord {
        ad_id: a.id.clone(),
        name: a.name.clone(),
        status: a.status.clone(),
        payload: serde_json::to_value(a).ok(),
    }
}

fn keyword_to_record(k: &Keyword) -> KeywordRecord {
    KeywordRecord {
        keyword: k.keyword.clone(),
        bid: k.bid,
        payload: serde_json::to_value(k).ok(),
    }
}

fn geo_fence_to_record(g: &GeoFence) -> GeoFenceRecord {
    GeoFenceRecord {
        fence_id: g.id.clone(),
        name: g.name.clone(),
        payload: serde_json::to_value(g).ok(),
    }
}

/// Fetches and caches every data category for a single campaign.
/// Failures are isolated per category and folded into the returned
/// outcome; nothing propagates to the caller.
pub struct CampaignDataSyncer<U, R, K, S> {
    upstream: Arc<U>,
    report_center: Option<Arc<R>>,
    cache: Arc<K>,
    ledger: Arc<S>,
    gate: Arc<RateGate>,
    pacing: SyncPacing,
}

impl<U, R, K, S> CampaignDataSyncer<U, R, K, S>
where
    U: UpstreamApi,
    R: ReportCenterApi,
    K: CampaignCacheRepository,
    S: SyncStatusRepository,
{
    pub fn new(
        upstream: Arc<U>,
        report_center: Option<Arc<R>>,
        cache: Arc<K>,
        ledger: Arc<S>,
        gate: Arc<RateGate>,
        pacing: SyncPacing,
    ) -> Self {
        Self {
            upstream,
            report_center,
            cache,
            ledger,
            gate,
            pacing,
        }
    }

    pub async fn sync_campaign(
        &self,
        client_id: Uuid,
        org_id: &str,
        campaign: &Campaign,
        options: &SyncOptions,
        cancel: &CancellationToken,
    ) -> CampaignOutcome {
        let mut outcome = CampaignOutcome::new(&campaign.id);
        let today = chrono::Utc::now().date_naive();

        // A watermark lookup failure disables only the window-dependent
        // categories (stats, report-center); the others are attempted
        // regardless.
        let window = if options.full_sync {
            compute_window(true, None, today)
        } else {
            match self
                .cache
                .last_cached_stats_date(client_id, &campaign.id)
                .await
            {
                Ok(wm) => {
                    let window = compute_window(false, wm, today);
                    if window.is_none() {
                        tracing::debug!(campaign = %campaign.id, "already current, skipping");
                        outcome.skipped = true;
                        return outcome;
                    }
                    window
                }
                Err(e) => {
                    tracing::warn!(campaign = %campaign.id, error = %e, "watermark lookup failed");
                    outcome.stats.errors.push(format!(
                        "campaign {} ({}): failed to read stats watermark: {e}",
                        campaign.name, campaign.id
                    ));
                    self.record_status(
                        client_id,
                        category::STATS,
                        Some(&campaign.id),
                        STATUS_ERROR,
                        0,
                        Some(&e.to_string()),
                    )
                    .await;
                    None
                }
            }
        };

        if let Some(window) = window {
            tracing::info!(
                campaign = %campaign.id,
                start = %window.start,
                end = %window.end,
                full_sync = options.full_sync,
                "syncing campaign"
            );

            self.gate.pause(self.pacing.category_gap, cancel).await;
            match self.sync_stats(client_id, org_id, campaign, window).await {
                Ok(count) => {
                    outcome.stats.synced += count;
                    self.record_status(
                        client_id,
                        category::STATS,
                        Some(&campaign.id),
                        STATUS_SUCCESS,
                        count as i64,
                        None,
                    )
                    .await;
                }
                Err(e) => {
                    tracing::warn!(campaign = %campaign.id, error = %e, "stats sync failed");
                    outcome.stats.errors.push(format!(
                        "campaign {} ({}): stats sync failed: {e}",
                        campaign.name, campaign.id
                    ));
                    self.record_status(
                        client_id,
                        category::STATS,
                        Some(&campaign.id),
                        STATUS_ERROR,
                        0,
                        Some(&e.to_string()),
                    )
                    .await;
                }
            }
            if cancel.is_cancelled() {
                return outcome;
            }
        }

        self.gate.pause(self.pacing.category_gap, cancel).await;
        match self.sync_ads(client_id, org_id, campaign).await {
            Ok(count) => {
                outcome.ads.synced += count;
                self.record_status(
                    client_id,
                    category::ADS,
                    Some(&campaign.id),
                    STATUS_SUCCESS,
                    count as i64,
                    None,
                )
                .await;
            }
            Err(e) => {
                tracing::warn!(campaign = %campaign.id, error = %e, "ads sync failed");
                outcome.ads.errors.push(format!(
                    "campaign {} ({}): ads sync failed: {e}",
                    campaign.name, campaign.id
                ));
                self.record_status(
                    client_id,
                    category::ADS,
                    Some(&campaign.id),
                    STATUS_ERROR,
                    0,
                    Some(&e.to_string()),
                )
                .await;
            }
        }
        if cancel.is_cancelled() {
            return outcome;
        }

        // Keywords are soft-optional: many campaigns have no keyword
        // targeting, so a gap here is expected and never a run error.
        self.gate.pause(self.pacing.category_gap, cancel).await;
        match self.sync_keywords(client_id, org_id, campaign).await {
            FetchOutcome::Synced(count) => outcome.keywords.synced += count,
            FetchOutcome::NotAvailable => {}
            FetchOutcome::Failed(reason) => {
                tracing::warn!(campaign = %campaign.id, reason, "keywords unavailable, skipping");
            }
        }
        if cancel.is_cancelled() {
            return outcome;
        }

        // Geo-fences: soft-optional like keywords, but the attempt is
        // recorded in the status ledger.
        self.gate.pause(self.pacing.category_gap, cancel).await;
        match self.sync_geo_fences(client_id, campaign).await {
            FetchOutcome::Synced(count) => {
                outcome.geo_fences.synced += count;
                self.record_status(
                    client_id,
                    category::GEO_FENCES,
                    Some(&campaign.id),
                    STATUS_SUCCESS,
                    count as i64,
                    None,
                )
                .await;
            }
            FetchOutcome::NotAvailable => {
                self.record_status(
                    client_id,
                    category::GEO_FENCES,
                    Some(&campaign.id),
                    STATUS_SUCCESS,
                    0,
                    None,
                )
                .await;
            }
            FetchOutcome::Failed(reason) => {
                tracing::warn!(campaign = %campaign.id, reason, "geo-fences unavailable, skipping");
                self.record_status(
                    client_id,
                    category::GEO_FENCES,
                    Some(&campaign.id),
                    STATUS_ERROR,
                    0,
                    Some(&reason),
                )
                .await;
            }
        }
        if cancel.is_cancelled() {
            return outcome;
        }

        if options.include_report_center {
            if let (Some(rc), Some(window)) = (&self.report_center, window) {
                let mut synced = 0u64;
                for metric in ReportMetric::ALL {
                    if cancel.is_cancelled() {
                        break;
                    }
                    self.gate.pause(self.pacing.report_metric_gap, cancel).await;
                    match self
                        .sync_report_metric(rc.as_ref(), client_id, org_id, campaign, metric, window)
                        .await
                    {
                        Ok(count) => synced += count,
                        Err(e) => {
                            tracing::warn!(
                                campaign = %campaign.id,
                                metric = metric.as_str(),
                                error = %e,
                                "report-center metric unavailable, skipping"
                            );
                        }
                    }
                }
                outcome.report_center.synced = synced;
                // One rollup ledger entry for all six metrics.
                self.record_status(
                    client_id,
                    category::REPORT_CENTER,
                    Some(&campaign.id),
                    STATUS_SUCCESS,
                    synced as i64,
                    None,
                )
                .await;
            }
        }

        outcome
    }

    async fn sync_stats(
        &self,
        client_id: Uuid,
        org_id: &str,
        campaign: &Campaign,
        window: DateWindow,
    ) -> AdliftResult<u64> {
        let rows = self
            .upstream
            .campaign_stats(org_id, &campaign.id, window.start, window.end)
            .await?;
        if rows.is_empty() {
            return Ok(0);
        }
        let records: Vec<StatRecord> = rows.iter().map(stat_to_record).collect();
        let count = self
            .cache
            .cache_campaign_stats(client_id, &campaign.id, &records)
            .await?;
        Ok(count as u64)
    }

    async fn sync_ads(
        &self,
        client_id: Uuid,
        org_id: &str,
        campaign: &Campaign,
    ) -> AdliftResult<u64> {
        let ads = self.upstream.campaign_ads(org_id, &campaign.id).await?;
        if ads.is_empty() {
            return Ok(0);
        }
        let records: Vec<AdRecord> = ads.iter().map(ad_to_record).collect();
        let count = self.cache.cache_ads(client_id, &campaign.id, &records).await?;
        Ok(count as u64)
    }

    async fn sync_keywords(
        &self,
        client_id: Uuid,
        org_id: &str,
        campaign: &Campaign,
    ) -> FetchOutcome<u64> {
        match self.upstream.campaign_keywords(org_id, &campaign.id).await {
            Ok(keywords) if keywords.is_empty() => FetchOutcome::NotAvailable,
            Ok(keywords) => {
                let records: Vec<KeywordRecord> = keywords.iter().map(keyword_to_record).collect();
                match self
                    .cache
                    .cache_keywords(client_id, &campaign.id, &records)
                    .await
                {
                    Ok(count) => FetchOutcome::Synced(count as u64),
                    Err(e) => FetchOutcome::Failed(e.to_string()),
                }
            }
            Err(e) => FetchOutcome::Failed(e.to_string()),
        }
    }

    async fn sync_geo_fences(&self, client_id: Uuid, campaign: &Campaign) -> FetchOutcome<u64> {
        match self.upstream.campaign_geo_fences(&campaign.id).await {
            Ok(fences) if fences.is_empty() => FetchOutcome::NotAvailable,
            Ok(fences) => {
                let records: Vec<GeoFenceRecord> =
                    fences.iter().map(geo_fence_to_record).collect();
                match self
                    .cache
                    .cache_geo_fences(client_id, &campaign.id, &records)
                    .await
                {
                    Ok(count) => FetchOutcome::Synced(count as u64),
                    Err(e) => FetchOutcome::Failed(e.to_string()),
                }
            }
            Err(e) => FetchOutcome::Failed(e.to_string()),
        }
    }

    async fn sync_report_metric(
        &self,
        rc: &R,
        client_id: Uuid,
        org_id: &str,
        campaign: &Campaign,
        metric: ReportMetric,
        window: DateWindow,
    ) -> AdliftResult<u64> {
        let rows = match metric {
            ReportMetric::Keyword => {
                rc.keyword_performance(org_id, &campaign.id, window.start, window.end)
                    .await?
            }
            ReportMetric::Location => {
                rc.location_performance(org_id, &campaign.id, window.start, window.end)
                    .await?
            }
            ReportMetric::Device => {
                rc.device_breakdown(org_id, &campaign.id, window.start, window.end)
                    .await?
            }
            ReportMetric::GeoFence => {
                rc.geo_fence_performance(org_id, &campaign.id, window.start, window.end)
                    .await?
            }
            ReportMetric::Viewability => {
                rc.viewability_metrics(org_id, &campaign.id, window.start, window.end)
                    .await?
            }
            ReportMetric::Conversions => {
                rc.conversions(org_id, &campaign.id, window.start, window.end)
                    .await?
            }
        };
        if rows.is_empty() {
            return Ok(0);
        }
        let count = self
            .cache
            .cache_report_metric(
                client_id,
                &campaign.id,
                metric,
                window.start,
                window.end,
                &rows,
            )
            .await?;
        Ok(count as u64)
    }

    async fn record_status(
        &self,
        client_id: Uuid,
        cat: &str,
        campaign_id: Option<&str>,
        status: &str,
        count: i64,
        error: Option<&str>,
    ) {
        if let Err(e) = self
            .ledger
            .update_status(client_id, cat, campaign_id, status, count, error)
            .await
        {
            tracing::warn!(category = cat, error = %e, "failed to write sync status");
        }
    }
}
