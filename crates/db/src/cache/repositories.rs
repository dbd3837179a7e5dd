use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;
use uuid::Uuid;

use crate::cache::models::{
    AdRecord, CampaignRecord, GeoFenceRecord, KeywordRecord, ReportMetric, StatRecord,
};
use adlift_common::error::AdliftResult;

/// Persistence for everything the sync engine mirrors from the upstream
/// platform. Each writer returns the number of rows stored.
#[async_trait]
pub trait CampaignCacheRepository: Send + Sync {
    async fn cache_campaigns(
        &self,
        client_id: Uuid,
        campaigns: &[CampaignRecord],
    ) -> AdliftResult<usize>;

    async fn cache_campaign_stats(
        &self,
        client_id: Uuid,
        campaign_id: &str,
        rows: &[StatRecord],
    ) -> AdliftResult<usize>;

    async fn cache_ads(
        &self,
        client_id: Uuid,
        campaign_id: &str,
        ads: &[AdRecord],
    ) -> AdliftResult<usize>;

    async fn cache_keywords(
        &self,
        client_id: Uuid,
        campaign_id: &str,
        keywords: &[KeywordRecord],
    ) -> AdliftResult<usize>;

    async fn cache_geo_fences(
        &self,
        client_id: Uuid,
        campaign_id: &str,
        fences: &[GeoFenceRecord],
    ) -> AdliftResult<usize>;

    async fn cache_report_metric(
        &self,
        client_id: Uuid,
        campaign_id: &str,
        metric: ReportMetric,
        start: NaiveDate,
        end: NaiveDate,
        rows: &[Value],
    ) -> AdliftResult<usize>;

    /// The incremental watermark: the most recent date with cached stats
    /// for this (client, campaign) pair, or `None` if never synced.
    async fn last_cached_stats_date(
        &self,
        client_id: Uuid,
        campaign_id: &str,
    ) -> AdliftResult<Option<NaiveDate>>;
}
