use async_trait::async_trait;
use chrono::NaiveDate;

use adlift_common::error::AdliftResult;

use super::models::{Ad, Campaign, CampaignStat, GeoFence, Keyword};

/// Typed access to the upstream advertising platform. Every method
/// returns an empty vector (never null) when no data exists.
#[async_trait]
pub trait UpstreamApi: Send + Sync {
    /// The full campaign list for an organization, ads included.
    async fn list_campaigns_with_ads(&self, org_id: &str) -> AdliftResult<Vec<Campaign>>;

    /// By-day stats for a campaign over an inclusive date window.
    async fn campaign_stats(
        &self,
        org_id: &str,
        campaign_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AdliftResult<Vec<CampaignStat>>;

    async fn campaign_ads(&self, org_id: &str, campaign_id: &str) -> AdliftResult<Vec<Ad>>;

    async fn campaign_keywords(&self, org_id: &str, campaign_id: &str)
        -> AdliftResult<Vec<Keyword>>;

    async fn campaign_geo_fences(&self, campaign_id: &str) -> AdliftResult<Vec<GeoFence>>;
}
