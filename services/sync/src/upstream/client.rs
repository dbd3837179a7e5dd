use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;

use adlift_common::error::{AdliftError, AdliftResult};

use super::api::UpstreamApi;
use super::models::{
    Ad, AdsResponse, Campaign, CampaignListResponse, CampaignStat, GeoFence, GeoFencesResponse,
    Keyword, KeywordsResponse, StatsResponse,
};
use crate::http::get_json_with_retry;

#[derive(Debug, Clone)]
pub struct UpstreamClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub max_retries: u32,
    pub timeout_secs: u64,
}

impl UpstreamClientConfig {
    pub fn from_env() -> Option<Self> {
        let base_url = std::env::var("UPSTREAM_BASE_URL").ok()?;
        let api_key = std::env::var("UPSTREAM_API_KEY").ok()?;
        let max_retries = std::env::var("UPSTREAM_MAX_RETRIES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3);
        let timeout_secs = std::env::var("UPSTREAM_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        Some(Self {
            base_url,
            api_key,
            max_retries,
            timeout_secs,
        })
    }
}

/// Reqwest-backed client for the advertising platform's REST API.
#[derive(Clone)]
pub struct AdPlatformClient {
    client: Client,
    config: UpstreamClientConfig,
}

impl AdPlatformClient {
    pub fn new(config: UpstreamClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    /// For testing: point the client at a specific base URL (e.g., wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.config.base_url = base_url.to_string();
        self
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, url: String) -> AdliftResult<T> {
        get_json_with_retry(
            || {
                self.client
                    .get(&url)
                    .header("X-Api-Key", &self.config.api_key)
            },
            self.config.max_retries,
        )
        .await
        .map_err(|e| AdliftError::Upstream(e.to_string()))
    }
}

#[async_trait]
impl UpstreamApi for AdPlatformClient {
    async fn list_campaigns_with_ads(&self, org_id: &str) -> AdliftResult<Vec<Campaign>> {
        let url = format!(
            "{}/api/organizations/{org_id}/campaigns?include=ads",
            self.config.base_url
        );
        let response: CampaignListResponse = self.get(url).await?;
        Ok(response.campaigns)
    }

    async fn campaign_stats(
        &self,
        org_id: &str,
        campaign_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AdliftResult<Vec<CampaignStat>> {
        let url = format!(
            "{}/api/organizations/{org_id}/campaigns/{campaign_id}/stats?start_date={start}&end_date={end}&by_day=true",
            self.config.base_url
        );
        let response: StatsResponse = self.get(url).await?;
        Ok(response.stats)
    }

    async fn campaign_ads(&self, org_id: &str, campaign_id: &str) -> AdliftResult<Vec<Ad>> {
        let url = format!(
            "{}/api/organizations/{org_id}/campaigns/{campaign_id}/ads",
            self.config.base_url
        );
        let response: AdsResponse = self.get(url).await?;
        Ok(response.ads)
    }

    async fn campaign_keywords(
        &self,
        org_id: &str,
        campaign_id: &str,
    ) -> AdliftResult<Vec<Keyword>> {
        let url = format!(
            "{}/api/organizations/{org_id}/campaigns/{campaign_id}/keywords/download",
            self.config.base_url
        );
        let response: KeywordsResponse = self.get(url).await?;
        Ok(response.keywords)
    }

    async fn campaign_geo_fences(&self, campaign_id: &str) -> AdliftResult<Vec<GeoFence>> {
        let url = format!(
            "{}/api/campaigns/{campaign_id}/geo_fences",
            self.config.base_url
        );
        let response: GeoFencesResponse = self.get(url).await?;
        Ok(response.geo_fences)
    }
}
