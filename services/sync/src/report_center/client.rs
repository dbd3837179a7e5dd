use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use adlift_common::error::{AdliftError, AdliftResult};

use super::api::ReportCenterApi;
use crate::http::get_json_with_retry;

#[derive(Debug, Clone)]
pub struct ReportCenterClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub max_retries: u32,
    pub timeout_secs: u64,
}

impl ReportCenterClientConfig {
    pub fn from_env() -> Option<Self> {
        let base_url = std::env::var("REPORT_CENTER_BASE_URL").ok()?;
        let api_key = std::env::var("REPORT_CENTER_API_KEY").ok()?;
        let max_retries = std::env::var("REPORT_CENTER_MAX_RETRIES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3);
        let timeout_secs = std::env::var("REPORT_CENTER_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(60);

        Some(Self {
            base_url,
            api_key,
            max_retries,
            timeout_secs,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ReportResponse {
    #[serde(default)]
    data: Vec<Value>,
}

#[derive(Clone)]
pub struct ReportCenterClient {
    client: Client,
    config: ReportCenterClientConfig,
}

impl ReportCenterClient {
    pub fn new(config: ReportCenterClientConfig) -> Result<Self, reqwest::Error> {
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

    async fn fetch_report(
        &self,
        report: &str,
        org_id: &str,
        campaign_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AdliftResult<Vec<Value>> {
        let url = format!(
            "{}/api/report_center/campaigns/{campaign_id}/{report}?organization={org_id}&start_date={start}&end_date={end}",
            self.config.base_url
        );
        let response: ReportResponse = get_json_with_retry(
            || {
                self.client
                    .get(&url)
                    .header("X-Api-Key", &self.config.api_key)
            },
            self.config.max_retries,
        )
        .await
        .map_err(|e| AdliftError::Upstream(e.to_string()))?;

        Ok(response.data)
    }
}

#[async_trait]
impl ReportCenterApi for ReportCenterClient {
    async fn keyword_performance(
        &self,
        org_id: &str,
        campaign_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AdliftResult<Vec<Value>> {
        self.fetch_report("keyword_performance", org_id, campaign_id, start, end)
            .await
    }

    async fn location_performance(
        &self,
        org_id: &str,
        campaign_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AdliftResult<Vec<Value>> {
        self.fetch_report("location_performance", org_id, campaign_id, start, end)
            .await
    }

    async fn device_breakdown(
        &self,
        org_id: &str,
        campaign_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AdliftResult<Vec<Value>> {
        self.fetch_report("device_breakdown", org_id, campaign_id, start, end)
            .await
    }

    async fn geo_fence_performance(
        &self,
        org_id: &str,
        campaign_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AdliftResult<Vec<Value>> {
        self.fetch_report("geo_fence_performance", org_id, campaign_id, start, end)
            .await
    }

    async fn viewability_metrics(
        &self,
        org_id: &str,
        campaign_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AdliftResult<Vec<Value>> {
        self.fetch_report("viewability", org_id, campaign_id, start, end)
            .await
    }

    async fn conversions(
        &self,
        org_id: &str,
        campaign_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AdliftResult<Vec<Value>> {
        self.fetch_report("conversions", org_id, campaign_id, start, end)
            .await
    }
}
