use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;

use adlift_common::error::AdliftResult;

/// Extended performance breakdowns from the platform's report center.
/// These endpoints are slower and separately rate-limited, so the
/// engine paces and fault-isolates each one individually.
#[async_trait]
pub trait ReportCenterApi: Send + Sync {
    async fn keyword_performance(
        &self,
        org_id: &str,
        campaign_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AdliftResult<Vec<Value>>;

    async fn location_performance(
        &self,
        org_id: &str,
        campaign_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AdliftResult<Vec<Value>>;

    async fn device_breakdown(
        &self,
        org_id: &str,
        campaign_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AdliftResult<Vec<Value>>;

    async fn geo_fence_performance(
        &self,
        org_id: &str,
        campaign_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AdliftResult<Vec<Value>>;

    async fn viewability_metrics(
        &self,
        org_id: &str,
        campaign_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AdliftResult<Vec<Value>>;

    async fn conversions(
        &self,
        org_id: &str,
        campaign_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AdliftResult<Vec<Value>>;
}
