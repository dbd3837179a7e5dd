use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A campaign row as stored in the local cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignRecord {
    pub campaign_id: String,
    pub name: String,
    pub status: String,
    pub payload: Option<Value>,
}

/// One day of campaign stats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatRecord {
    pub stat_date: NaiveDate,
    pub impressions: i64,
    pub clicks: i64,
    pub total_spend: f64,
    pub payload: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdRecord {
    pub ad_id: String,
    pub name: Option<String>,
    pub status: Option<String>,
    pub payload: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordRecord {
    pub keyword: String,
    pub bid: Option<f64>,
    pub payload: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoFenceRecord {
    pub fence_id: String,
    pub name: Option<String>,
    pub payload: Option<Value>,
}

/// The six extended report-center breakdowns. Rows are stored as raw
/// JSON payloads keyed by metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportMetric {
    Keyword,
    Location,
    Device,
    GeoFence,
    Viewability,
    Conversions,
}

impl ReportMetric {
    pub const ALL: [ReportMetric; 6] = [
        ReportMetric::Keyword,
        ReportMetric::Location,
        ReportMetric::Device,
        ReportMetric::GeoFence,
        ReportMetric::Viewability,
        ReportMetric::Conversions,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportMetric::Keyword => "keyword",
            ReportMetric::Location => "location",
            ReportMetric::Device => "device",
            ReportMetric::GeoFence => "geo_fence",
            ReportMetric::Viewability => "viewability",
            ReportMetric::Conversions => "conversions",
        }
    }
}
