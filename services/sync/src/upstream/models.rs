use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A campaign from the upstream platform's campaign listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub id: String,
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub ads: Vec<Ad>,
}

impl Campaign {
    /// Only campaigns currently delivering are drilled into for stats,
    /// ads, keywords and the extended metrics. Others are cached from
    /// the listing but not fetched further.
    pub fn is_drillable(&self) -> bool {
        matches!(self.status.as_str(), "Active" | "Serving")
    }
}

/// One day of by-day campaign stats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignStat {
    pub date: NaiveDate,
    #[serde(default)]
    pub impressions: i64,
    #[serde(default)]
    pub clicks: i64,
    #[serde(default)]
    pub total_spend: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ad {
    pub id: String,
    pub name: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Keyword {
    pub keyword: String,
    pub bid: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoFence {
    pub id: String,
    pub name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius_meters: Option<f64>,
}

// Response envelopes. Every list is plain-empty (never null) when no
// data exists.

#[derive(Debug, Deserialize)]
pub struct CampaignListResponse {
    #[serde(default)]
    pub campaigns: Vec<Campaign>,
}

#[derive(Debug, Deserialize)]
pub struct StatsResponse {
    #[serde(default)]
    pub stats: Vec<CampaignStat>,
}

#[derive(Debug, Deserialize)]
pub struct AdsResponse {
    #[serde(default)]
    pub ads: Vec<Ad>,
}

#[derive(Debug, Deserialize)]
pub struct KeywordsResponse {
    #[serde(default)]
    pub keywords: Vec<Keyword>,
}

#[derive(Debug, Deserialize)]
pub struct GeoFencesResponse {
    #[serde(default)]
    pub geo_fences: Vec<GeoFence>,
}
