//! In-memory doubles for the engine's seams, shared by the unit tests
//! in `campaign`, `orchestrator` and `fleet`.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use serde_json::Value;
use uuid::Uuid;

use adlift_common::error::{AdliftError, AdliftResult};
use adlift_db::cache::models::{
    AdRecord, CampaignRecord, GeoFenceRecord, KeywordRecord, ReportMetric, StatRecord,
};
use adlift_db::cache::repositories::CampaignCacheRepository;
use adlift_db::clients::models::Client;
use adlift_db::clients::repositories::ClientRepository;
use adlift_db::sync::models::SyncStatusRecord;
use adlift_db::sync::repositories::SyncStatusRepository;

use crate::report_center::api::ReportCenterApi;
use crate::upstream::api::UpstreamApi;
use crate::upstream::models::{Ad, Campaign, CampaignStat, GeoFence, Keyword};

// ── Builders ────────────────────────────────────────────────────

pub fn campaign(id: &str, status: &str) -> Campaign {
    Campaign {
        id: id.to_string(),
        name: format!("Campaign {id}"),
        status: status.to_string(),
        ads: vec![],
    }
}

pub fn client_with_org(org: Option<&str>) -> Client {
    Client {
        id: Uuid::new_v4(),
        name: "Acme Motors".to_string(),
        upstream_org_id: org.map(str::to_string),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn stat_rows(n: usize) -> Vec<CampaignStat> {
    let first: NaiveDate = "2026-07-01".parse().unwrap();
    (0..n)
        .map(|i| CampaignStat {
            date: first + Duration::days(i as i64),
            impressions: 100 + i as i64,
            clicks: i as i64,
            total_spend: 1.5 * i as f64,
        })
        .collect()
}

pub fn ad_rows(n: usize) -> Vec<Ad> {
    (0..n)
        .map(|i| Ad {
            id: format!("a-{i}"),
            name: Some(format!("Ad {i}")),
            status: Some("Active".to_string()),
        })
        .collect()
}

pub fn keyword_rows(n: usize) -> Vec<Keyword> {
    (0..n)
        .map(|i| Keyword {
            keyword: format!("keyword-{i}"),
            bid: Some(0.25),
        })
        .collect()
}

pub fn geo_fence_rows(n: usize) -> Vec<GeoFence> {
    (0..n)
        .map(|i| GeoFence {
            id: format!("g-{i}"),
            name: Some(format!("Fence {i}")),
            latitude: Some(40.0),
            longitude: Some(-105.0),
            radius_meters: Some(500.0),
        })
        .collect()
}

pub fn rc_rows(n: usize) -> Vec<Value> {
    (0..n)
        .map(|i| serde_json::json!({"segment": i, "impressions": 100 * i}))
        .collect()
}

// ── Upstream ────────────────────────────────────────────────────

#[derive(Default)]
pub struct MockUpstream {
    pub campaigns: Vec<Campaign>,
    pub stats: HashMap<String, Vec<CampaignStat>>,
    pub ads: HashMap<String, Vec<Ad>>,
    pub keywords: HashMap<String, Vec<Keyword>>,
    pub geo_fences: HashMap<String, Vec<GeoFence>>,
    pub fail_list: bool,
    pub fail_stats: HashSet<String>,
    pub fail_ads: HashSet<String>,
    pub fail_keywords: HashSet<String>,
    pub fail_geo_fences: HashSet<String>,
    fetches: Mutex<Vec<String>>,
}

impl MockUpstream {
    fn log(&self, op: String) {
        self.fetches.lock().unwrap().push(op);
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.lock().unwrap().len()
    }

    pub fn fetches(&self) -> Vec<String> {
        self.fetches.lock().unwrap().clone()
    }
}

#[async_trait]
impl UpstreamApi for MockUpstream {
    async fn list_campaigns_with_ads(&self, org_id: &str) -> AdliftResult<Vec<Campaign>> {
        self.log(format!("list:{org_id}"));
        if self.fail_list {
            return Err(AdliftError::Upstream("campaign list unavailable".to_string()));
        }
        Ok(self.campaigns.clone())
    }

    async fn campaign_stats(
        &self,
        _org_id: &str,
        campaign_id: &str,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> AdliftResult<Vec<CampaignStat>> {
        self.log(format!("stats:{campaign_id}"));
        if self.fail_stats.contains(campaign_id) {
            return Err(AdliftError::Upstream("stats endpoint returned 500".to_string()));
        }
        Ok(self.stats.get(campaign_id).cloned().unwrap_or_default())
    }

    async fn campaign_ads(&self, _org_id: &str, campaign_id: &str) -> AdliftResult<Vec<Ad>> {
        self.log(format!("ads:{campaign_id}"));
        if self.fail_ads.contains(campaign_id) {
            return Err(AdliftError::Upstream("ads endpoint returned 500".to_string()));
        }
        Ok(self.ads.get(campaign_id).cloned().unwrap_or_default())
    }

    async fn campaign_keywords(
        &self,
        _org_id: &str,
        campaign_id: &str,
    ) -> AdliftResult<Vec<Keyword>> {
        self.log(format!("keywords:{campaign_id}"));
        if self.fail_keywords.contains(campaign_id) {
            return Err(AdliftError::Upstream("keyword download not supported".to_string()));
        }
        Ok(self.keywords.get(campaign_id).cloned().unwrap_or_default())
    }

    async fn campaign_geo_fences(&self, campaign_id: &str) -> AdliftResult<Vec<GeoFence>> {
        self.log(format!("geo_fences:{campaign_id}"));
        if self.fail_geo_fences.contains(campaign_id) {
            return Err(AdliftError::Upstream("geo-fence endpoint returned 500".to_string()));
        }
        Ok(self.geo_fences.get(campaign_id).cloned().unwrap_or_default())
    }
}

// ── Report center ───────────────────────────────────────────────

#[derive(Default)]
pub struct MockReportCenter {
    /// Keyed by `ReportMetric::as_str()`.
    pub rows: HashMap<&'static str, Vec<Value>>,
    pub fail: HashSet<&'static str>,
}

impl MockReportCenter {
    fn result(&self, metric: &str) -> AdliftResult<Vec<Value>> {
        if self.fail.contains(metric) {
            return Err(AdliftError::Upstream(format!("{metric} report unavailable")));
        }
        Ok(self.rows.get(metric).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl ReportCenterApi for MockReportCenter {
    async fn keyword_performance(
        &self,
        _org_id: &str,
        _campaign_id: &str,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> AdliftResult<Vec<Value>> {
        self.result("keyword")
    }

    async fn location_performance(
        &self,
        _org_id: &str,
        _campaign_id: &str,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> AdliftResult<Vec<Value>> {
        self.result("location")
    }

    async fn device_breakdown(
        &self,
        _org_id: &str,
        _campaign_id: &str,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> AdliftResult<Vec<Value>> {
        self.result("device")
    }

    async fn geo_fence_performance(
        &self,
        _org_id: &str,
        _campaign_id: &str,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> AdliftResult<Vec<Value>> {
        self.result("geo_fence")
    }

    async fn viewability_metrics(
        &self,
        _org_id: &str,
        _campaign_id: &str,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> AdliftResult<Vec<Value>> {
        self.result("viewability")
    }

    async fn conversions(
        &self,
        _org_id: &str,
        _campaign_id: &str,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> AdliftResult<Vec<Value>> {
        self.result("conversions")
    }
}

// ── Cache ───────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryCache {
    watermarks: Mutex<HashMap<String, NaiveDate>>,
    writes: Mutex<Vec<String>>,
    pub fail_watermark: bool,
}

impl MemoryCache {
    pub fn failing_watermark() -> Self {
        Self {
            fail_watermark: true,
            ..Self::default()
        }
    }

    pub fn set_watermark(&self, campaign_id: &str, date: NaiveDate) {
        self.watermarks
            .lock()
            .unwrap()
            .insert(campaign_id.to_string(), date);
    }

    /// Every write as `"<kind>:<campaign>:<rows>"`, in order.
    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().unwrap().clone()
    }

    fn record(&self, kind: &str, campaign_id: &str, rows: usize) {
        self.writes
            .lock()
            .unwrap()
            .push(format!("{kind}:{campaign_id}:{rows}"));
    }
}

#[async_trait]
impl CampaignCacheRepository for MemoryCache {
    async fn cache_campaigns(
        &self,
        _client_id: Uuid,
        campaigns: &[CampaignRecord],
    ) -> AdliftResult<usize> {
        self.record("campaigns", "-", campaigns.len());
        Ok(campaigns.len())
    }

    async fn cache_campaign_stats(
        &self,
        _client_id: Uuid,
        campaign_id: &str,
        rows: &[StatRecord],
    ) -> AdliftResult<usize> {
        self.record("stats", campaign_id, rows.len());
        if let Some(max) = rows.iter().map(|r| r.stat_date).max() {
            self.set_watermark(campaign_id, max);
        }
        Ok(rows.len())
    }

    async fn cache_ads(
        &self,
        _client_id: Uuid,
        campaign_id: &str,
        ads: &[AdRecord],
    ) -> AdliftResult<usize> {
        self.record("ads", campaign_id, ads.len());
        Ok(ads.len())
    }

    async fn cache_keywords(
        &self,
        _client_id: Uuid,
        campaign_id: &str,
        keywords: &[KeywordRecord],
    ) -> AdliftResult<usize> {
        self.record("keywords", campaign_id, keywords.len());
        Ok(keywords.len())
    }

    async fn cache_geo_fences(
        &self,
        _client_id: Uuid,
        campaign_id: &str,
        fences: &[GeoFenceRecord],
    ) -> AdliftResult<usize> {
        self.record("geo_fences", campaign_id, fences.len());
        Ok(fences.len())
    }

    async fn cache_report_metric(
        &self,
        _client_id: Uuid,
        campaign_id: &str,
        metric: ReportMetric,
        _start: NaiveDate,
        _end: NaiveDate,
        rows: &[Value],
    ) -> AdliftResult<usize> {
        self.record(metric.as_str(), campaign_id, rows.len());
        Ok(rows.len())
    }

    async fn last_cached_stats_date(
        &self,
        _client_id: Uuid,
        campaign_id: &str,
    ) -> AdliftResult<Option<NaiveDate>> {
        if self.fail_watermark {
            return Err(AdliftError::Database("watermark query failed".to_string()));
        }
        Ok(self.watermarks.lock().unwrap().get(campaign_id).copied())
    }
}

// ── Clients ─────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryClients {
    pub clients: Vec<Client>,
    pub fail_list: bool,
}

#[async_trait]
impl ClientRepository for MemoryClients {
    async fn get_by_id(&self, id: Uuid) -> AdliftResult<Option<Client>> {
        Ok(self.clients.iter().find(|c| c.id == id).cloned())
    }

    async fn list_all(&self) -> AdliftResult<Vec<Client>> {
        if self.fail_list {
            return Err(AdliftError::Database("clients table unavailable".to_string()));
        }
        Ok(self.clients.clone())
    }
}

// ── Ledger ──────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct LedgerEntry {
    pub client_id: Uuid,
    pub category: String,
    pub campaign_id: Option<String>,
    pub status: String,
    pub count: i64,
    pub error_message: Option<String>,
}

#[derive(Default)]
pub struct MemoryLedger {
    entries: Mutex<Vec<LedgerEntry>>,
    pub fail: bool,
}

impl MemoryLedger {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn entries(&self) -> Vec<LedgerEntry> {
        self.entries.lock().unwrap().clone()
    }

    pub fn entries_for(&self, category: &str) -> Vec<LedgerEntry> {
        self.entries()
            .into_iter()
            .filter(|e| e.category == category)
            .collect()
    }
}

#[async_trait]
impl SyncStatusRepository for MemoryLedger {
    async fn update_status(
        &self,
        client_id: Uuid,
        category: &str,
        campaign_id: Option<&str>,
        status: &str,
        record_count: i64,
        error_message: Option<&str>,
    ) -> AdliftResult<()> {
        if self.fail {
            return Err(AdliftError::Database("sync_status insert failed".to_string()));
        }
        self.entries.lock().unwrap().push(LedgerEntry {
            client_id,
            category: category.to_string(),
            campaign_id: campaign_id.map(str::to_string),
            status: status.to_string(),
            count: record_count,
            error_message: error_message.map(str::to_string),
        });
        Ok(())
    }

    async fn recent_statuses(
        &self,
        client_id: Uuid,
        limit: i64,
    ) -> AdliftResult<Vec<SyncStatusRecord>> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|e| e.client_id == client_id)
            .take(limit as usize)
            .map(|e| SyncStatusRecord {
                id: Uuid::new_v4(),
                client_id: e.client_id,
                category: e.category.clone(),
                campaign_id: e.campaign_id.clone(),
                status: e.status.clone(),
                record_count: e.count,
                error_message: e.error_message.clone(),
                synced_at: Utc::now(),
            })
            .collect())
    }
}
