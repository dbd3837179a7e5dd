use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Category names as written to the sync status ledger.
pub mod category {
    pub const CAMPAIGNS: &str = "campaigns";
    pub const STATS: &str = "stats";
    pub const ADS: &str = "ads";
    pub const GEO_FENCES: &str = "geo_fences";
    pub const REPORT_CENTER: &str = "report_center";
}

/// Per-run options, forwarded from the scheduler or admin trigger.
#[derive(Debug, Clone, Copy)]
pub struct SyncOptions {
    /// Ignore the watermark and refetch the last 90 days.
    pub full_sync: bool,
    /// Fetch the extended report-center breakdowns (when a client is configured).
    pub include_report_center: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            full_sync: false,
            include_report_center: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    Error,
    /// A run for this client is already in flight. Not an error; callers
    /// use it to avoid duplicate scheduling.
    AlreadyRunning,
}

/// Count and error list for one data category. Partial success is
/// representable: `synced > 0` with non-empty `errors` means some
/// campaigns succeeded while others failed.
#[derive(Debug, Clone, Default)]
pub struct CategoryResult {
    pub synced: u64,
    pub errors: Vec<String>,
}

impl CategoryResult {
    pub fn merge(&mut self, other: &CategoryResult) {
        self.synced += other.synced;
        self.errors.extend(other.errors.iter().cloned());
    }
}

/// One `CategoryResult` per tracked category, aggregated across all
/// campaigns in a run.
#[derive(Debug, Clone, Default)]
pub struct CategoryTotals {
    pub campaigns: CategoryResult,
    pub stats: CategoryResult,
    pub ads: CategoryResult,
    pub keywords: CategoryResult,
    pub geo_fences: CategoryResult,
    pub report_center: CategoryResult,
}

impl CategoryTotals {
    pub fn merge_campaign(&mut self, outcome: &CampaignOutcome) {
        self.stats.merge(&outcome.stats);
        self.ads.merge(&outcome.ads);
        self.keywords.merge(&outcome.keywords);
        self.geo_fences.merge(&outcome.geo_fences);
        self.report_center.merge(&outcome.report_center);
    }

    pub fn total_errors(&self) -> usize {
        self.campaigns.errors.len()
            + self.stats.errors.len()
            + self.ads.errors.len()
            + self.keywords.errors.len()
            + self.geo_fences.errors.len()
            + self.report_center.errors.len()
    }
}

/// The aggregated result of one client-level sync invocation.
#[derive(Debug, Clone)]
pub struct SyncRun {
    pub client_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub status: RunStatus,
    pub error_message: Option<String>,
    pub categories: CategoryTotals,
}

impl SyncRun {
    pub fn started(client_id: Uuid) -> Self {
        Self {
            client_id,
            started_at: Utc::now(),
            finished_at: None,
            status: RunStatus::Success,
            error_message: None,
            categories: CategoryTotals::default(),
        }
    }

    pub fn already_running(client_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            client_id,
            started_at: now,
            finished_at: Some(now),
            status: RunStatus::AlreadyRunning,
            error_message: None,
            categories: CategoryTotals::default(),
        }
    }

    pub fn finish(&mut self, status: RunStatus, error_message: Option<String>) {
        self.finished_at = Some(Utc::now());
        self.status = status;
        self.error_message = error_message;
    }
}

/// Immutable result of syncing one campaign, merged into the run totals
/// by the orchestrator.
#[derive(Debug, Clone, Default)]
pub struct CampaignOutcome {
    pub campaign_id: String,
    /// The watermark was already current; every category fetch was skipped.
    pub skipped: bool,
    pub stats: CategoryResult,
    pub ads: CategoryResult,
    pub keywords: CategoryResult,
    pub geo_fences: CategoryResult,
    pub report_center: CategoryResult,
}

impl CampaignOutcome {
    pub fn new(campaign_id: &str) -> Self {
        Self {
            campaign_id: campaign_id.to_string(),
            ..Self::default()
        }
    }
}

/// Result of one soft-optional fetch. `NotAvailable` is the expected
/// empty case (e.g. a campaign without keyword targeting); `Failed`
/// carries the reason but is never surfaced as a run error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome<T> {
    Synced(T),
    NotAvailable,
    Failed(String),
}
