use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Pacing gaps between successive upstream calls. The upstream API is
/// rate-limited, so throughput is capped by these delays rather than by
/// concurrency limiting.
#[derive(Debug, Clone, Copy)]
pub struct SyncPacing {
    /// Between the basic category fetches within one campaign.
    pub category_gap: Duration,
    /// Between campaigns within one client.
    pub campaign_gap: Duration,
    /// Between the six report-center metric fetches.
    pub report_metric_gap: Duration,
    /// Between clients in a fleet run.
    pub client_gap: Duration,
}

impl Default for SyncPacing {
    fn default() -> Self {
        Self {
            category_gap: Duration::from_millis(200),
            campaign_gap: Duration::from_millis(500),
            report_metric_gap: Duration::from_millis(500),
            client_gap: Duration::from_secs(2),
        }
    }
}

impl SyncPacing {
    /// All gaps zeroed; for tests.
    pub fn none() -> Self {
        Self {
            category_gap: Duration::ZERO,
            campaign_gap: Duration::ZERO,
            report_metric_gap: Duration::ZERO,
            client_gap: Duration::ZERO,
        }
    }
}

/// Minimum-interval gate shared by every upstream call site. `pause`
/// waits out the remainder of `min_gap` since the previous call, so
/// pacing adapts to actual call volume instead of sleeping a fixed
/// amount at each site.
pub struct RateGate {
    last: Mutex<Option<Instant>>,
}

impl RateGate {
    pub fn new() -> Self {
        Self {
            last: Mutex::new(None),
        }
    }

    /// Wait until at least `min_gap` has elapsed since the previous
    /// `pause` completed. Returns early on cancellation; the gate still
    /// records the call so later pacing stays correct.
    pub async fn pause(&self, min_gap: Duration, cancel: &CancellationToken) {
        let mut last = self.last.lock().await;
        if let Some(prev) = *last {
            let wait = min_gap.saturating_sub(prev.elapsed());
            if !wait.is_zero() && !cancel.is_cancelled() {
                tokio::select! {
                    _ = cancel.cancelled() => {}
                    _ = tokio::time::sleep(wait) => {}
                }
            }
        }
        *last = Some(Instant::now());
    }
}

impl Default for RateGate {
    fn default() -> Self {
        Self::new()
    }
}
