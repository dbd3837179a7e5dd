mod campaign;
mod fleet;
mod http;
#[cfg(test)]
mod mocks;
mod orchestrator;
mod pacing;
mod registry;
mod report_center;
mod run;
mod upstream;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use adlift_common::error::AdliftResult;
use adlift_config::{init_tracing, AppConfig};
use adlift_db::cache::pg_repository::PgCampaignCacheRepository;
use adlift_db::clients::pg_repository::PgClientRepository;
use adlift_db::sync::pg_repository::PgSyncStatusRepository;

use crate::fleet::FleetSyncDriver;
use crate::orchestrator::ClientSyncOrchestrator;
use crate::pacing::{RateGate, SyncPacing};
use crate::registry::ActiveRunRegistry;
use crate::report_center::client::{ReportCenterClient, ReportCenterClientConfig};
use crate::run::{RunStatus, SyncOptions};
use crate::upstream::client::{AdPlatformClient, UpstreamClientConfig};

fn env_flag(key: &str) -> bool {
    std::env::var(key)
        .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

#[tokio::main]
async fn main() -> AdliftResult<()> {
    let config = AppConfig::from_env()?;
    init_tracing(&config.log_level);

    let Some(upstream_config) = UpstreamClientConfig::from_env() else {
        tracing::info!("upstream credentials not configured, nothing to sync");
        return Ok(());
    };
    let upstream = Arc::new(
        AdPlatformClient::new(upstream_config)
            .map_err(|e| adlift_common::error::AdliftError::Config(e.to_string()))?,
    );

    let report_center = match ReportCenterClientConfig::from_env() {
        Some(rc_config) => Some(Arc::new(
            ReportCenterClient::new(rc_config)
                .map_err(|e| adlift_common::error::AdliftError::Config(e.to_string()))?,
        )),
        None => {
            tracing::info!("report center not configured, extended metrics disabled");
            None
        }
    };

    let pool = adlift_db::create_pool(&config.database_url).await?;
    let clients = Arc::new(PgClientRepository::new(pool.clone()));
    let cache = Arc::new(PgCampaignCacheRepository::new(pool.clone()));
    let ledger = Arc::new(PgSyncStatusRepository::new(pool));

    let registry = Arc::new(ActiveRunRegistry::new());
    let gate = Arc::new(RateGate::new());
    let pacing = SyncPacing::default();

    let options = SyncOptions {
        full_sync: env_flag("FULL_SYNC"),
        include_report_center: !env_flag("SKIP_REPORT_CENTER"),
    };

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("shutdown signal received, finishing current fetch");
                cancel.cancel();
            }
        });
    }

    let orchestrator = Arc::new(ClientSyncOrchestrator::new(
        Arc::clone(&clients),
        upstream,
        report_center,
        cache,
        ledger,
        registry,
        Arc::clone(&gate),
        pacing,
    ));
    let driver = FleetSyncDriver::new(clients, orchestrator, gate, pacing);

    let runs = driver.sync_all(options, &cancel).await;

    let mut succeeded = 0usize;
    let mut failed = 0usize;
    for run in &runs {
        match run.status {
            RunStatus::Success => {
                succeeded += 1;
                let errors = run.categories.total_errors();
                if errors > 0 {
                    tracing::warn!(
                        client = %run.client_id,
                        errors,
                        "client sync succeeded with category errors"
                    );
                }
            }
            RunStatus::Error => {
                failed += 1;
                tracing::warn!(
                    client = %run.client_id,
                    error = run.error_message.as_deref().unwrap_or("unknown"),
                    "client sync ended with errors"
                );
            }
            RunStatus::AlreadyRunning => {}
        }
    }
    tracing::info!(total = runs.len(), succeeded, failed, "fleet sync complete");

    Ok(())
}
