use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde_json::Value;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::cache::models::{
    AdRecord, CampaignRecord, GeoFenceRecord, KeywordRecord, ReportMetric, StatRecord,
};
use crate::cache::repositories::CampaignCacheRepository;
use adlift_common::error::{AdliftError, AdliftResult};

#[derive(Clone)]
pub struct PgCampaignCacheRepository {
    pool: PgPool,
}

impl PgCampaignCacheRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Batch writers are transactional: a failure mid-batch must leave the
// previously cached rows untouched, or the watermark could advance past
// days that were never stored.
#[async_trait]
impl CampaignCacheRepository for PgCampaignCacheRepository {
    async fn cache_campaigns(
        &self,
        client_id: Uuid,
        campaigns: &[CampaignRecord],
    ) -> AdliftResult<usize> {
        let now = Utc::now();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AdliftError::Database(e.to_string()))?;
        for c in campaigns {
            sqlx::query(
                "insert into campaigns (client_id, campaign_id, name, status, payload, synced_at)
                 values ($1, $2, $3, $4, $5, $6)
                 on conflict (client_id, campaign_id) do update
                 set name = excluded.name, status = excluded.status,
                     payload = excluded.payload, synced_at = excluded.synced_at",
            )
            .bind(client_id)
            .bind(&c.campaign_id)
            .bind(&c.name)
            .bind(&c.status)
            .bind(&c.payload)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(|e| AdliftError::Database(e.to_string()))?;
        }
        tx.commit()
            .await
            .map_err(|e| AdliftError::Database(e.to_string()))?;
        Ok(campaigns.len())
    }

    async fn cache_campaign_stats(
        &self,
        client_id: Uuid,
        campaign_id: &str,
        rows: &[StatRecord],
    ) -> AdliftResult<usize> {
        let now = Utc::now();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AdliftError::Database(e.to_string()))?;
        for s in rows {
            sqlx::query(
                "insert into campaign_stats
                   (client_id, campaign_id, stat_date, impressions, clicks, total_spend, payload, synced_at)
                 values ($1, $2, $3, $4, $5, $6, $7, $8)
                 on conflict (client_id, campaign_id, stat_date) do update
                 set impressions = excluded.impressions, clicks = excluded.clicks,
                     total_spend = excluded.total_spend, payload = excluded.payload,
                     synced_at = excluded.synced_at",
            )
            .bind(client_id)
            .bind(campaign_id)
            .bind(s.stat_date)
            .bind(s.impressions)
            .bind(s.clicks)
            .bind(s.total_spend)
            .bind(&s.payload)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(|e| AdliftError::Database(e.to_string()))?;
        }
        tx.commit()
            .await
            .map_err(|e| AdliftError::Database(e.to_string()))?;
        Ok(rows.len())
    }

    async fn cache_ads(
        &self,
        client_id: Uuid,
        campaign_id: &str,
        ads: &[AdRecord],
    ) -> AdliftResult<usize> {
        let now = Utc::now();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AdliftError::Database(e.to_string()))?;
        for a in ads {
            sqlx::query(
                "insert into ads (client_id, campaign_id, ad_id, name, status, payload, synced_at)
                 values ($1, $2, $3, $4, $5, $6, $7)
                 on conflict (client_id, campaign_id, ad_id) do update
                 set name = excluded.name, status = excluded.status,
                     payload = excluded.payload, synced_at = excluded.synced_at",
            )
            .bind(client_id)
            .bind(campaign_id)
            .bind(&a.ad_id)
            .bind(&a.name)
            .bind(&a.status)
            .bind(&a.payload)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(|e| AdliftError::Database(e.to_string()))?;
        }
        tx.commit()
            .await
            .map_err(|e| AdliftError::Database(e.to_string()))?;
        Ok(ads.len())
    }

    async fn cache_keywords(
        &self,
        client_id: Uuid,
        campaign_id: &str,
        keywords: &[KeywordRecord],
    ) -> AdliftResult<usize> {
        let now = Utc::now();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AdliftError::Database(e.to_string()))?;
        for k in keywords {
            sqlx::query(
                "insert into keywords (client_id, campaign_id, keyword, bid, payload, synced_at)
                 values ($1, $2, $3, $4, $5, $6)
                 on conflict (client_id, campaign_id, keyword) do update
                 set bid = excluded.bid, payload = excluded.payload,
                     synced_at = excluded.synced_at",
            )
            .bind(client_id)
            .bind(campaign_id)
            .bind(&k.keyword)
            .bind(k.bid)
            .bind(&k.payload)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(|e| AdliftError::Database(e.to_string()))?;
        }
        tx.commit()
            .await
            .map_err(|e| AdliftError::Database(e.to_string()))?;
        Ok(keywords.len())
    }

    async fn cache_geo_fences(
        &self,
        client_id: Uuid,
        campaign_id: &str,
        fences: &[GeoFenceRecord],
    ) -> AdliftResult<usize> {
        let now = Utc::now();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AdliftError::Database(e.to_string()))?;
        for f in fences {
            sqlx::query(
                "insert into geo_fences (client_id, campaign_id, fence_id, name, payload, synced_at)
                 values ($1, $2, $3, $4, $5, $6)
                 on conflict (client_id, campaign_id, fence_id) do update
                 set name = excluded.name, payload = excluded.payload,
                     synced_at = excluded.synced_at",
            )
            .bind(client_id)
            .bind(campaign_id)
            .bind(&f.fence_id)
            .bind(&f.name)
            .bind(&f.payload)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(|e| AdliftError::Database(e.to_string()))?;
        }
        tx.commit()
            .await
            .map_err(|e| AdliftError::Database(e.to_string()))?;
        Ok(fences.len())
    }

    async fn cache_report_metric(
        &self,
        client_id: Uuid,
        campaign_id: &str,
        metric: ReportMetric,
        start: NaiveDate,
        end: NaiveDate,
        rows: &[Value],
    ) -> AdliftResult<usize> {
        let now = Utc::now();
        // Replace strategy: the window is refetched as a whole, so old rows
        // for the same (campaign, metric, window) would double-count. The
        // delete and the inserts share one transaction so a failed batch
        // keeps the previous window intact.
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AdliftError::Database(e.to_string()))?;
        sqlx::query(
            "delete from report_center_rows
             where client_id = $1 and campaign_id = $2 and metric = $3
               and start_date = $4 and end_date = $5",
        )
        .bind(client_id)
        .bind(campaign_id)
        .bind(metric.as_str())
        .bind(start)
        .bind(end)
        .execute(&mut *tx)
        .await
        .map_err(|e| AdliftError::Database(e.to_string()))?;

        for row in rows {
            sqlx::query(
                "insert into report_center_rows
                   (id, client_id, campaign_id, metric, start_date, end_date, payload, synced_at)
                 values ($1, $2, $3, $4, $5, $6, $7, $8)",
            )
            .bind(Uuid::new_v4())
            .bind(client_id)
            .bind(campaign_id)
            .bind(metric.as_str())
            .bind(start)
            .bind(end)
            .bind(row)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(|e| AdliftError::Database(e.to_string()))?;
        }
        tx.commit()
            .await
            .map_err(|e| AdliftError::Database(e.to_string()))?;
        Ok(rows.len())
    }

    async fn last_cached_stats_date(
        &self,
        client_id: Uuid,
        campaign_id: &str,
    ) -> AdliftResult<Option<NaiveDate>> {
        let row = sqlx::query(
            "select max(stat_date) as last_date from campaign_stats
             where client_id = $1 and campaign_id = $2",
        )
        .bind(client_id)
        .bind(campaign_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AdliftError::Database(e.to_string()))?;

        Ok(row.get("last_date"))
    }
}
