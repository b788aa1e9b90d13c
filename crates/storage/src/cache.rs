//! Read-through cache of collector results.
//!
//! Entries are keyed by [`SearchQuery::cache_key`](crate::models::SearchQuery::cache_key)
//! and expire after a fixed time-to-live. Expired rows are skipped on read and purged
//! on the next write.

use crate::models::JobListing;
use chrono::{DateTime, Duration, Utc};
use sqlx::{Row, SqlitePool};
use tracing::debug;

#[derive(Clone)]
pub struct SearchCache {
    pool: SqlitePool,
    ttl: Duration,
}

impl SearchCache {
    pub fn new(pool: SqlitePool, ttl_hours: i64) -> Self {
        Self {
            pool,
            ttl: Duration::hours(ttl_hours.max(0)),
        }
    }

    pub async fn get(
        &self,
        key: &str,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Option<Vec<JobListing>>> {
        let row = sqlx::query("SELECT listings_json, fetched_at FROM search_cache WHERE cache_key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        let fetched_at: i64 = row.try_get("fetched_at")?;
        if self.is_expired(fetched_at, now) {
            debug!(key, "cache entry expired");
            return Ok(None);
        }
        let json: String = row.try_get("listings_json")?;
        let listings: Vec<JobListing> = serde_json::from_str(&json)?;
        Ok(Some(listings))
    }

    pub async fn put(
        &self,
        key: &str,
        listings: &[JobListing],
        now: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        let purged = self.purge_expired(now).await?;
        if purged > 0 {
            debug!(purged, "purged expired cache entries");
        }
        let json = serde_json::to_string(listings)?;
        sqlx::query(
            "INSERT INTO search_cache (cache_key, listings_json, fetched_at)
             VALUES (?, ?, ?)
             ON CONFLICT(cache_key) DO UPDATE SET
               listings_json=excluded.listings_json,
               fetched_at=excluded.fetched_at",
        )
        .bind(key)
        .bind(json)
        .bind(now.timestamp())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn purge_expired(&self, now: DateTime<Utc>) -> anyhow::Result<u64> {
        let cutoff = (now - self.ttl).timestamp();
        let res = sqlx::query("DELETE FROM search_cache WHERE fetched_at <= ?")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected())
    }

    fn is_expired(&self, fetched_at: i64, now: DateTime<Utc>) -> bool {
        now.timestamp() - fetched_at >= self.ttl.num_seconds()
    }
}
