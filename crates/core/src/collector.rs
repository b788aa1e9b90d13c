//! Collection run: read-through cache around a [`ListingCollector`], then
//! de-duplication, recency filtering and truncation.

use crate::models::{JobListing, SearchQuery};
use chrono::{DateTime, Utc};
use providers::{dedup_by_id, ListingCollector, ProviderError};
use storage::SearchCache;
use tracing::{debug, info, warn};

pub struct CollectOptions {
    pub max_results: usize,
    pub now: DateTime<Utc>,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            max_results: 50,
            now: Utc::now(),
        }
    }
}

/// Runs one search. Cache failures are logged and bypassed; only collector
/// failures reach the caller.
pub async fn collect(
    collector: &dyn ListingCollector,
    cache: Option<&SearchCache>,
    query: &SearchQuery,
    opts: &CollectOptions,
) -> Result<Vec<JobListing>, ProviderError> {
    let key = query.cache_key();

    let cached = match cache {
        Some(cache) => match cache.get(&key, opts.now).await {
            Ok(hit) => hit,
            Err(e) => {
                warn!(error = %e, "search cache read failed");
                None
            }
        },
        None => None,
    };

    let listings = match cached {
        Some(listings) => {
            info!(key = %key, count = listings.len(), "search cache hit");
            listings
        }
        None => {
            debug!(key = %key, collector = collector.name(), "search cache miss");
            let fresh = dedup_by_id(collector.search(query).await?);
            if let Some(cache) = cache {
                if let Err(e) = cache.put(&key, &fresh, opts.now).await {
                    warn!(error = %e, "search cache write failed");
                }
            }
            info!(count = fresh.len(), collector = collector.name(), "collected listings");
            fresh
        }
    };

    Ok(apply_window(listings, query.max_age_days, opts))
}

fn apply_window(
    listings: Vec<JobListing>,
    max_age_days: Option<u32>,
    opts: &CollectOptions,
) -> Vec<JobListing> {
    let today = opts.now.date_naive();
    let mut kept: Vec<JobListing> = listings
        .into_iter()
        .filter(|l| max_age_days.map_or(true, |days| !l.is_older_than(days, today)))
        .collect();
    kept.truncate(opts.max_results);
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::JobType;
    use chrono::{Duration, NaiveDate};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use storage::{connect, migrate};

    struct CountingCollector {
        calls: AtomicUsize,
        listings: Vec<JobListing>,
    }

    #[async_trait::async_trait]
    impl ListingCollector for CountingCollector {
        fn name(&self) -> &str {
            "counting"
        }

        async fn search(&self, _query: &SearchQuery) -> Result<Vec<JobListing>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.listings.clone())
        }
    }

    struct DownCollector;

    #[async_trait::async_trait]
    impl ListingCollector for DownCollector {
        fn name(&self) -> &str {
            "down"
        }

        async fn search(&self, _query: &SearchQuery) -> Result<Vec<JobListing>, ProviderError> {
            Err(ProviderError::CollectionUnavailable("503".into()))
        }
    }

    fn listing(url: &str, posted: Option<NaiveDate>) -> JobListing {
        JobListing::new("Dev", "Acme", "Remote", "Rust", url, posted)
    }

    async fn cache() -> SearchCache {
        let pool = connect("sqlite::memory:").await.unwrap();
        migrate(&pool).await.unwrap();
        SearchCache::new(pool, 24)
    }

    #[tokio::test]
    async fn second_search_is_served_from_cache() {
        let collector = CountingCollector {
            calls: AtomicUsize::new(0),
            listings: vec![listing("https://x/1", None), listing("https://x/1", None)],
        };
        let cache = cache().await;
        let q = SearchQuery::new("Dev", "Remote", JobType::Any);
        let opts = CollectOptions::default();

        let first = collect(&collector, Some(&cache), &q, &opts).await.unwrap();
        let second = collect(&collector, Some(&cache), &q, &opts).await.unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first, second);
        assert_eq!(collector.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn recency_window_and_limit_apply_after_cache() {
        let now = Utc::now();
        let today = now.date_naive();
        let collector = CountingCollector {
            calls: AtomicUsize::new(0),
            listings: vec![
                listing("https://x/1", Some(today - Duration::days(1))),
                listing("https://x/2", Some(today - Duration::days(30))),
                listing("https://x/3", None),
                listing("https://x/4", Some(today)),
            ],
        };
        let q = SearchQuery::new("Dev", "Remote", JobType::Any).with_max_age_days(Some(7));
        let opts = CollectOptions { max_results: 2, now };
        let got = collect(&collector, None, &q, &opts).await.unwrap();
        let urls: Vec<&str> = got.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(urls, vec!["https://x/1", "https://x/3"]);
    }

    #[tokio::test]
    async fn collector_failure_is_surfaced() {
        let q = SearchQuery::new("Dev", "Remote", JobType::Any);
        let err = collect(&DownCollector, None, &q, &CollectOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::CollectionUnavailable(_)));
    }
}
