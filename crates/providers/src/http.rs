//! Collector that queries a JSON job-search endpoint over HTTP.

use crate::dedup_by_id;
use crate::record::ListingPayload;
use crate::{ListingCollector, ProviderError};
use reqwest::Client;
use std::time::Duration;
use storage::models::{JobListing, SearchQuery};
use tracing::{debug, info};

const USER_AGENT: &str = concat!("jobmatch/", env!("CARGO_PKG_VERSION"));

#[derive(Clone)]
pub struct HttpCollectorConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub api_key: Option<String>,
}

#[derive(Clone)]
pub struct HttpCollector {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpCollector {
    pub fn new(cfg: HttpCollectorConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
        Ok(Self {
            client,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key: cfg.api_key,
        })
    }
}

#[async_trait::async_trait]
impl ListingCollector for HttpCollector {
    fn name(&self) -> &str {
        "http"
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<JobListing>, ProviderError> {
        let url = format!("{}/jobs", self.base_url);
        info!(%url, title = %query.title, location = %query.location, "querying listings");

        let mut req = self.client.get(&url).query(&[
            ("title", query.title.as_str()),
            ("location", query.location.as_str()),
            ("job_type", query.job_type.as_str()),
        ]);
        if let Some(days) = query.max_age_days {
            req = req.query(&[("days", days)]);
        }
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| ProviderError::CollectionUnavailable(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ProviderError::CollectionUnavailable(format!(
                "{url} returned {status}"
            )));
        }
        let payload: ListingPayload = resp
            .json()
            .await
            .map_err(|e| ProviderError::CollectionUnavailable(format!("bad payload: {e}")))?;

        let listings: Vec<JobListing> = payload
            .into_records()
            .into_iter()
            .map(|r| r.into_listing())
            .collect();
        debug!(count = listings.len(), "listings received");
        Ok(dedup_by_id(listings))
    }
}
