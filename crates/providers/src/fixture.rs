//! Collector backed by a JSON file of listings.
//!
//! Useful for offline runs and tests. The file holds either an array of listing
//! records or `{ "jobs": [...] }`; records follow the field names of the HTTP
//! collector (`title`, `company`, `location`, `description`/`snippet`, `url`,
//! `posted_date`/`date_posted`, `job_type`).

use crate::hashing::tokenize;
use crate::record::ListingPayload;
use crate::dedup_by_id;
use crate::{ListingCollector, ProviderError};
use std::path::PathBuf;
use storage::models::{JobListing, SearchQuery};
use tracing::debug;

/// Locations that do not narrow the search.
const WIDE_LOCATIONS: &[&str] = &["", "any", "anywhere", "united states", "usa", "us"];

const GENERIC_TITLE_WORDS: &[&str] = &["entry", "level", "junior", "senior", "and", "or", "the"];

#[derive(Debug, Clone)]
pub struct FixtureCollector {
    path: PathBuf,
}

impl FixtureCollector {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn load(&self) -> Result<Vec<JobListing>, ProviderError> {
        let raw = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            ProviderError::CollectionUnavailable(format!("{}: {e}", self.path.display()))
        })?;
        let payload: ListingPayload = serde_json::from_str(&raw).map_err(|e| {
            ProviderError::CollectionUnavailable(format!("{}: {e}", self.path.display()))
        })?;
        Ok(payload
            .into_records()
            .into_iter()
            .map(|r| r.into_listing())
            .collect())
    }
}

#[async_trait::async_trait]
impl ListingCollector for FixtureCollector {
    fn name(&self) -> &str {
        "fixture"
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<JobListing>, ProviderError> {
        let all = self.load().await?;
        let total = all.len();
        let hits: Vec<JobListing> = all
            .into_iter()
            .filter(|l| matches_query(l, query))
            .collect();
        debug!(total, matched = hits.len(), path = %self.path.display(), "fixture search");
        Ok(dedup_by_id(hits))
    }
}

/// Title keyword, location and job-type filter applied by local collectors.
pub fn matches_query(listing: &JobListing, query: &SearchQuery) -> bool {
    title_matches(listing, &query.title)
        && location_matches(&listing.location, &query.location)
        && query.job_type.accepts(listing.job_type)
}

fn title_matches(listing: &JobListing, title: &str) -> bool {
    let keywords: Vec<String> = tokenize(title)
        .into_iter()
        .filter(|t| !GENERIC_TITLE_WORDS.contains(&t.as_str()))
        .collect();
    if keywords.is_empty() {
        return true;
    }
    let haystack: Vec<String> = tokenize(&format!("{} {}", listing.title, listing.description));
    keywords.iter().any(|k| haystack.contains(k))
}

fn location_matches(listing_location: &str, wanted: &str) -> bool {
    let wanted = wanted.trim().to_lowercase();
    if WIDE_LOCATIONS.contains(&wanted.as_str()) {
        return true;
    }
    let have = listing_location.trim().to_lowercase();
    have.contains("remote") || have.contains(&wanted) || (!have.is_empty() && wanted.contains(&have))
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::models::JobType;

    const FIXTURE: &str = r#"[
        {"title": "React Developer", "company": "Acme", "location": "San Francisco, CA",
         "description": "Seeking React developer with Node.js experience",
         "url": "https://jobs.example/1", "job_type": "full_time"},
        {"title": "React Developer", "company": "Acme", "location": "San Francisco, CA",
         "description": "Duplicate posting", "url": "https://jobs.example/1", "job_type": "full_time"},
        {"title": "Barista", "company": "Bean Co", "location": "Austin, TX",
         "snippet": "Coffee", "url": "https://jobs.example/2"},
        {"title": "Frontend Intern", "company": "Remote First", "location": "Remote",
         "description": "Summer internship building React UIs",
         "url": "https://jobs.example/3", "job_type": "internship", "date_posted": "2024-05-01"}
    ]"#;

    fn write_fixture() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.json");
        std::fs::write(&path, FIXTURE).unwrap();
        (dir, path)
    }

    #[tokio::test]
    async fn filters_by_title_and_location_and_dedups() {
        let (_dir, path) = write_fixture();
        let collector = FixtureCollector::new(&path);
        let q = SearchQuery::new("React Developer", "San Francisco", JobType::Any);
        let hits = collector.search(&q).await.unwrap();

        let urls: Vec<&str> = hits.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(urls, vec!["https://jobs.example/1", "https://jobs.example/3"]);
        assert_eq!(hits[0].description, "Seeking React developer with Node.js experience");
        assert!(hits[1].posted_date.is_some());
    }

    #[tokio::test]
    async fn job_type_narrows_results() {
        let (_dir, path) = write_fixture();
        let collector = FixtureCollector::new(&path);
        let q = SearchQuery::new("React", "Anywhere", JobType::Internship);
        let hits = collector.search(&q).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].company, "Remote First");
    }

    #[tokio::test]
    async fn zero_results_is_not_an_error() {
        let (_dir, path) = write_fixture();
        let collector = FixtureCollector::new(&path);
        let q = SearchQuery::new("Astronaut", "Houston", JobType::Any);
        assert!(collector.search(&q).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_file_is_collection_unavailable() {
        let collector = FixtureCollector::new("/definitely/not/here.json");
        let q = SearchQuery::new("Anything", "", JobType::Any);
        assert!(matches!(
            collector.search(&q).await,
            Err(ProviderError::CollectionUnavailable(_))
        ));
    }

    #[test]
    fn wide_locations_match_everything() {
        assert!(location_matches("Austin, TX", "United States"));
        assert!(location_matches("Remote", "Boston"));
        assert!(!location_matches("Austin, TX", "Boston"));
    }
}
