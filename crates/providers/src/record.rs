//! Wire shape of listing records shared by the file and HTTP collectors.

use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashSet;
use storage::models::{JobListing, JobType};

#[derive(Debug, Deserialize)]
pub(crate) struct ListingRecord {
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default, alias = "snippet")]
    pub description: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, alias = "date_posted")]
    pub posted_date: Option<NaiveDate>,
    #[serde(default)]
    pub job_type: Option<JobType>,
}

impl ListingRecord {
    pub fn into_listing(self) -> JobListing {
        JobListing::new(
            &self.title,
            &self.company,
            &self.location,
            &self.description,
            &self.url,
            self.posted_date,
        )
        .with_job_type(self.job_type)
    }
}

/// Accepts either a bare array or an object wrapping it under `jobs`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ListingPayload {
    List(Vec<ListingRecord>),
    Wrapped { jobs: Vec<ListingRecord> },
}

impl ListingPayload {
    pub fn into_records(self) -> Vec<ListingRecord> {
        match self {
            ListingPayload::List(records) | ListingPayload::Wrapped { jobs: records } => records,
        }
    }
}

/// Drops repeated ids, keeping the first occurrence and the original order.
pub fn dedup_by_id(listings: Vec<JobListing>) -> Vec<JobListing> {
    let mut seen = HashSet::new();
    listings
        .into_iter()
        .filter(|l| seen.insert(l.id.clone()))
        .collect()
}
