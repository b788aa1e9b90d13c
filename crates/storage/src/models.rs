//! Listing and search models shared by collectors, the cache and the scorer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    FullTime,
    PartTime,
    Internship,
    #[default]
    Any,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::FullTime => "full_time",
            JobType::PartTime => "part_time",
            JobType::Internship => "internship",
            JobType::Any => "any",
        }
    }

    /// Whether a listing of type `other` satisfies a search for `self`.
    /// Listings that do not state a type are accepted.
    pub fn accepts(&self, other: Option<JobType>) -> bool {
        match (self, other) {
            (JobType::Any, _) | (_, None) | (_, Some(JobType::Any)) => true,
            (wanted, Some(got)) => *wanted == got,
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_lowercase().replace(['-', ' '], "_");
        match norm.as_str() {
            "full_time" | "fulltime" => Ok(JobType::FullTime),
            "part_time" | "parttime" => Ok(JobType::PartTime),
            "internship" | "intern" => Ok(JobType::Internship),
            "any" | "" => Ok(JobType::Any),
            other => Err(format!(
                "unknown job type '{other}' (expected full_time, part_time, internship or any)"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub title: String,
    pub location: String,
    #[serde(default)]
    pub job_type: JobType,
    /// Only keep listings posted within this many days.
    #[serde(default)]
    pub max_age_days: Option<u32>,
}

impl SearchQuery {
    pub fn new(title: &str, location: &str, job_type: JobType) -> Self {
        Self {
            title: title.to_string(),
            location: location.to_string(),
            job_type,
            max_age_days: None,
        }
    }

    pub fn with_max_age_days(mut self, days: Option<u32>) -> Self {
        self.max_age_days = days;
        self
    }

    /// Cache key over (title, location, job_type). The recency window is applied
    /// after the cache and is not part of the key.
    pub fn cache_key(&self) -> String {
        [
            key_field(&self.title),
            key_field(&self.location),
            self.job_type.as_str().to_string(),
        ]
        .join("|")
    }
}

/// Lowercased, whitespace runs collapsed to `_`, separator characters escaped.
fn key_field(value: &str) -> String {
    value
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .replace('\\', "\\\\")
        .replace('|', "\\|")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobListing {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub url: String,
    #[serde(default)]
    pub posted_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_type: Option<JobType>,
}

impl JobListing {
    pub fn new(
        title: &str,
        company: &str,
        location: &str,
        description: &str,
        url: &str,
        posted_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            id: listing_id(url, title, company, location),
            title: title.trim().to_string(),
            company: company.trim().to_string(),
            location: location.trim().to_string(),
            description: description.trim().to_string(),
            url: url.trim().to_string(),
            posted_date,
            job_type: None,
        }
    }

    pub fn with_job_type(mut self, job_type: Option<JobType>) -> Self {
        self.job_type = job_type;
        self
    }

    /// True when the listing has a posting date strictly older than `max_age_days`
    /// before `today`. Undated listings are never considered stale.
    pub fn is_older_than(&self, max_age_days: u32, today: NaiveDate) -> bool {
        match self.posted_date {
            Some(posted) => today.signed_duration_since(posted).num_days() > i64::from(max_age_days),
            None => false,
        }
    }
}

/// Stable listing id: blake3 of the normalized URL, or of title|company|location
/// for records without one.
pub fn listing_id(url: &str, title: &str, company: &str, location: &str) -> String {
    let url = url.trim().to_lowercase();
    let seed = if url.is_empty() {
        format!(
            "{}|{}|{}",
            title.trim().to_lowercase(),
            company.trim().to_lowercase(),
            location.trim().to_lowercase()
        )
    } else {
        url
    };
    let hex = blake3::hash(seed.as_bytes()).to_hex();
    hex.as_str()[..16].to_string()
}
