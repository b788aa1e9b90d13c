use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub use storage::models::{JobListing, JobType, SearchQuery};

/// Structured facts pulled from a résumé. Fields whose section could not be found
/// stay empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeProfile {
    pub name: Option<String>,
    /// Lowercased, whitespace-collapsed skill names.
    pub skills: BTreeSet<String>,
    pub education: Vec<EducationEntry>,
    pub experience: Vec<ExperienceEntry>,
    pub preferred_location: Option<String>,
}

impl ResumeProfile {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.skills.is_empty()
            && self.education.is_empty()
            && self.experience.is_empty()
            && self.preferred_location.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub degree: String,
    pub institution: Option<String>,
    pub year: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub title: String,
    pub organization: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub description: String,
}

/// One ranked listing. Borrows the listing from the collection run it was scored in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult<'a> {
    pub listing: &'a JobListing,
    pub score: f32,
    pub reasons: Vec<String>,
    pub matching_skills: Vec<String>,
}

/// Tabular snapshot of a [`MatchResult`], one row per exported match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRow {
    pub title: String,
    pub company: String,
    pub location: String,
    pub score: f32,
    pub reasons: String,
    pub url: String,
}

pub const REASON_SEPARATOR: &str = "; ";

impl From<&MatchResult<'_>> for MatchRow {
    fn from(m: &MatchResult<'_>) -> Self {
        Self {
            title: m.listing.title.clone(),
            company: m.listing.company.clone(),
            location: m.listing.location.clone(),
            score: m.score,
            reasons: m
                .reasons
                .iter()
                .map(|r| escape_reason(r))
                .collect::<Vec<_>>()
                .join(REASON_SEPARATOR),
            url: m.listing.url.clone(),
        }
    }
}

/// `;` and `\` inside a reason are backslash-escaped so the joined column splits
/// back into the same reasons.
fn escape_reason(reason: &str) -> String {
    reason.replace('\\', "\\\\").replace(';', "\\;")
}

impl MatchRow {
    pub fn reason_list(&self) -> Vec<String> {
        let mut out = Vec::new();
        let mut current = String::new();
        let mut chars = self.reasons.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '\\' => {
                    if let Some(next) = chars.next() {
                        current.push(next);
                    }
                }
                ';' => {
                    out.push(std::mem::take(&mut current));
                    if chars.peek() == Some(&' ') {
                        chars.next();
                    }
                }
                _ => current.push(c),
            }
        }
        out.push(current);
        out.retain(|r| !r.is_empty());
        out
    }
}
