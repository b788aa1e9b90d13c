//! Text representations fed to the embedding provider.

use crate::models::{JobListing, ResumeProfile};

/// Lowercases and collapses whitespace.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Skills, experience titles and descriptions, then the preferred location.
pub fn profile_text(profile: &ResumeProfile) -> String {
    let mut parts: Vec<String> = Vec::new();
    if !profile.skills.is_empty() {
        parts.push(profile.skills.iter().cloned().collect::<Vec<_>>().join(", "));
    }
    for exp in &profile.experience {
        parts.push(exp.title.clone());
        parts.push(exp.description.clone());
    }
    if let Some(loc) = &profile.preferred_location {
        parts.push(loc.clone());
    }
    normalize(&parts.join(" "))
}

pub fn listing_text(listing: &JobListing) -> String {
    normalize(&format!(
        "{} {} {}",
        listing.title, listing.company, listing.description
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExperienceEntry;

    #[test]
    fn profile_text_orders_skills_experience_location() {
        let mut p = ResumeProfile::default();
        p.skills.insert("rust".into());
        p.skills.insert("go".into());
        p.experience.push(ExperienceEntry {
            title: "Backend  Engineer".into(),
            organization: Some("Acme".into()),
            start: None,
            end: None,
            description: "Built APIs".into(),
        });
        p.preferred_location = Some("Berlin".into());
        assert_eq!(profile_text(&p), "go, rust backend engineer built apis berlin");
    }

    #[test]
    fn empty_profile_has_empty_text() {
        assert!(profile_text(&ResumeProfile::default()).is_empty());
    }

    #[test]
    fn listing_text_skips_location_and_url() {
        let l = JobListing::new("Dev", "Acme", "Remote", "Write\n code", "https://x/1", None);
        assert_eq!(listing_text(&l), "dev acme write code");
    }
}
