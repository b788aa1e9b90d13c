//! Human-readable explanations for a match.
//!
//! Signals are computed independently of the similarity score: skill overlap with
//! the listing description (exact, then fuzzy), location equality, and the overall
//! text similarity itself. Each signal carries a strength in [0, 1]; only signals at
//! or above the configured threshold become reasons, strongest first.

use crate::config::ScoringConfig;
use crate::models::{JobListing, ResumeProfile};
use providers::hashing::tokenize;
use std::cmp::Ordering;
use strsim::jaro_winkler;

pub const INSUFFICIENT_LISTING_TEXT: &str = "insufficient listing text";
pub const INSUFFICIENT_PROFILE_TEXT: &str = "insufficient profile text";

/// Skills shorter than this only match exactly.
const MIN_FUZZY_LEN: usize = 4;

#[derive(Debug, Clone, PartialEq)]
struct Signal {
    strength: f32,
    text: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Explanation {
    pub reasons: Vec<String>,
    /// Profile skills found verbatim in the listing description.
    pub matching_skills: Vec<String>,
}

pub fn quality_label(score: f32) -> &'static str {
    if score > 0.8 {
        "excellent"
    } else if score > 0.6 {
        "strong"
    } else if score > 0.4 {
        "good"
    } else if score > 0.2 {
        "moderate"
    } else {
        "limited"
    }
}

pub fn explain(
    profile: &ResumeProfile,
    listing: &JobListing,
    score: f32,
    cfg: &ScoringConfig,
) -> Explanation {
    let mut signals = Vec::new();
    let matching_skills = skill_signals(profile, listing, cfg, &mut signals);

    if let Some(pref) = &profile.preferred_location {
        if locations_match(pref, &listing.location) {
            signals.push(Signal {
                strength: cfg.location_strength,
                text: format!("Location match: {}", listing.location.trim()),
            });
        }
    }

    signals.push(Signal {
        strength: score,
        text: format!("Text similarity: {} ({:.2})", quality_label(score), score),
    });

    signals.retain(|s| s.strength >= cfg.reason_threshold);
    signals.sort_by(|a, b| {
        b.strength
            .partial_cmp(&a.strength)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.text.cmp(&b.text))
    });
    signals.truncate(cfg.max_reasons);

    Explanation {
        reasons: signals.into_iter().map(|s| s.text).collect(),
        matching_skills,
    }
}

fn skill_signals(
    profile: &ResumeProfile,
    listing: &JobListing,
    cfg: &ScoringConfig,
    signals: &mut Vec<Signal>,
) -> Vec<String> {
    let tokens = tokenize(&listing.description);
    if tokens.is_empty() {
        return Vec::new();
    }
    let padded = format!(" {} ", tokens.join(" "));
    let mut exact = Vec::new();

    for skill in &profile.skills {
        let skill_tokens = tokenize(skill);
        if skill_tokens.is_empty() {
            continue;
        }
        let phrase = skill_tokens.join(" ");
        if padded.contains(&format!(" {phrase} ")) {
            signals.push(Signal {
                strength: 1.0,
                text: format!("Skill match: {skill}"),
            });
            exact.push(skill.clone());
            continue;
        }
        if phrase.len() < MIN_FUZZY_LEN {
            continue;
        }
        if let Some((similarity, window)) = best_window(&phrase, skill_tokens.len(), &tokens) {
            if similarity >= cfg.fuzzy_threshold {
                signals.push(Signal {
                    strength: similarity as f32,
                    text: format!("Similar skill: {skill} ~ {window}"),
                });
            }
        }
    }
    exact
}

/// Closest run of `width` consecutive tokens to `phrase` by Jaro-Winkler similarity.
fn best_window(phrase: &str, width: usize, tokens: &[String]) -> Option<(f64, String)> {
    tokens
        .windows(width)
        .map(|w| w.join(" "))
        .filter(|w| w.len() >= MIN_FUZZY_LEN)
        .map(|w| (jaro_winkler(phrase, &w), w))
        .max_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal))
}

fn normalize_location(loc: &str) -> String {
    loc.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Equality after lowercasing and stripping punctuation.
pub fn locations_match(a: &str, b: &str) -> bool {
    let a = normalize_location(a);
    !a.is_empty() && a == normalize_location(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(skills: &[&str], location: Option<&str>) -> ResumeProfile {
        ResumeProfile {
            skills: skills.iter().map(|s| s.to_string()).collect(),
            preferred_location: location.map(str::to_string),
            ..Default::default()
        }
    }

    fn listing(location: &str, description: &str) -> JobListing {
        JobListing::new("Developer", "Acme", location, description, "https://x/1", None)
    }

    #[test]
    fn exact_skills_and_location_are_reported() {
        let p = profile(&["react", "node.js", "go"], Some("San Francisco"));
        let l = listing("san francisco", "Seeking React developer with Node.js experience");
        let e = explain(&p, &l, 0.3, &ScoringConfig::default());

        assert_eq!(e.matching_skills, vec!["node.js", "react"]);
        assert_eq!(
            e.reasons,
            vec![
                "Skill match: node.js",
                "Skill match: react",
                "Location match: san francisco"
            ]
        );
    }

    #[test]
    fn different_location_yields_no_location_reason() {
        let p = profile(&["react"], Some("San Francisco"));
        let l = listing("Remote", "React role");
        let e = explain(&p, &l, 0.7, &ScoringConfig::default());
        assert!(e.reasons.iter().all(|r| !r.starts_with("Location match")));
        assert!(e.reasons.contains(&"Text similarity: strong (0.70)".to_string()));
    }

    #[test]
    fn fuzzy_skill_match_uses_jaro_winkler() {
        let p = profile(&["postgres"], None);
        let l = listing("Remote", "We run PostgreSQL in production");
        let e = explain(&p, &l, 0.0, &ScoringConfig::default());
        assert!(e.matching_skills.is_empty());
        assert_eq!(e.reasons, vec!["Similar skill: postgres ~ postgresql"]);
    }

    #[test]
    fn multi_word_skills_match_as_phrases() {
        let p = profile(&["machine learning"], None);
        let l = listing("Remote", "Applied machine learning team");
        let e = explain(&p, &l, 0.0, &ScoringConfig::default());
        assert_eq!(e.matching_skills, vec!["machine learning"]);
    }

    #[test]
    fn reasons_are_capped() {
        let p = profile(&["a1", "b2", "c3", "d4", "e5", "f6", "g7"], None);
        let l = listing("Remote", "a1 b2 c3 d4 e5 f6 g7");
        let cfg = ScoringConfig::default();
        let e = explain(&p, &l, 0.9, &cfg);
        assert_eq!(e.reasons.len(), cfg.max_reasons);
        assert_eq!(e.matching_skills.len(), 7);
    }

    #[test]
    fn quality_labels() {
        assert_eq!(quality_label(0.85), "excellent");
        assert_eq!(quality_label(0.61), "strong");
        assert_eq!(quality_label(0.2), "limited");
    }
}
