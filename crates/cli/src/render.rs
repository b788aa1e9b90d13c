//! Plain-text rendering for terminal output.

use jobmatch_core::models::{JobListing, MatchRow, ResumeProfile};
use std::fmt::Write;

pub fn profile(p: &ResumeProfile) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "name:      {}", p.name.as_deref().unwrap_or("-"));
    let _ = writeln!(
        out,
        "location:  {}",
        p.preferred_location.as_deref().unwrap_or("-")
    );
    let skills: Vec<&str> = p.skills.iter().map(String::as_str).collect();
    let _ = writeln!(
        out,
        "skills:    {}",
        if skills.is_empty() { "-".to_string() } else { skills.join(", ") }
    );
    let _ = writeln!(out, "education: {}", p.education.len());
    for e in &p.education {
        let _ = writeln!(
            out,
            "  - {}{}{}",
            e.degree,
            e.institution.as_deref().map(|i| format!(", {i}")).unwrap_or_default(),
            e.year.map(|y| format!(" ({y})")).unwrap_or_default()
        );
    }
    let _ = writeln!(out, "experience: {}", p.experience.len());
    for e in &p.experience {
        let period = match (&e.start, &e.end) {
            (Some(s), Some(end)) => format!(" [{s} - {end}]"),
            _ => String::new(),
        };
        let _ = writeln!(
            out,
            "  - {}{}{}",
            e.title,
            e.organization.as_deref().map(|o| format!(" @ {o}")).unwrap_or_default(),
            period
        );
    }
    out
}

pub fn listings(listings: &[JobListing]) -> String {
    if listings.is_empty() {
        return "no listings found\n".to_string();
    }
    let mut out = String::new();
    for (i, l) in listings.iter().enumerate() {
        let posted = l
            .posted_date
            .map(|d| format!(" posted {d}"))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "{:>3}. {} | {} | {}{}\n     {}",
            i + 1,
            l.title,
            l.company,
            l.location,
            posted,
            l.url
        );
    }
    out
}

pub fn matches(rows: &[MatchRow]) -> String {
    if rows.is_empty() {
        return "no matches\n".to_string();
    }
    let mut out = String::new();
    for (i, r) in rows.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}. [{:.2}] {} | {} | {}",
            i + 1,
            r.score,
            r.title,
            r.company,
            r.location
        );
        for reason in r.reason_list() {
            let _ = writeln!(out, "       - {reason}");
        }
        let _ = writeln!(out, "       {}", r.url);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_are_numbered_with_reasons() {
        let rows = vec![MatchRow {
            title: "Dev".into(),
            company: "Acme".into(),
            location: "Remote".into(),
            score: 0.8123,
            reasons: "Skill match: rust; Text similarity: excellent (0.81)".into(),
            url: "https://x/1".into(),
        }];
        let text = matches(&rows);
        assert!(text.contains("  1. [0.81] Dev | Acme | Remote"));
        assert!(text.contains("- Skill match: rust"));
        assert!(text.contains("- Text similarity: excellent (0.81)"));
    }

    #[test]
    fn empty_profile_renders_placeholders() {
        let text = profile(&ResumeProfile::default());
        assert!(text.contains("name:      -"));
        assert!(text.contains("experience: 0"));
    }
}
