//! Profile extraction: document decoding and résumé text → [`ResumeProfile`].
//!
//! Extraction is best-effort. Missing sections leave their fields empty; only
//! undecodable input is an error.

use crate::entities;
use crate::models::{EducationEntry, ExperienceEntry, ResumeProfile};
use crate::sections::{self, Section, SectionKind};
use regex::Regex;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::{debug, warn};

/// Character budget for the experience pass. Longer experience sections are
/// analysed up to the last whole line that fits.
pub const MAX_TEXT_CHARS: usize = 30_000;

/// Experience paragraphs shorter than this are ignored when no date ranges exist.
const MIN_PARAGRAPH_CHARS: usize = 30;

const HEADER_SCAN_LINES: usize = 6;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("document format error: {0}")]
    DocumentFormat(String),
    #[error("failed to read document: {0}")]
    Io(#[from] std::io::Error),
}

static SKILL_SPLIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[,;/|•·▪●\t]").unwrap());

static SKILL_CATEGORY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z &]{1,30}:\s*").unwrap());

static BULLET_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*(?:[-*•▪●◦]|\d+\.)\s+").unwrap());

fn is_pdf(bytes: &[u8], hint: Option<&Path>) -> bool {
    bytes.starts_with(b"%PDF-")
        || hint
            .and_then(|p| p.extension())
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false)
}

/// Decodes raw résumé bytes into text. PDFs are detected by magic bytes or a `.pdf`
/// extension on `hint`; everything else must be non-blank UTF-8.
pub fn decode_document(bytes: &[u8], hint: Option<&Path>) -> Result<String, ExtractError> {
    let text = if is_pdf(bytes, hint) {
        pdf_text(bytes)?
    } else {
        String::from_utf8(bytes.to_vec())
            .map_err(|e| ExtractError::DocumentFormat(format!("not valid UTF-8 text: {e}")))?
    };
    if text.trim().is_empty() {
        return Err(ExtractError::DocumentFormat("document contains no text".into()));
    }
    Ok(text)
}

#[cfg(feature = "pdf")]
fn pdf_text(bytes: &[u8]) -> Result<String, ExtractError> {
    pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| ExtractError::DocumentFormat(format!("pdf decode failed: {e}")))
}

#[cfg(not(feature = "pdf"))]
fn pdf_text(_bytes: &[u8]) -> Result<String, ExtractError> {
    Err(ExtractError::DocumentFormat(
        "pdf support not compiled in (enable the `pdf` feature)".into(),
    ))
}

/// Reads and decodes a résumé file. A PDF that fails to decode is retried as plain
/// text when its bytes are valid UTF-8; otherwise the format error is returned.
pub fn load_resume(path: &Path) -> Result<String, ExtractError> {
    let bytes = std::fs::read(path)?;
    match decode_document(&bytes, Some(path)) {
        Ok(text) => Ok(text),
        Err(ExtractError::DocumentFormat(reason)) if is_pdf(&bytes, Some(path)) => {
            warn!(path = %path.display(), %reason, "pdf decoding failed, trying plain text");
            decode_document(&bytes, None).map_err(|_| ExtractError::DocumentFormat(reason))
        }
        Err(e) => Err(e),
    }
}

pub fn extract(document: &str) -> ResumeProfile {
    let sections = sections::segment(document);
    debug!(sections = sections.len(), "segmented document");

    let experience_lines = sections::lines_of(&sections, SectionKind::Experience);
    let profile = ResumeProfile {
        name: extract_name(&sections),
        skills: extract_skills(&sections::lines_of(&sections, SectionKind::Skills)),
        education: extract_education(&sections::lines_of(&sections, SectionKind::Education)),
        experience: extract_experience(within_budget(&experience_lines, MAX_TEXT_CHARS)),
        preferred_location: extract_location(document, &sections),
    };
    debug!(
        skills = profile.skills.len(),
        education = profile.education.len(),
        experience = profile.experience.len(),
        "extracted profile"
    );
    profile
}

fn within_budget<'a, 'b>(lines: &'b [&'a str], budget: usize) -> &'b [&'a str] {
    let mut used = 0;
    let end = lines
        .iter()
        .position(|l| {
            used += l.chars().count() + 1;
            used > budget
        })
        .unwrap_or(lines.len());
    &lines[..end]
}

fn extract_name(sections: &[Section]) -> Option<String> {
    let header = sections.first().filter(|s| s.kind == SectionKind::Header)?;
    header
        .lines
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .take(5)
        .find(|l| entities::looks_like_name(l))
        .map(|l| l.split_whitespace().collect::<Vec<_>>().join(" "))
}

fn extract_skills(lines: &[&str]) -> BTreeSet<String> {
    let mut skills = BTreeSet::new();
    for line in lines {
        let line = BULLET_RE.replace(line, "");
        let line = SKILL_CATEGORY_RE.replace(&line, "");
        for piece in SKILL_SPLIT_RE.split(&line) {
            if let Some(skill) = normalize_skill(piece) {
                skills.insert(skill);
            }
        }
    }
    skills
}

fn normalize_skill(raw: &str) -> Option<String> {
    let trimmed = raw
        .trim()
        .trim_start_matches(['-', '*', '•'])
        .trim_end_matches(['.', ':'])
        .trim();
    let skill = trimmed
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    (!skill.is_empty() && skill.len() <= 40 && skill.chars().any(char::is_alphanumeric))
        .then_some(skill)
}

fn extract_education(lines: &[&str]) -> Vec<EducationEntry> {
    let mut entries: Vec<EducationEntry> = Vec::new();
    let mut pending_institution: Option<String> = None;
    let mut pending_year: Option<u16> = None;

    for raw in lines {
        let line = BULLET_RE.replace(raw, "");
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let fields = entities::segments(line);
        let institution = fields.iter().find(|f| entities::has_institution(f)).cloned();
        let year = entities::last_year(line);

        if let Some(degree) = fields.iter().find(|f| entities::has_degree(f)) {
            entries.push(EducationEntry {
                degree: degree.clone(),
                institution: institution.or_else(|| pending_institution.take()),
                year: year.or_else(|| pending_year.take()),
            });
            continue;
        }

        match entries.last_mut() {
            Some(last) => {
                if last.institution.is_none() {
                    last.institution = institution;
                }
                if last.year.is_none() {
                    last.year = year;
                }
            }
            None => {
                pending_institution = pending_institution.or(institution);
                pending_year = pending_year.or(year);
            }
        }
    }
    entries
}

fn is_bullet(line: &str) -> bool {
    BULLET_RE.is_match(line)
}

/// A short non-bullet line without sentence punctuation, usable as an entry header.
fn is_header_candidate(line: &str) -> bool {
    let t = line.trim();
    !t.is_empty() && !is_bullet(line) && t.len() <= 80 && !t.ends_with('.')
}

fn extract_experience(lines: &[&str]) -> Vec<ExperienceEntry> {
    let anchors: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, l)| !is_bullet(l) && entities::find_date_range(l).is_some())
        .map(|(i, _)| i)
        .collect();

    if anchors.is_empty() {
        return paragraph_entries(lines);
    }

    // Entry starts: the anchor line, or the header line directly above it.
    let mut starts: Vec<usize> = Vec::with_capacity(anchors.len());
    for &a in &anchors {
        let floor = starts.last().map(|s| s + 1).unwrap_or(0);
        let anchor_text = entities::find_date_range(lines[a])
            .map(|r| r.strip_from(lines[a]))
            .unwrap_or_default();
        let anchor_has_title = anchor_text.chars().any(char::is_alphabetic);
        let start = if a > floor
            && is_header_candidate(lines[a - 1])
            && !anchors.contains(&(a - 1))
            && (!anchor_has_title
                || entities::has_org_marker(lines[a - 1])
                || entities::has_title_marker(lines[a - 1]))
        {
            a - 1
        } else {
            a
        };
        starts.push(start);
    }

    let mut entries = Vec::with_capacity(starts.len());
    for (i, (&start, &anchor)) in starts.iter().zip(&anchors).enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(lines.len());
        let header: Vec<&str> = lines[start..=anchor]
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect();
        let header_text = header.join(" | ");
        let (title, organization) = entities::split_title_org(&header_text);
        let range = entities::find_date_range(&header_text);
        let description = join_body(&lines[anchor + 1..end]);
        if title.is_empty() && description.is_empty() {
            continue;
        }
        entries.push(ExperienceEntry {
            title,
            organization,
            start: range.as_ref().map(|r| r.start.clone()),
            end: range.map(|r| r.end),
            description,
        });
    }
    entries
}

fn paragraph_entries(lines: &[&str]) -> Vec<ExperienceEntry> {
    lines
        .split(|l| l.trim().is_empty())
        .filter(|para| {
            para.iter().map(|l| l.trim().len()).sum::<usize>() > MIN_PARAGRAPH_CHARS
        })
        .map(|para| {
            let (title, organization) = entities::split_title_org(para[0].trim());
            ExperienceEntry {
                title,
                organization,
                start: None,
                end: None,
                description: join_body(&para[1..]),
            }
        })
        .collect()
}

fn join_body(lines: &[&str]) -> String {
    lines
        .iter()
        .map(|l| BULLET_RE.replace(l, "").trim().to_string())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn extract_location(text: &str, sections: &[Section]) -> Option<String> {
    if let Some(loc) = entities::preferred_location(text) {
        return Some(loc);
    }
    let header = sections.first().filter(|s| s.kind == SectionKind::Header)?;
    header
        .lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .take(HEADER_SCAN_LINES)
        .find_map(|l| entities::city_state(l))
}
