//! Heuristic résumé section segmentation.
//!
//! Each section kind owns a labeled pattern matcher. A line opens a section when it
//! is a short header made only of one of the kind's phrases (optional markdown `#`,
//! optional trailing colon). Some kinds also accept an inline `Phrase: content`
//! header whose content becomes the first line of the section. Text before the first header belongs to
//! [`SectionKind::Header`].

use regex::Regex;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Header,
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
    Certifications,
    References,
}

#[derive(Debug, Clone)]
pub struct Section {
    pub kind: SectionKind,
    /// Body lines, trimmed on the right. Blank lines are kept as empty strings so
    /// callers can split paragraphs.
    pub lines: Vec<String>,
}

/// Header-only lines longer than this are treated as prose.
const MAX_HEADER_LEN: usize = 50;

struct SectionMatcher {
    kind: SectionKind,
    header: Regex,
    inline: Option<Regex>,
}

impl SectionMatcher {
    fn new(kind: SectionKind, phrases: &str) -> Self {
        Self {
            kind,
            header: Regex::new(&format!(r"(?i)^\s*(?:#+\s*)?(?:{phrases})\s*:?\s*$")).unwrap(),
            inline: None,
        }
    }

    /// Also accept `Phrase: content` on one line, for a narrower phrase set.
    fn with_inline(mut self, phrases: &str) -> Self {
        self.inline = Some(Regex::new(&format!(r"(?i)^\s*(?:{phrases})\s*:\s*(\S.*)$")).unwrap());
        self
    }
}

static MATCHERS: LazyLock<Vec<SectionMatcher>> = LazyLock::new(|| {
    vec![
        SectionMatcher::new(
            SectionKind::Experience,
            r"work experience|professional experience|relevant experience|experience|employment history|employment|work history",
        ),
        SectionMatcher::new(
            SectionKind::Education,
            r"education(?: and training)?|academic background|academic history",
        )
        .with_inline(r"education"),
        SectionMatcher::new(
            SectionKind::Skills,
            r"technical skills|core competencies|competencies|skills(?: (?:&|and) tools)?|skill set|technologies|tech stack",
        )
        .with_inline(r"technical skills|core competencies|skills|skill set"),
        SectionMatcher::new(
            SectionKind::Summary,
            r"professional summary|summary|career objective|objective|profile|about me",
        )
        .with_inline(r"professional summary|summary|objective"),
        SectionMatcher::new(
            SectionKind::Projects,
            r"personal projects|selected projects|projects",
        ),
        SectionMatcher::new(
            SectionKind::Certifications,
            r"licenses (?:&|and) certifications|certifications?|certificates|licenses",
        ),
        SectionMatcher::new(SectionKind::References, r"references"),
    ]
});

/// If `line` opens a section, returns its kind and any inline content.
fn detect_header(line: &str) -> Option<(SectionKind, Option<String>)> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    for m in MATCHERS.iter() {
        if trimmed.len() < MAX_HEADER_LEN && m.header.is_match(trimmed) {
            return Some((m.kind, None));
        }
        if let Some(caps) = m.inline.as_ref().and_then(|re| re.captures(trimmed)) {
            let rest = caps.get(1).map(|c| c.as_str().trim().to_string());
            return Some((m.kind, rest));
        }
    }
    None
}

pub fn segment(text: &str) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();
    let mut current = Section {
        kind: SectionKind::Header,
        lines: Vec::new(),
    };

    for line in text.lines() {
        if let Some((kind, inline)) = detect_header(line) {
            if !current.lines.is_empty() || current.kind != SectionKind::Header {
                sections.push(std::mem::replace(
                    &mut current,
                    Section {
                        kind,
                        lines: Vec::new(),
                    },
                ));
            } else {
                current.kind = kind;
            }
            if let Some(content) = inline {
                current.lines.push(content);
            }
            continue;
        }
        current.lines.push(line.trim_end().to_string());
    }
    sections.push(current);
    sections
}

/// All body lines of every section of `kind`, in document order. Repeated sections
/// are joined with a blank line.
pub fn lines_of(sections: &[Section], kind: SectionKind) -> Vec<&str> {
    let mut out: Vec<&str> = Vec::new();
    for section in sections.iter().filter(|s| s.kind == kind) {
        if !out.is_empty() {
            out.push("");
        }
        out.extend(section.lines.iter().map(String::as_str));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_by_header_keywords() {
        let text = "Jane Doe\njane@example.com\n\nEXPERIENCE\nEngineer at Acme\n\nEducation:\nB.S. Computer Science\n## Skills\nRust, Go";
        let sections = segment(text);
        let kinds: Vec<SectionKind> = sections.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SectionKind::Header,
                SectionKind::Experience,
                SectionKind::Education,
                SectionKind::Skills
            ]
        );
        assert_eq!(lines_of(&sections, SectionKind::Skills), vec!["Rust, Go"]);
    }

    #[test]
    fn inline_header_keeps_its_content() {
        let sections = segment("Skills: Python, SQL\nAlso Excel");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].kind, SectionKind::Skills);
        assert_eq!(sections[0].lines, vec!["Python, SQL", "Also Excel"]);
    }

    #[test]
    fn prose_mentioning_a_keyword_is_not_a_header() {
        let sections = segment("Summary\nFive years of experience shipping web apps");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].kind, SectionKind::Summary);
    }

    #[test]
    fn missing_sections_yield_nothing() {
        let sections = segment("Just a paragraph of text.");
        assert!(lines_of(&sections, SectionKind::Education).is_empty());
    }
}
