//! Pattern-based entity heuristics: date ranges, years, degrees, institutions,
//! organizations, person names and locations.

use regex::Regex;
use std::sync::LazyLock;

const MONTH: &str = r"(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?";

static DATE_RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    let point = format!(r"(?:{MONTH}\s+\d{{4}}|\d{{1,2}}/\d{{4}}|\d{{4}})");
    Regex::new(&format!(
        r"(?i)\b(?P<start>{point})\s*(?:-|–|—|\bto\b|\buntil\b)\s*(?P<end>present|current|now|today|{point})\b"
    ))
    .unwrap()
});

static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b((?:19|20)\d{2})\b").unwrap());

static DEGREE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:bachelor|master|doctor(?:ate)?|ph\.?\s?d|m\.?b\.?a\b|associate'?s?\s+(?:degree|of|in)|diploma|[bm]\.?\s?(?:tech|eng|sc)\b|[bm]\.[sa]\.?|(?:bs|ba|ms|ma)\s+(?:in|of)\s+[a-z]|(?-i:(?:BS|BA|MS|MA)\s+[A-Z][a-z]))",
    )
    .unwrap()
});

// Two-letter state codes read like bare degree abbreviations ("MA Area").
static STATE_AREA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:BS|BA|MS|MA)\s+(?i:area|metro(?:politan)?|region)\b").unwrap()
});

static INSTITUTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:university|college|institute|school|academy|polytechnic|conservatory)\b")
        .unwrap()
});

static ORG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:inc|llc|ltd|corp(?:oration)?|company|co|gmbh|labs?|technologies|technology|solutions|systems|group|partners|consulting|studios?|software|university|college|institute|agency|bank|hospital|foundation)\b",
    )
    .unwrap()
});

static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:engineer|developer|programmer|analyst|manager|intern|assistant|scientist|designer|consultant|associate|coordinator|lead|director|specialist|architect|administrator|technician|representative|officer|researcher|teacher|tutor|volunteer|president|founder|cto|ceo)\b",
    )
    .unwrap()
});

static SEGMENT_SPLIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*[,|•·()]\s*|\s+[-–—]\s+|\t+|\s{2,}").unwrap());

static AT_SPLIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\s+(?:at|@)\s+").unwrap());

static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z][A-Za-z'\-]+(?:\s+[A-Z][A-Za-z'\-]*\.?){1,3}$").unwrap()
});

static PREFERENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:willing to relocate to|prefer(?:s|red)? to work in|location preference\s*:?|preferred location\s*:?|seeking (?:positions|roles|opportunities) in|looking for (?:opportunities|positions|roles) in|based in|located in|\blocation\s*:)\s*(?P<loc>[^.;\n]+)",
    )
    .unwrap()
});

static LOCATION_CUT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+(?:and|or|with|but|while)\s+|\s*[(|]").unwrap());

static CITY_STATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Z][a-zA-Z]+(?:\s[A-Z][a-zA-Z]+){0,2}),\s*([A-Z]{2})\b").unwrap()
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub start: String,
    pub end: String,
    start_byte: usize,
    end_byte: usize,
}

impl DateRange {
    /// `line` with the range cut out.
    pub fn strip_from(&self, line: &str) -> String {
        format!("{} {}", &line[..self.start_byte], &line[self.end_byte..])
    }
}

pub fn find_date_range(line: &str) -> Option<DateRange> {
    let caps = DATE_RANGE_RE.captures(line)?;
    let whole = caps.get(0)?;
    Some(DateRange {
        start: collapse(caps.name("start")?.as_str()),
        end: capitalize(&collapse(caps.name("end")?.as_str())),
        start_byte: whole.start(),
        end_byte: whole.end(),
    })
}

/// Last four-digit year in `text`.
pub fn last_year(text: &str) -> Option<u16> {
    YEAR_RE
        .captures_iter(text)
        .filter_map(|c| c.get(1)?.as_str().parse().ok())
        .last()
}

pub fn has_degree(text: &str) -> bool {
    DEGREE_RE
        .find_iter(text)
        .any(|m| !STATE_AREA_RE.is_match(&text[m.start()..]))
}

pub fn has_institution(text: &str) -> bool {
    INSTITUTION_RE.is_match(text)
}

pub fn has_org_marker(text: &str) -> bool {
    ORG_RE.is_match(text)
}

pub fn has_title_marker(text: &str) -> bool {
    TITLE_RE.is_match(text)
}

/// Splits a header-ish line into its separated fields, dropping dates and years.
pub fn segments(line: &str) -> Vec<String> {
    let line = match find_date_range(line) {
        Some(range) => range.strip_from(line),
        None => line.to_string(),
    };
    SEGMENT_SPLIT_RE
        .split(&line)
        .map(|s| clean_field(&YEAR_RE.replace_all(s, "")))
        .filter(|s| s.chars().any(char::is_alphabetic))
        .collect()
}

/// Title and organization from an experience header such as
/// `Software Engineer at Acme Corp` or `Acme Corp | Software Engineer | 2019 - 2021`.
pub fn split_title_org(header: &str) -> (String, Option<String>) {
    let header = match find_date_range(header) {
        Some(range) => range.strip_from(header),
        None => header.to_string(),
    };
    let parts: Vec<&str> = AT_SPLIT_RE.splitn(&header, 2).collect();
    if let [title, rest] = parts.as_slice() {
        let title = clean_field(title);
        let org = segments(rest).into_iter().next();
        if !title.is_empty() {
            return (title, org);
        }
    }

    let mut fields = segments(&header);
    if fields.len() >= 2
        && has_org_marker(&fields[0])
        && !has_title_marker(&fields[0])
        && has_title_marker(&fields[1])
    {
        fields.swap(0, 1);
    }
    let mut iter = fields.into_iter();
    let title = iter.next().unwrap_or_default();
    let rest: Vec<String> = iter.collect();
    let org = rest
        .iter()
        .find(|f| has_org_marker(f))
        .or_else(|| rest.first())
        .cloned();
    (title, org)
}

/// A plausible person name: two to four capitalized words, no digits or contact marks.
pub fn looks_like_name(line: &str) -> bool {
    let line = line.trim();
    !line.contains('@')
        && !line.chars().any(|c| c.is_ascii_digit())
        && NAME_RE.is_match(line)
}

/// Location following an explicit preference phrase, e.g. "willing to relocate to Denver".
pub fn preferred_location(text: &str) -> Option<String> {
    PREFERENCE_RE.captures_iter(text).find_map(|caps| {
        let raw = caps.name("loc")?.as_str();
        let cut = LOCATION_CUT_RE.split(raw).next().unwrap_or(raw);
        let loc = clean_field(cut);
        (loc.chars().any(char::is_alphabetic) && loc.len() <= 60).then_some(loc)
    })
}

/// First `City, ST` pair in `text`.
pub fn city_state(text: &str) -> Option<String> {
    CITY_STATE_RE
        .captures(text)
        .map(|c| format!("{}, {}", &c[1], &c[2]))
}

fn clean_field(s: &str) -> String {
    collapse(s.trim_matches(|c: char| c.is_whitespace() || matches!(c, ',' | ':' | ';' | '-' | '–' | '—' | '|')))
}

fn collapse(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_month_year_ranges() {
        let r = find_date_range("Software Engineer, Acme Corp   Jan 2020 - present").unwrap();
        assert_eq!(r.start, "Jan 2020");
        assert_eq!(r.end, "Present");
    }

    #[test]
    fn finds_numeric_and_year_ranges() {
        let r = find_date_range("Analyst | 03/2019 – 12/2021").unwrap();
        assert_eq!((r.start.as_str(), r.end.as_str()), ("03/2019", "12/2021"));
        let r = find_date_range("Intern (2017 to 2018)").unwrap();
        assert_eq!((r.start.as_str(), r.end.as_str()), ("2017", "2018"));
        assert!(find_date_range("Led a team of 5").is_none());
    }

    #[test]
    fn degree_abbreviations_need_a_field() {
        assert!(has_degree("BS in Physics"));
        assert!(has_degree("ms of engineering"));
        assert!(has_degree("MS Computer Science"));
        assert!(has_degree("B.A. History"));
        assert!(!has_degree("MA area"));
        assert!(!has_degree("Greater Boston, MA Area"));
        assert!(!has_degree("Jackson, MS metro"));
        assert!(!has_degree("ms word and excel"));
    }

    #[test]
    fn splits_title_and_org() {
        assert_eq!(
            split_title_org("Software Engineer at Acme Corp, Boston"),
            ("Software Engineer".to_string(), Some("Acme Corp".to_string()))
        );
        assert_eq!(
            split_title_org("Globex Inc | Data Analyst | 2019 - 2021"),
            ("Data Analyst".to_string(), Some("Globex Inc".to_string()))
        );
        assert_eq!(split_title_org("Freelancer"), ("Freelancer".to_string(), None));
    }

    #[test]
    fn degree_detection_skips_state_abbreviations() {
        assert!(has_degree("B.S. Computer Science"));
        assert!(has_degree("Master of Science in Statistics"));
        assert!(has_degree("BS in Mathematics"));
        assert!(has_degree("Ph.D., Physics"));
        assert!(!has_degree("Cambridge, MA"));
    }

    #[test]
    fn years_and_names() {
        assert_eq!(last_year("Class of 2016 - 2020"), Some(2020));
        assert_eq!(last_year("no year"), None);
        assert!(looks_like_name("Jane A. Doe"));
        assert!(!looks_like_name("jane@example.com"));
        assert!(!looks_like_name("Resume"));
    }

    #[test]
    fn location_phrases() {
        assert_eq!(
            preferred_location("I am willing to relocate to Denver, CO and Austin."),
            Some("Denver, CO".to_string())
        );
        assert_eq!(
            preferred_location("Location: Seattle, WA"),
            Some("Seattle, WA".to_string())
        );
        assert_eq!(preferred_location("Built location-aware apps."), None);
        assert_eq!(
            city_state("Jane Doe | San Francisco, CA | jane@x.io"),
            Some("San Francisco, CA".to_string())
        );
    }
}
