//! One-way snapshots of a ranking: CSV rows and pretty JSON.

use crate::models::{MatchResult, MatchRow};
use std::io::{Read, Write};

pub fn rows(results: &[MatchResult<'_>]) -> Vec<MatchRow> {
    results.iter().map(MatchRow::from).collect()
}

/// Writes `title,company,location,score,reasons,url` rows with a header line.
pub fn write_csv<W: Write>(rows: &[MatchRow], writer: W) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn read_csv<R: Read>(reader: R) -> anyhow::Result<Vec<MatchRow>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();
    for record in rdr.deserialize() {
        rows.push(record?);
    }
    Ok(rows)
}

pub fn write_json<W: Write>(rows: &[MatchRow], writer: W) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(writer, rows)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::JobListing;

    #[test]
    fn csv_round_trip_keeps_values() {
        let listings = vec![
            JobListing::new("Rust Dev", "Acme, Inc.", "Remote", "d", "https://x/1?a=1&b=2", None),
            JobListing::new("Data \"Wizard\"", "Globex", "NYC", "d", "https://x/2", None),
        ];
        let results = vec![
            MatchResult {
                listing: &listings[0],
                score: 0.734_567_9,
                reasons: vec!["Skill match: rust".into(), "Text similarity: strong (0.73)".into()],
                matching_skills: vec!["rust".into()],
            },
            MatchResult {
                listing: &listings[1],
                score: 0.1,
                reasons: vec![],
                matching_skills: vec![],
            },
        ];

        let mut buf = Vec::new();
        write_csv(&rows(&results), &mut buf).unwrap();
        let text = String::from_utf8(buf.clone()).unwrap();
        assert!(text.starts_with("title,company,location,score,reasons,url\n"));

        let back = read_csv(buf.as_slice()).unwrap();
        assert_eq!(back.len(), 2);
        for (row, result) in back.iter().zip(&results) {
            assert_eq!(row.title, result.listing.title);
            assert_eq!(row.company, result.listing.company);
            assert_eq!(row.score, result.score);
            assert_eq!(row.url, result.listing.url);
        }
        assert_eq!(back[0].reason_list(), results[0].reasons);
        assert!(back[1].reason_list().is_empty());
    }

    #[test]
    fn json_snapshot_is_an_array_of_rows() {
        let row = MatchRow {
            title: "Dev".into(),
            company: "Acme".into(),
            location: "Remote".into(),
            score: 0.5,
            reasons: "Skill match: go".into(),
            url: "https://x/1".into(),
        };
        let mut buf = Vec::new();
        write_json(std::slice::from_ref(&row), &mut buf).unwrap();
        let parsed: Vec<MatchRow> = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed, vec![row]);
    }
}
