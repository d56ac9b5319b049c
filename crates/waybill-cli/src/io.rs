//! CSV loading and writing.
//!
//! Labels come in as `(sample_id, raw_text)` rows. The directory accepts
//! either `(full_name, address)` rows or the richer recipient schema with
//! split name and address columns. Results go out as one row per pair plus a
//! separate review queue.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use waybill_domain::{DirectoryEntry, LabelResult, LabelStatus, MatchResult, MatchTier, RawLabel};

use crate::error::{CliError, Result};

/// Columns of the results CSV
pub const RESULT_COLUMNS: [&str; 16] = [
    "sample_id",
    "status",
    "mode",
    "extracted_name",
    "extracted_address",
    "tracking_number",
    "carrier",
    "recipient_id",
    "matched_name",
    "matched_address",
    "name_score",
    "address_score",
    "combined_score",
    "tier",
    "ambiguous",
    "elapsed_ms",
];

/// Columns of the review CSV
pub const REVIEW_COLUMNS: [&str; 12] = [
    "sample_id",
    "status",
    "mode",
    "extracted_name",
    "extracted_address",
    "recipient_id",
    "matched_name",
    "combined_score",
    "tier",
    "ambiguous",
    "review_reason",
    "original_text",
];

/// Characters of original text kept in the review queue
const REVIEW_TEXT_CHARS: usize = 200;

/// Column lookup by header name
struct Columns {
    headers: csv::StringRecord,
}

impl Columns {
    fn index(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    }

    fn has(&self, name: &str) -> bool {
        self.index(name).is_some()
    }

    fn get<'r>(&self, row: &'r csv::StringRecord, name: &str) -> Option<&'r str> {
        self.index(name)
            .and_then(|idx| row.get(idx))
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| CliError::Config(format!("Cannot open {}: {}", path.display(), e)))
}

/// Load labels from a CSV file
pub fn load_labels(path: &Path) -> Result<Vec<RawLabel>> {
    read_labels(open(path)?)
}

/// Read labels; rows without a `sample_id` are numbered `sample_<row>`
pub fn read_labels<R: Read>(reader: R) -> Result<Vec<RawLabel>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let columns = Columns {
        headers: reader.headers()?.clone(),
    };

    let text_column = ["raw_text", "ocr_text"]
        .into_iter()
        .find(|c| columns.has(c))
        .ok_or_else(|| CliError::InvalidInput("labels CSV needs a 'raw_text' or 'ocr_text' column".into()))?;
    let text_index = columns.index(text_column).unwrap_or_default();

    let mut labels = Vec::new();
    for (idx, row) in reader.records().enumerate() {
        let row = row?;
        let sample_id = columns
            .get(&row, "sample_id")
            .map(str::to_string)
            .unwrap_or_else(|| format!("sample_{}", idx + 1));
        // Text is taken verbatim; normalization happens in the pipeline.
        let raw_text = row.get(text_index).unwrap_or_default();
        labels.push(RawLabel::new(sample_id, raw_text));
    }
    Ok(labels)
}

/// Load the recipient directory from a CSV file
pub fn load_directory(path: &Path) -> Result<Vec<DirectoryEntry>> {
    read_directory(open(path)?)
}

/// Read directory entries in either supported schema
pub fn read_directory<R: Read>(reader: R) -> Result<Vec<DirectoryEntry>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let columns = Columns {
        headers: reader.headers()?.clone(),
    };

    let simple = columns.has("full_name");
    let split = columns.has("first_name") && columns.has("last_name");
    if !(simple || split) || !columns.has("address") {
        return Err(CliError::InvalidInput(
            "directory CSV needs 'full_name' or 'first_name'/'last_name' columns, and 'address'".into(),
        ));
    }

    let mut entries = Vec::new();
    for (idx, row) in reader.records().enumerate() {
        let row = row?;
        let entry = if simple {
            simple_entry(&columns, &row)
        } else {
            recipient_entry(&columns, &row)
        };
        match entry {
            Some(entry) => entries.push(entry),
            None => tracing::warn!("Skipping directory row {}: missing name or address", idx + 1),
        }
    }
    Ok(entries)
}

fn simple_entry(columns: &Columns, row: &csv::StringRecord) -> Option<DirectoryEntry> {
    let name = columns.get(row, "full_name")?;
    let address = columns.get(row, "address")?;
    let mut entry = DirectoryEntry::new(name, address);
    if let Some(id) = columns.get(row, "recipient_id") {
        entry = entry.with_id(id);
    }
    Some(entry)
}

fn recipient_entry(columns: &Columns, row: &csv::StringRecord) -> Option<DirectoryEntry> {
    let first = columns.get(row, "first_name");
    let last = columns.get(row, "last_name");
    let preferred_first = columns.get(row, "preferred_first_name");
    let preferred_full = columns.get(row, "preferred_full_name");

    let full_name = match (first, last) {
        (Some(first), Some(last)) => format!("{} {}", first, last),
        _ => preferred_full.or(first).or(last)?.to_string(),
    };

    let address: Vec<&str> = ["address", "unit_number", "city", "state", "zip_code"]
        .into_iter()
        .filter_map(|c| columns.get(row, c))
        .collect();
    if address.is_empty() {
        return None;
    }

    let mut entry = DirectoryEntry::new(full_name, address.join(", "));
    if let Some(id) = columns.get(row, "recipient_id") {
        entry = entry.with_id(id);
    }
    if let (Some(first), Some(last)) = (first, last) {
        entry = entry.with_alias(format!("{}, {}", last, first));
    }
    if let (Some(preferred), Some(last)) = (preferred_first, last) {
        entry = entry.with_alias(format!("{} {}", preferred, last));
    }
    if let Some(preferred) = preferred_full {
        entry = entry.with_alias(preferred);
    }
    Some(entry)
}

fn score(value: f64) -> String {
    format!("{:.2}", value)
}

/// Match columns are left blank for unmatched pairs
fn matched_entry(m: &MatchResult) -> Option<&DirectoryEntry> {
    match m.tier {
        MatchTier::Unmatched => None,
        _ => m.best_entry.as_ref(),
    }
}

fn mode(result: &LabelResult) -> &'static str {
    result.mode_used.map(|m| m.as_str()).unwrap_or_default()
}

/// Results rows: one per pair, or one for a label without pairs
pub fn result_rows(results: &[LabelResult]) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    for result in results {
        let elapsed_ms = result.elapsed.as_millis().to_string();
        if result.pairs.is_empty() {
            let mut row = vec![String::new(); RESULT_COLUMNS.len()];
            row[0] = result.sample_id.clone();
            row[1] = result.status.as_str().to_string();
            row[2] = mode(result).to_string();
            row[15] = elapsed_ms;
            rows.push(row);
            continue;
        }
        for m in &result.pairs {
            let pair = &m.extracted;
            let entry = matched_entry(m);
            rows.push(vec![
                result.sample_id.clone(),
                result.status.as_str().to_string(),
                mode(result).to_string(),
                pair.name.clone(),
                pair.address.clone(),
                pair.tracking_number
                    .as_ref()
                    .map(|t| t.value.clone())
                    .unwrap_or_default(),
                pair.tracking_number
                    .as_ref()
                    .map(|t| t.carrier.as_str().to_string())
                    .unwrap_or_default(),
                entry.and_then(|e| e.recipient_id.clone()).unwrap_or_default(),
                entry.map(|e| e.full_name.clone()).unwrap_or_default(),
                entry.map(|e| e.address.clone()).unwrap_or_default(),
                score(m.name_score),
                score(m.address_score),
                score(m.combined_score),
                m.tier.as_str().to_string(),
                m.ambiguous.to_string(),
                elapsed_ms.clone(),
            ]);
        }
    }
    rows
}

fn original_text(result: &LabelResult) -> String {
    result.raw_text.chars().take(REVIEW_TEXT_CHARS).collect()
}

/// Why a pair needs a human look, if it does
fn review_reason(status: LabelStatus, m: &MatchResult) -> Option<&'static str> {
    match (status, m.tier) {
        (_, MatchTier::Review) => Some("score below threshold"),
        (LabelStatus::Partial, _) => Some("no directory match"),
        (_, MatchTier::Confirmed) if m.ambiguous => Some("ambiguous match"),
        _ => None,
    }
}

/// Review rows: review-tier pairs, failed and partial labels, ambiguous matches
pub fn review_rows(results: &[LabelResult]) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    for result in results {
        if result.status == LabelStatus::Failed {
            let reason = if result.mode_used.is_none() {
                "empty label text"
            } else {
                "no pairs extracted"
            };
            let mut row = vec![String::new(); REVIEW_COLUMNS.len()];
            row[0] = result.sample_id.clone();
            row[1] = result.status.as_str().to_string();
            row[2] = mode(result).to_string();
            row[10] = reason.to_string();
            row[11] = original_text(result);
            rows.push(row);
            continue;
        }
        for m in &result.pairs {
            let Some(reason) = review_reason(result.status, m) else {
                continue;
            };
            let entry = matched_entry(m);
            rows.push(vec![
                result.sample_id.clone(),
                result.status.as_str().to_string(),
                mode(result).to_string(),
                m.extracted.name.clone(),
                m.extracted.address.clone(),
                entry.and_then(|e| e.recipient_id.clone()).unwrap_or_default(),
                entry.map(|e| e.full_name.clone()).unwrap_or_default(),
                score(m.combined_score),
                m.tier.as_str().to_string(),
                m.ambiguous.to_string(),
                reason.to_string(),
                original_text(result),
            ]);
        }
    }
    rows
}

fn write_table<W: Write>(writer: W, columns: &[&str], rows: &[Vec<String>]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().from_writer(writer);
    writer.write_record(columns)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn create(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(File::create(path)?)
}

/// Write the results CSV; returns the number of rows written
pub fn write_results(path: &Path, results: &[LabelResult]) -> Result<usize> {
    let rows = result_rows(results);
    write_table(create(path)?, &RESULT_COLUMNS, &rows)?;
    tracing::info!("Saved {} result rows to {}", rows.len(), path.display());
    Ok(rows.len())
}

/// Write the review CSV, headers included even when empty; returns the row count
pub fn write_review(path: &Path, results: &[LabelResult]) -> Result<usize> {
    let rows = review_rows(results);
    write_table(create(path)?, &REVIEW_COLUMNS, &rows)?;
    tracing::info!("Saved {} review rows to {}", rows.len(), path.display());
    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use waybill_domain::{Carrier, ExtractedPair, SourceMode, TrackingNumber};

    fn matched(tier: MatchTier, ambiguous: bool) -> MatchResult {
        let pair = ExtractedPair::new("John Smith", "123 Main St, Anytown CA 12345", SourceMode::Rule)
            .with_tracking(TrackingNumber::new("1Z999AA10123456784", Carrier::Ups));
        MatchResult {
            best_entry: Some(DirectoryEntry::new("John Smith", "123 Main St, Anytown, CA, 12345").with_id("R1")),
            name_score: 100.0,
            address_score: 90.0,
            combined_score: 96.0,
            tier,
            ambiguous,
            ..MatchResult::unmatched(pair)
        }
    }

    fn label(id: &str, mode: Option<SourceMode>, pairs: Vec<MatchResult>) -> LabelResult {
        LabelResult::new(id, mode, pairs, Duration::from_millis(12), format!("raw text of {}", id))
    }

    #[test]
    fn test_read_labels_with_ids() {
        let csv = "sample_id,raw_text\ns1,\"SHIP TO: Jane Doe\n1 Elm St\"\ns2,FRAGILE\n";
        let labels = read_labels(csv.as_bytes()).unwrap();
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0].sample_id, "s1");
        assert_eq!(labels[0].raw_text, "SHIP TO: Jane Doe\n1 Elm St");
    }

    #[test]
    fn test_read_labels_ocr_text_column_without_ids() {
        let csv = "ocr_text\nfirst label\nsecond label\n";
        let labels = read_labels(csv.as_bytes()).unwrap();
        assert_eq!(labels[1].sample_id, "sample_2");
        assert_eq!(labels[1].raw_text, "second label");
    }

    #[test]
    fn test_read_labels_requires_text_column() {
        assert!(read_labels("sample_id,text\ns1,hi\n".as_bytes()).is_err());
    }

    #[test]
    fn test_read_simple_directory() {
        let csv = "full_name,address\nJohn Smith,\"123 Main St, Anytown CA 12345\"\n,\"no name\"\n";
        let entries = read_directory(csv.as_bytes()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].full_name, "John Smith");
        assert!(entries[0].recipient_id.is_none());
    }

    #[test]
    fn test_read_recipient_directory() {
        let csv = "recipient_id,first_name,last_name,preferred_first_name,preferred_full_name,address,unit_number,city,state,zip_code\n\
                   R-1,Robert,Jones,Bob,,42 Oak Ave,Apt 3,Dover,DE,01901\n";
        let entries = read_directory(csv.as_bytes()).unwrap();
        let entry = &entries[0];
        assert_eq!(entry.recipient_id.as_deref(), Some("R-1"));
        assert_eq!(entry.full_name, "Robert Jones");
        assert_eq!(entry.address, "42 Oak Ave, Apt 3, Dover, DE, 01901");
        assert_eq!(entry.aliases, vec!["Jones, Robert".to_string(), "Bob Jones".to_string()]);
    }

    #[test]
    fn test_directory_requires_address() {
        assert!(read_directory("full_name,street\nA B,1 Elm St\n".as_bytes()).is_err());
    }

    #[test]
    fn test_result_rows() {
        let results = vec![
            label("s1", Some(SourceMode::Rule), vec![matched(MatchTier::Confirmed, false)]),
            label("s2", None, Vec::new()),
            label("s3", Some(SourceMode::Model), vec![matched(MatchTier::Unmatched, false)]),
        ];
        let rows = result_rows(&results);
        assert_eq!(rows.len(), 3);

        assert_eq!(rows[0][5], "1Z999AA10123456784");
        assert_eq!(rows[0][6], "UPS");
        assert_eq!(rows[0][7], "R1");
        assert_eq!(rows[0][12], "96.00");
        assert_eq!(rows[0][13], "CONFIRMED");

        assert_eq!(rows[1][1], "FAILED");
        assert_eq!(rows[1][2], "");
        assert_eq!(rows[1][15], "12");

        assert_eq!(rows[2][7], "");
        assert_eq!(rows[2][8], "");
        assert_eq!(rows[2][13], "UNMATCHED");
        assert!(rows.iter().all(|r| r.len() == RESULT_COLUMNS.len()));
    }

    #[test]
    fn test_review_rows() {
        let long_text = "x".repeat(500);
        let mut failed = label("failed", Some(SourceMode::Rule), Vec::new());
        failed.raw_text = long_text;

        let results = vec![
            label("ok", Some(SourceMode::Rule), vec![matched(MatchTier::Confirmed, false)]),
            label("review", Some(SourceMode::Rule), vec![matched(MatchTier::Review, false)]),
            label("ambiguous", Some(SourceMode::Model), vec![matched(MatchTier::Confirmed, true)]),
            label("partial", Some(SourceMode::Rule), vec![matched(MatchTier::Unmatched, false)]),
            failed,
            label("empty", None, Vec::new()),
        ];
        let rows = review_rows(&results);
        let reasons: Vec<(&str, &str)> = rows.iter().map(|r| (r[0].as_str(), r[10].as_str())).collect();

        assert_eq!(
            reasons,
            vec![
                ("review", "score below threshold"),
                ("ambiguous", "ambiguous match"),
                ("partial", "no directory match"),
                ("failed", "no pairs extracted"),
                ("empty", "empty label text"),
            ]
        );
        assert_eq!(rows[3][11].chars().count(), 200);
    }
}
