//! Report rows and the formatting helpers that feed them.
//!
//! The report is a flat, append-only table: one row per unique recording,
//! sites in processing order, recordings in the order they came out of
//! deduplication.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::recording::EnrichedRecording;

/// Formats an ISO-8601 timestamp string as a `month/day/yy` display date.
///
/// A trailing UTC designator is stripped before parsing, matching the
/// timestamps the recordings API returns (`2024-03-05T14:30:00Z`).
/// Returns `None` when the input does not parse.
pub fn display_date(iso: &str) -> Option<String> {
    let trimmed = iso.trim_end_matches('Z');
    let parsed = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
    Some(parsed.format("%m/%d/%y").to_string())
}

/// Converts a duration in seconds to whole minutes, round-to-nearest.
pub fn round_minutes(duration_seconds: u64) -> u64 {
    (duration_seconds as f64 / 60.0).round() as u64
}

/// Converts a size in bytes to megabytes, rounded to two decimal places.
pub fn round_megabytes(size_bytes: u64) -> f64 {
    (size_bytes as f64 / 1_048_576.0 * 100.0).round() / 100.0
}

/// A single report row with human-readable column names.
///
/// The serde renames double as the CSV header row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    #[serde(rename = "Site URL")]
    pub site_url: String,

    #[serde(rename = "Recording Name")]
    pub recording_name: String,

    #[serde(rename = "Host Display Name")]
    pub host_display_name: String,

    #[serde(rename = "Date Created")]
    pub date_created: String,

    #[serde(rename = "Last Accessed")]
    pub last_accessed: String,

    #[serde(rename = "Duration (minutes)")]
    pub duration_minutes: u64,

    #[serde(rename = "Recording Size (megabytes)")]
    pub size_megabytes: f64,

    #[serde(rename = "Recording Format")]
    pub recording_format: String,

    #[serde(rename = "Service Type")]
    pub service_type: String,
}

impl From<&EnrichedRecording> for ReportRow {
    fn from(rec: &EnrichedRecording) -> Self {
        Self {
            site_url: rec.site_url.clone(),
            recording_name: rec.topic.clone(),
            host_display_name: rec.host_display_name.clone(),
            date_created: rec.create_time_display.clone(),
            last_accessed: rec.last_accessed_display.clone(),
            duration_minutes: rec.duration_minutes,
            size_megabytes: rec.size_megabytes,
            recording_format: rec.format.clone(),
            service_type: rec.service_type.clone(),
        }
    }
}

/// The cumulative report table, append-only.
#[derive(Debug, Clone, Default)]
pub struct ReportTable {
    rows: Vec<ReportRow>,
}

impl ReportTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Projects a site's enriched recordings into rows and appends them.
    ///
    /// Insertion order matches the order of `records`.
    pub fn append_site(&mut self, records: &[EnrichedRecording]) {
        self.rows.extend(records.iter().map(ReportRow::from));
    }

    /// The rows appended so far, in insertion order.
    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    /// Number of rows in the table.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` when no rows have been appended.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
