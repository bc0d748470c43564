//! CSV report sink.

use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::info;

use recreport_core::ReportTable;

use crate::error::CliResult;

/// Writes the report table to `path` as CSV, header row included.
pub fn write_csv(table: &ReportTable, path: &Path) -> CliResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in table.rows() {
        writer.serialize(row)?;
    }
    writer.flush()?;
    info!("wrote {} rows to {:?}", table.len(), path);
    Ok(())
}

/// Builds a timestamped report filename inside `dir`.
pub fn report_path(dir: &Path) -> PathBuf {
    let stamp = Local::now().format("%m-%d-%Y_%H-%M-%S");
    dir.join(format!("recording_report_{}.csv", stamp))
}

#[cfg(test)]
mod tests {
    use super::*;
    use recreport_core::{EnrichedRecording, ReportTable, UNKNOWN_ACCESS};

    fn sample_table() -> ReportTable {
        let mut table = ReportTable::new();
        table.append_site(&[EnrichedRecording {
            id: "rec-1".into(),
            site_url: "example.webex.com".into(),
            topic: "Weekly Sync".into(),
            host_display_name: "Ada Lovelace".into(),
            create_time_display: "03/05/24".into(),
            duration_minutes: 2,
            size_megabytes: 2.0,
            format: "MP4".into(),
            service_type: "MeetingCenter".into(),
            last_accessed_display: UNKNOWN_ACCESS.into(),
        }]);
        table
    }

    #[test]
    fn writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");

        write_csv(&sample_table(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Site URL,Recording Name,Host Display Name,Date Created,Last Accessed,\
             Duration (minutes),Recording Size (megabytes),Recording Format,Service Type"
        );
        let row = lines.next().unwrap();
        assert!(row.contains("example.webex.com"));
        assert!(row.contains("Weekly Sync"));
        assert!(row.contains("Unknown"));
    }

    #[test]
    fn report_path_is_timestamped_csv() {
        let path = report_path(Path::new("/tmp/reports"));
        let name = path.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("recording_report_"));
        assert!(name.ends_with(".csv"));
    }
}
