//! Deduplication of recordings gathered across overlapping query windows.

use std::collections::HashSet;

use crate::recording::RawRecording;

/// Collapses duplicate recordings to a single instance, keyed by `id`.
///
/// Recordings created right on a window boundary can be returned by two
/// adjacent windows; the first-encountered instance wins and the overall
/// order is preserved.
pub fn dedup_recordings(records: Vec<RawRecording>) -> Vec<RawRecording> {
    let mut seen = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|record| seen.insert(record.id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recording(id: &str) -> RawRecording {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "createTime": "2024-01-01T00:00:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn overlapping_windows_collapse_to_first_seen() {
        let records = vec![
            recording("a"),
            recording("b"),
            recording("b"),
            recording("c"),
        ];
        let unique = dedup_recordings(records);
        let ids: Vec<&str> = unique.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[test]
    fn already_unique_input_is_unchanged() {
        let records = vec![recording("x"), recording("y")];
        let unique = dedup_recordings(records);
        assert_eq!(unique.len(), 2);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(dedup_recordings(Vec::new()).is_empty());
    }
}
