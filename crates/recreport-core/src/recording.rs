//! Recording types.
//!
//! This module provides the core types for recording metadata:
//! - [`Site`]: A meeting site the authorized user can query
//! - [`RawRecording`]: A recording as returned by the admin recordings API
//! - [`EnrichedRecording`]: A recording with derived, display-ready fields

use serde::{Deserialize, Serialize};

use crate::report::{display_date, round_megabytes, round_minutes};

/// Sentinel shown when a recording's last access time cannot be determined.
pub const UNKNOWN_ACCESS: &str = "Unknown";

/// A meeting site available to the authorized user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    /// The site URL, e.g. `example.webex.com`.
    #[serde(rename = "siteUrl")]
    pub site_url: String,

    /// Whether this is the user's default site.
    #[serde(rename = "default", default)]
    pub is_default: bool,
}

/// A recording as returned by the admin recordings listing.
///
/// `id` is globally unique within a site. The same recording can show up
/// in more than one query window when its creation time sits on a window
/// boundary; see [`crate::dedup_recordings`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecording {
    /// Unique recording identifier.
    pub id: String,

    /// Recording topic/name.
    #[serde(default)]
    pub topic: String,

    /// Display name of the meeting host.
    #[serde(default)]
    pub host_display_name: String,

    /// Creation time as an ISO-8601 timestamp string.
    pub create_time: String,

    /// Recording duration in seconds.
    #[serde(default)]
    pub duration_seconds: u64,

    /// Recording size in bytes.
    #[serde(default)]
    pub size_bytes: u64,

    /// Recording file format, e.g. `MP4`.
    #[serde(default)]
    pub format: String,

    /// Service the recording came from, e.g. `MeetingCenter`.
    #[serde(default)]
    pub service_type: String,
}

/// A recording with derived fields ready for report output.
///
/// Built from a [`RawRecording`] once per unique recording; the enricher
/// later sets `last_accessed_display` exactly once per record.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRecording {
    /// Unique recording identifier (carried for the audit lookup).
    pub id: String,

    /// Site the recording belongs to.
    pub site_url: String,

    /// Recording topic/name.
    pub topic: String,

    /// Display name of the meeting host.
    pub host_display_name: String,

    /// Creation date formatted for display (`month/day/yy`).
    pub create_time_display: String,

    /// Duration rounded to whole minutes.
    pub duration_minutes: u64,

    /// Size in megabytes, rounded to two decimals.
    pub size_megabytes: f64,

    /// Recording file format.
    pub format: String,

    /// Service the recording came from.
    pub service_type: String,

    /// Last access date for display, or [`UNKNOWN_ACCESS`].
    pub last_accessed_display: String,
}

impl EnrichedRecording {
    /// Builds an enriched recording from a raw one, applying the unit
    /// conversions and date formatting. The last-access field starts out
    /// as [`UNKNOWN_ACCESS`] until the enricher fills it in.
    pub fn from_raw(raw: &RawRecording, site_url: &str) -> Self {
        Self {
            id: raw.id.clone(),
            site_url: site_url.to_string(),
            topic: raw.topic.clone(),
            host_display_name: raw.host_display_name.clone(),
            create_time_display: display_date(&raw.create_time)
                .unwrap_or_else(|| raw.create_time.clone()),
            duration_minutes: round_minutes(raw.duration_seconds),
            size_megabytes: round_megabytes(raw.size_bytes),
            format: raw.format.clone(),
            service_type: raw.service_type.clone(),
            last_accessed_display: UNKNOWN_ACCESS.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_raw() -> RawRecording {
        serde_json::from_value(serde_json::json!({
            "id": "rec-1",
            "topic": "Weekly Sync",
            "hostDisplayName": "Ada Lovelace",
            "createTime": "2024-03-05T14:30:00Z",
            "durationSeconds": 125,
            "sizeBytes": 2097152,
            "format": "MP4",
            "serviceType": "MeetingCenter"
        }))
        .unwrap()
    }

    #[test]
    fn raw_recording_parses_camel_case() {
        let raw = sample_raw();
        assert_eq!(raw.id, "rec-1");
        assert_eq!(raw.host_display_name, "Ada Lovelace");
        assert_eq!(raw.duration_seconds, 125);
        assert_eq!(raw.size_bytes, 2_097_152);
    }

    #[test]
    fn raw_recording_tolerates_missing_optional_fields() {
        let raw: RawRecording = serde_json::from_value(serde_json::json!({
            "id": "rec-2",
            "createTime": "2024-03-05T14:30:00Z"
        }))
        .unwrap();
        assert_eq!(raw.topic, "");
        assert_eq!(raw.duration_seconds, 0);
    }

    #[test]
    fn site_parses_default_flag() {
        let site: Site = serde_json::from_value(serde_json::json!({
            "siteUrl": "example.webex.com",
            "default": true
        }))
        .unwrap();
        assert_eq!(site.site_url, "example.webex.com");
        assert!(site.is_default);
    }

    #[test]
    fn enriched_from_raw_applies_conversions() {
        let enriched = EnrichedRecording::from_raw(&sample_raw(), "example.webex.com");
        assert_eq!(enriched.site_url, "example.webex.com");
        assert_eq!(enriched.create_time_display, "03/05/24");
        assert_eq!(enriched.duration_minutes, 2);
        assert_eq!(enriched.size_megabytes, 2.0);
        assert_eq!(enriched.last_accessed_display, UNKNOWN_ACCESS);
    }
}
