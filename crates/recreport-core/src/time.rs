//! Time types for recording queries.
//!
//! This module provides [`TimeWindow`] for representing a bounded query
//! range, and [`ReportWindows`] for slicing an arbitrary reporting period
//! into windows the admin recordings API will accept.

use chrono::{DateTime, Duration, SecondsFormat, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of days the admin recordings API accepts in one query.
pub const MAX_WINDOW_DAYS: i64 = 30;

/// A half-open time range over which the remote API is queried.
///
/// `from` is inclusive, `to` is exclusive. Both bounds are truncated to
/// whole seconds; the API rejects sub-second precision anyway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Start of the window (inclusive).
    pub from: DateTime<Utc>,
    /// End of the window (exclusive).
    pub to: DateTime<Utc>,
}

impl TimeWindow {
    /// Creates a new time window, truncating both bounds to whole seconds.
    ///
    /// # Panics
    ///
    /// Panics if `from` is after `to`.
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        assert!(from <= to, "TimeWindow from must be <= to");
        Self {
            from: truncate_to_seconds(from),
            to: truncate_to_seconds(to),
        }
    }

    /// The length of this window.
    pub fn duration(&self) -> Duration {
        self.to - self.from
    }

    /// Start of the window as a second-precision ISO-8601 string.
    pub fn from_iso(&self) -> String {
        self.from.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    /// End of the window as a second-precision ISO-8601 string.
    pub fn to_iso(&self) -> String {
        self.to.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

/// Truncates a datetime to whole seconds.
fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}

/// Iterator over the query windows covering a reporting period.
///
/// The admin recordings API only answers queries spanning at most
/// [`MAX_WINDOW_DAYS`] days, so a longer period is walked backward from
/// `now` in successive slices. The final slice is clamped to whatever
/// remains, so total coverage is exactly `[now - total_days, now]`.
#[derive(Debug, Clone)]
pub struct ReportWindows {
    cursor: DateTime<Utc>,
    remaining_days: i64,
}

impl ReportWindows {
    /// Creates an iterator covering the last `total_days` days before `now`.
    ///
    /// A non-positive `total_days` yields no windows; callers are expected
    /// to reject that input before getting here.
    pub fn new(total_days: i64, now: DateTime<Utc>) -> Self {
        Self {
            cursor: now,
            remaining_days: total_days,
        }
    }

    /// Number of windows this iterator will produce.
    pub fn count_windows(&self) -> u64 {
        if self.remaining_days <= 0 {
            return 0;
        }
        (self.remaining_days as u64).div_ceil(MAX_WINDOW_DAYS as u64)
    }
}

impl Iterator for ReportWindows {
    type Item = TimeWindow;

    fn next(&mut self) -> Option<TimeWindow> {
        if self.remaining_days <= 0 {
            return None;
        }

        let span = self.remaining_days.min(MAX_WINDOW_DAYS);
        let window = TimeWindow::new(self.cursor - Duration::days(span), self.cursor);

        self.cursor -= Duration::days(span);
        self.remaining_days -= span;

        Some(window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn window_truncates_to_whole_seconds() {
        let from = now() + Duration::milliseconds(250);
        let to = now() + Duration::milliseconds(1750);
        let window = TimeWindow::new(from, to);
        assert_eq!(window.from.nanosecond(), 0);
        assert_eq!(window.to.nanosecond(), 0);
    }

    #[test]
    fn window_iso_formatting() {
        let window = TimeWindow::new(now() - Duration::days(1), now());
        assert_eq!(window.from_iso(), "2024-06-14T12:00:00Z");
        assert_eq!(window.to_iso(), "2024-06-15T12:00:00Z");
    }

    #[test]
    fn sixty_five_days_yields_30_30_5() {
        let windows: Vec<TimeWindow> = ReportWindows::new(65, now()).collect();
        assert_eq!(windows.len(), 3);
        assert_eq!(windows[0].duration(), Duration::days(30));
        assert_eq!(windows[1].duration(), Duration::days(30));
        assert_eq!(windows[2].duration(), Duration::days(5));

        // Most recent first, contiguous, covering [now - 65d, now].
        assert_eq!(windows[0].to, now());
        assert_eq!(windows[0].from, windows[1].to);
        assert_eq!(windows[1].from, windows[2].to);
        assert_eq!(windows[2].from, now() - Duration::days(65));
    }

    #[test]
    fn short_period_yields_single_window() {
        let windows: Vec<TimeWindow> = ReportWindows::new(7, now()).collect();
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].from, now() - Duration::days(7));
        assert_eq!(windows[0].to, now());
    }

    #[test]
    fn exact_multiple_has_no_short_tail() {
        let windows: Vec<TimeWindow> = ReportWindows::new(60, now()).collect();
        assert_eq!(windows.len(), 2);
        assert!(windows.iter().all(|w| w.duration() == Duration::days(30)));
    }

    #[test]
    fn non_positive_period_yields_nothing() {
        assert_eq!(ReportWindows::new(0, now()).count(), 0);
        assert_eq!(ReportWindows::new(-5, now()).count(), 0);
    }

    #[test]
    fn count_windows_matches_iteration() {
        for days in [1, 29, 30, 31, 65, 90, 365] {
            let windows = ReportWindows::new(days, now());
            assert_eq!(windows.count_windows(), windows.clone().count() as u64);
        }
        assert_eq!(ReportWindows::new(30, now()).count_windows(), 1);
        assert_eq!(ReportWindows::new(31, now()).count_windows(), 2);
        assert_eq!(ReportWindows::new(65, now()).count_windows(), 3);
    }
}
