//! Core types: recordings, report rows, time windows, dedup, formatting

pub mod dedup;
pub mod recording;
pub mod report;
pub mod time;
pub mod tracing;

pub use dedup::dedup_recordings;
pub use recording::{EnrichedRecording, RawRecording, Site, UNKNOWN_ACCESS};
pub use report::{ReportRow, ReportTable, display_date, round_megabytes, round_minutes};
pub use time::{MAX_WINDOW_DAYS, ReportWindows, TimeWindow};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
