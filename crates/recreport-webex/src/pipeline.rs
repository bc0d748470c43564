//! Windowed recording collection for one site.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use recreport_core::{RawRecording, ReportWindows, dedup_recordings};

use crate::client::WebexClient;

/// Gathers every recording for a site over the last `total_days` days.
///
/// The period is walked backward from `now` in API-sized windows; each
/// window is fetched independently and a failed window contributes
/// nothing rather than aborting the site. Records duplicated across
/// adjacent windows are collapsed to their first-seen instance.
///
/// `on_window` is called once per completed window, for progress display.
pub async fn collect_site_recordings(
    client: &WebexClient,
    site_url: &str,
    total_days: i64,
    now: DateTime<Utc>,
    mut on_window: impl FnMut(),
) -> Vec<RawRecording> {
    let mut gathered = Vec::new();

    for window in ReportWindows::new(total_days, now) {
        match client.list_recordings(site_url, &window).await {
            Ok(items) => {
                debug!(
                    "window {}..{}: {} recordings",
                    window.from_iso(),
                    window.to_iso(),
                    items.len()
                );
                gathered.extend(items);
            }
            Err(e) => {
                warn!(
                    "window {}..{} for {} yielded nothing: {}",
                    window.from_iso(),
                    window.to_iso(),
                    site_url,
                    e
                );
            }
        }
        on_window();
    }

    dedup_recordings(gathered)
}
