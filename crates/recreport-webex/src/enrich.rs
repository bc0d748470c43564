//! Concurrent last-access enrichment.
//!
//! Each unique recording gets one task that fetches its access-audit
//! trail and derives a display date from the most recent entry. Tasks
//! run under a concurrency limit so large sites do not open an
//! unbounded number of connections; each task writes only its own
//! output slot, so no locking is needed around the records themselves.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use recreport_core::{EnrichedRecording, UNKNOWN_ACCESS, display_date};

use crate::client::WebexClient;

/// Progress callback, invoked once per completed enrichment task.
pub type ProgressFn = Arc<dyn Fn() + Send + Sync>;

/// Fills in `last_accessed_display` for every record, concurrently.
///
/// The audit trail is assumed to arrive in chronological order, so the
/// last entry is taken as the most recent access. A failed or empty
/// audit fetch degrades that one record to [`UNKNOWN_ACCESS`]; it never
/// aborts the batch. All tasks are joined before this returns, and the
/// order of `records` is left untouched.
pub async fn attach_last_access(
    client: Arc<WebexClient>,
    records: &mut [EnrichedRecording],
    concurrency: usize,
    on_progress: Option<ProgressFn>,
) {
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks: JoinSet<(usize, String)> = JoinSet::new();

    for (index, record) in records.iter().enumerate() {
        let recording_id = record.id.clone();
        let client = Arc::clone(&client);
        let semaphore = Arc::clone(&semaphore);
        let on_progress = on_progress.clone();

        tasks.spawn(async move {
            let _permit = semaphore.acquire_owned().await.ok();

            let display = match client.access_detail(&recording_id).await {
                Ok(events) => match events.last() {
                    Some(latest) => display_date(&latest.access_time)
                        .unwrap_or_else(|| UNKNOWN_ACCESS.to_string()),
                    None => UNKNOWN_ACCESS.to_string(),
                },
                Err(e) => {
                    debug!("audit fetch for {} failed: {}", recording_id, e);
                    UNKNOWN_ACCESS.to_string()
                }
            };

            if let Some(progress) = on_progress {
                progress();
            }

            (index, display)
        });
    }

    // Full barrier: the site's records are only read after every task
    // has written its slot.
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, display)) => records[index].last_accessed_display = display,
            Err(e) => warn!("enrichment task failed to join: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn record(id: &str) -> EnrichedRecording {
        let raw = serde_json::from_value(serde_json::json!({
            "id": id,
            "createTime": "2024-03-05T14:30:00Z"
        }))
        .unwrap();
        EnrichedRecording::from_raw(&raw, "example.webex.com")
    }

    fn access_body(times: &[&str]) -> serde_json::Value {
        serde_json::json!({
            "items": times
                .iter()
                .map(|t| serde_json::json!({ "accessTime": t }))
                .collect::<Vec<_>>()
        })
    }

    #[tokio::test]
    async fn last_event_wins_and_failures_degrade_to_unknown() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/recordingReport/accessDetail"))
            .and(query_param("recordingId", "rec-ok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(access_body(&[
                "2024-01-01T00:00:00Z",
                "2024-02-20T08:15:00Z",
            ])))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/recordingReport/accessDetail"))
            .and(query_param("recordingId", "rec-bad"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/recordingReport/accessDetail"))
            .and(query_param("recordingId", "rec-empty"))
            .respond_with(ResponseTemplate::new(200).set_body_json(access_body(&[])))
            .mount(&server)
            .await;

        let client = Arc::new(WebexClient::with_base_url(
            server.uri(),
            "test-token",
            Duration::from_secs(5),
        ));

        let mut records = vec![record("rec-ok"), record("rec-bad"), record("rec-empty")];
        let completed = Arc::new(AtomicUsize::new(0));
        let progress = {
            let completed = Arc::clone(&completed);
            Arc::new(move || {
                completed.fetch_add(1, Ordering::SeqCst);
            }) as ProgressFn
        };

        attach_last_access(client, &mut records, 4, Some(progress)).await;

        assert_eq!(records[0].last_accessed_display, "02/20/24");
        assert_eq!(records[1].last_accessed_display, UNKNOWN_ACCESS);
        assert_eq!(records[2].last_accessed_display, UNKNOWN_ACCESS);

        // One record failing does not stop the others, and every task
        // advanced the counter exactly once.
        assert_eq!(completed.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn order_is_preserved_under_concurrency() {
        let server = MockServer::start().await;

        for i in 0..8 {
            Mock::given(method("GET"))
                .and(path("/recordingReport/accessDetail"))
                .and(query_param("recordingId", format!("rec-{}", i).as_str()))
                .respond_with(ResponseTemplate::new(200).set_body_json(access_body(&[&format!(
                    "2024-01-{:02}T00:00:00Z",
                    i + 1
                )])))
                .mount(&server)
                .await;
        }

        let client = Arc::new(WebexClient::with_base_url(
            server.uri(),
            "test-token",
            Duration::from_secs(5),
        ));

        let mut records: Vec<EnrichedRecording> =
            (0..8).map(|i| record(&format!("rec-{}", i))).collect();

        attach_last_access(client, &mut records, 3, None).await;

        for (i, rec) in records.iter().enumerate() {
            assert_eq!(rec.id, format!("rec-{}", i));
            assert_eq!(rec.last_accessed_display, format!("01/{:02}/24", i + 1));
        }
    }

    #[tokio::test]
    async fn empty_batch_is_a_no_op() {
        let server = MockServer::start().await;
        let client = Arc::new(WebexClient::with_base_url(
            server.uri(),
            "test-token",
            Duration::from_secs(5),
        ));

        let mut records: Vec<EnrichedRecording> = Vec::new();
        attach_last_access(client, &mut records, 4, None).await;
        assert!(records.is_empty());
    }
}
