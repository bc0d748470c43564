//! Webex admin API client.
//!
//! This module provides a low-level HTTP client for the Webex REST API,
//! handling authentication, link-header pagination, and rate-limit backoff.

use std::time::Duration;

use serde::Deserialize;
use serde_json::{Map, Value, map::Entry};
use tracing::{debug, warn};
use url::Url;

use recreport_core::{RawRecording, Site, TimeWindow};

use crate::error::{ApiError, ApiResult};

/// Base URL for the Webex REST API.
const WEBEX_API_BASE: &str = "https://webexapis.com/v1";

/// Maximum number of rate-limit retries per fetch call.
const MAX_RETRIES: u32 = 10;

/// Seconds to wait when a 429 response carries no `Retry-After` header.
const DEFAULT_RETRY_AFTER_SECS: u64 = 5;

/// Page size requested from listing endpoints.
const PAGE_SIZE: &str = "100";

/// One entry of a recording's access-audit trail.
///
/// The API returns entries in chronological order; only the timestamp is
/// needed for the report.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessEvent {
    /// When the recording was accessed, as an ISO-8601 timestamp string.
    pub access_time: String,
}

/// Webex API client.
///
/// The client is stateless across calls: each fetch owns its own pagination
/// accumulator and retry budget, so it can be shared freely between
/// concurrent tasks.
#[derive(Debug)]
pub struct WebexClient {
    http_client: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl WebexClient {
    /// Creates a new client against the production API with the given
    /// access token and request timeout.
    pub fn new(access_token: impl Into<String>, timeout: Duration) -> Self {
        Self::with_base_url(WEBEX_API_BASE, access_token, timeout)
    }

    /// Creates a client against a custom base URL (used in tests and for
    /// non-standard deployments).
    pub fn with_base_url(
        base_url: impl Into<String>,
        access_token: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to create HTTP client");

        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        }
    }

    /// Lists the meeting sites the authorized user can query.
    pub async fn list_sites(&self) -> ApiResult<Vec<Site>> {
        let payload = self.get_paginated("meetingPreferences/sites", &[]).await?;
        take_items(payload, "sites")
    }

    /// Lists recordings for a site within one query window.
    pub async fn list_recordings(
        &self,
        site_url: &str,
        window: &TimeWindow,
    ) -> ApiResult<Vec<RawRecording>> {
        let params = [
            ("max", PAGE_SIZE.to_string()),
            ("siteUrl", site_url.to_string()),
            ("from", window.from_iso()),
            ("to", window.to_iso()),
        ];
        let payload = self.get_paginated("admin/recordings", &params).await?;
        take_items(payload, "items")
    }

    /// Fetches the access-audit trail for one recording.
    pub async fn access_detail(&self, recording_id: &str) -> ApiResult<Vec<AccessEvent>> {
        let params = [
            ("recordingId", recording_id.to_string()),
            ("max", PAGE_SIZE.to_string()),
        ];
        let payload = self
            .get_paginated("recordingReport/accessDetail", &params)
            .await?;
        take_items(payload, "items")
    }

    /// Performs an authenticated GET against `path`, following `rel="next"`
    /// link headers and aggregating every top-level array field across
    /// pages.
    ///
    /// A 429 response is retried in place after the server-directed delay
    /// (or [`DEFAULT_RETRY_AFTER_SECS`]); the retry budget is
    /// [`MAX_RETRIES`] per call. Any other non-success status aborts the
    /// whole call, contributing nothing to the accumulator.
    pub async fn get_paginated(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> ApiResult<Map<String, Value>> {
        let mut merged = Map::new();
        let mut next_url = format!("{}/{}", self.base_url, path);
        // Cleared once a next link is followed: the link already encodes
        // the query, and re-sending params trips 4xx responses.
        let mut params = Some(params);
        let mut retries = 0u32;

        loop {
            let mut request = self
                .http_client
                .get(&next_url)
                .bearer_auth(&self.access_token);
            if let Some(p) = params {
                request = request.query(p);
            }

            let response = request.send().await.map_err(|e| {
                if e.is_timeout() {
                    ApiError::network("request timeout").with_source(e)
                } else {
                    ApiError::network(format!("request failed: {}", e))
                }
            })?;

            let status = response.status();

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                if retries >= MAX_RETRIES {
                    return Err(ApiError::rate_limited(format!(
                        "still rate limited after {} retries",
                        MAX_RETRIES
                    )));
                }
                retries += 1;

                let wait = retry_after_seconds(&response);
                warn!(
                    "rate limit exceeded on {}, retry {}/{} in {}s",
                    path, retries, MAX_RETRIES, wait
                );
                tokio::time::sleep(Duration::from_secs(wait)).await;
                continue;
            }

            if !status.is_success() {
                let code = status.as_u16();
                let body = response.text().await.unwrap_or_default();
                return Err(ApiError::from_status(code, body));
            }

            let link_header = response
                .headers()
                .get("link")
                .and_then(|v| v.to_str().ok())
                .map(String::from);

            let body = response
                .text()
                .await
                .map_err(|e| ApiError::network(format!("failed to read response: {}", e)))?;

            let page: Value = serde_json::from_str(&body)
                .map_err(|e| ApiError::invalid_response(format!("failed to parse response: {}", e)))?;
            let Value::Object(page) = page else {
                return Err(ApiError::invalid_response("expected a JSON object payload"));
            };

            merge_page(&mut merged, page);

            match link_header.as_deref().and_then(next_page_url) {
                Some(url) => {
                    debug!("following next page: {}", url);
                    next_url = url;
                    params = None;
                }
                None => break,
            }
        }

        Ok(merged)
    }
}

/// Merges one page into the accumulator: array fields are concatenated,
/// everything else keeps its first-seen value.
fn merge_page(merged: &mut Map<String, Value>, page: Map<String, Value>) {
    for (key, value) in page {
        match merged.entry(key) {
            Entry::Occupied(mut slot) => {
                if let (Value::Array(existing), Value::Array(mut items)) =
                    (slot.get_mut(), value)
                {
                    existing.append(&mut items);
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(value);
            }
        }
    }
}

/// Extracts the `rel="next"` URL from a `link` response header.
///
/// The header is a comma-separated list of `<url>; rel="value"` segments.
/// Absence of a `next` segment means the last page has been reached.
fn next_page_url(link_header: &str) -> Option<String> {
    for segment in link_header.split(',') {
        let mut parts = segment.splitn(2, ';');
        let target = parts.next().unwrap_or_default();
        let Some(rel) = parts.next() else {
            continue;
        };
        if !rel.contains(r#"rel="next""#) {
            continue;
        }

        let url = target.trim().trim_start_matches('<').trim_end_matches('>');
        if Url::parse(url).is_err() {
            warn!("ignoring malformed next link: {}", url);
            return None;
        }
        return Some(url.to_string());
    }
    None
}

/// Reads the `Retry-After` header, falling back to the default delay.
fn retry_after_seconds(response: &reqwest::Response) -> u64 {
    response
        .headers()
        .get("Retry-After")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}

/// Removes `key` from a merged payload and deserializes it.
///
/// A missing key is treated as an empty listing; some endpoints omit the
/// array entirely when there are no results.
fn take_items<T: serde::de::DeserializeOwned>(
    mut payload: Map<String, Value>,
    key: &str,
) -> ApiResult<Vec<T>> {
    match payload.remove(key) {
        Some(value) => serde_json::from_value(value)
            .map_err(|e| ApiError::invalid_response(format!("unexpected `{}` payload: {}", key, e))),
        None => Ok(Vec::new()),
    }
}
