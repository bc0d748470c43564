//! OAuth token storage and refresh.
//!
//! The report pipeline only ever reads the access token; obtaining the
//! initial token pair is an external OAuth web flow. This module covers
//! what the tool itself needs: persisting a token set between runs,
//! checking expiry, and refreshing the access token while the refresh
//! token is still valid.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ApiError, ApiResult};

/// Webex OAuth token endpoint.
const WEBEX_TOKEN_URL: &str = "https://webexapis.com/v1/access_token";

/// Buffer subtracted from expiry times so refresh happens before the
/// server-side cutoff.
const EXPIRY_BUFFER_SECS: i64 = 60;

/// An OAuth token pair with expiry metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenSet {
    /// The bearer token for API requests.
    pub access_token: String,

    /// The refresh token for obtaining new access tokens.
    pub refresh_token: String,

    /// When the access token expires.
    pub expires_at: DateTime<Utc>,

    /// When the refresh token expires.
    pub refresh_expires_at: DateTime<Utc>,
}

impl TokenSet {
    /// Returns `true` if the access token is expired.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Returns `true` if the refresh token is also expired, meaning a
    /// full OAuth flow is required.
    pub fn is_refresh_expired(&self) -> bool {
        Utc::now() >= self.refresh_expires_at
    }
}

/// Persisted token storage with a JSON file backend.
#[derive(Debug)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Creates a token store at the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads tokens from disk.
    ///
    /// Returns `Ok(None)` if no token file exists yet.
    pub fn load(&self) -> ApiResult<Option<TokenSet>> {
        if !self.path.exists() {
            debug!("no token file at {:?}", self.path);
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)
            .map_err(|e| ApiError::io(format!("failed to read {:?}", self.path)).with_source(e))?;
        let tokens = serde_json::from_str(&content).map_err(|e| {
            ApiError::invalid_response(format!("invalid token file {:?}", self.path)).with_source(e)
        })?;

        Ok(Some(tokens))
    }

    /// Writes tokens to disk, restricting permissions on Unix.
    pub fn save(&self, tokens: &TokenSet) -> ApiResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ApiError::io(format!("failed to create {:?}", parent)).with_source(e)
            })?;
        }

        let content = serde_json::to_string_pretty(tokens)
            .map_err(|e| ApiError::io("failed to serialize tokens").with_source(e))?;
        fs::write(&self.path, content)
            .map_err(|e| ApiError::io(format!("failed to write {:?}", self.path)).with_source(e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&self.path, perms).map_err(|e| {
                ApiError::io(format!("failed to set permissions on {:?}", self.path))
                    .with_source(e)
            })?;
        }

        debug!("saved tokens to {:?}", self.path);
        Ok(())
    }
}

/// Wire format of a token refresh response.
#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
    expires_in: i64,
    refresh_token: Option<String>,
    refresh_token_expires_in: Option<i64>,
}

/// Refreshes access tokens against the OAuth token endpoint.
#[derive(Debug)]
pub struct TokenRefresher {
    client_id: String,
    client_secret: String,
    token_url: String,
    http_client: reqwest::Client,
}

impl TokenRefresher {
    /// Creates a refresher against the production token endpoint.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        timeout: StdDuration,
    ) -> Self {
        Self::with_token_url(WEBEX_TOKEN_URL, client_id, client_secret, timeout)
    }

    /// Creates a refresher against a custom token endpoint (used in tests).
    pub fn with_token_url(
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        timeout: StdDuration,
    ) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to create HTTP client");

        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            token_url: token_url.into(),
            http_client,
        }
    }

    /// Exchanges the refresh token for a new access token.
    ///
    /// Returns an updated token set; the refresh token itself is replaced
    /// only when the server issues a new one.
    pub async fn refresh(&self, current: &TokenSet) -> ApiResult<TokenSet> {
        let params = [
            ("grant_type", "refresh_token"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("refresh_token", current.refresh_token.as_str()),
        ];

        let response = self
            .http_client
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| ApiError::network(format!("token refresh request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::network(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(ApiError::authentication(format!(
                "token refresh failed ({}): {}",
                status, body
            )));
        }

        let refreshed: RefreshResponse = serde_json::from_str(&body)
            .map_err(|e| ApiError::invalid_response(format!("invalid token response: {}", e)))?;

        let now = Utc::now();
        let expires_at =
            now + Duration::seconds(refreshed.expires_in) - Duration::seconds(EXPIRY_BUFFER_SECS);
        let refresh_expires_at = match refreshed.refresh_token_expires_in {
            Some(secs) => now + Duration::seconds(secs) - Duration::seconds(EXPIRY_BUFFER_SECS),
            None => current.refresh_expires_at,
        };

        info!("successfully refreshed access token");
        Ok(TokenSet {
            access_token: refreshed.access_token,
            refresh_token: refreshed
                .refresh_token
                .unwrap_or_else(|| current.refresh_token.clone()),
            expires_at,
            refresh_expires_at,
        })
    }
}
