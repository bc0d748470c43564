//! Webex admin API surface.
//!
//! This crate provides everything that talks to the Webex cloud:
//!
//! - [`WebexClient`] - Authenticated HTTP client with link-header pagination
//!   and 429 backoff
//! - [`TokenSet`] / [`TokenStore`] - OAuth token persistence and refresh
//! - [`collect_site_recordings`] - Windowed, deduplicated recording listing
//! - [`attach_last_access`] - Concurrent last-access enrichment
//! - [`ApiError`] - Error types for API operations

pub mod client;
pub mod enrich;
pub mod error;
pub mod pipeline;
pub mod tokens;

pub use client::{AccessEvent, WebexClient};
pub use enrich::{ProgressFn, attach_last_access};
pub use error::{ApiError, ApiErrorCode, ApiResult};
pub use pipeline::collect_site_recordings;
pub use tokens::{TokenRefresher, TokenSet, TokenStore};
