//! Catalog service client
//!
//! Three read operations against the remote catalog: list all, get by id,
//! search. Each has a fallible `try_*` form and a normalized form that folds
//! every failure into an empty or absent result.

use reqwest::StatusCode;
use serde::de::{DeserializeOwned, IgnoredAny};
use std::fmt::Display;
use std::time::Duration;
use thiserror::Error;

use crate::models::MediaRecord;

/// Catalog service used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "https://v0-flask-movie-database-nine.vercel.app";

/// Per-request timeout used when nothing else is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Catalog access error types
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Request failed: {0}")]
    FetchFailed(#[from] reqwest::Error),

    #[error("Catalog returned HTTP {0}")]
    Status(u16),

    #[error("Invalid response: {0}")]
    DecodeFailed(String),
}

impl CatalogError {
    /// True when the service could not be reached or answered non-2xx
    pub fn is_unreachable(&self) -> bool {
        matches!(self, CatalogError::FetchFailed(_) | CatalogError::Status(_))
    }
}

/// Connection settings injected into the client
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogConfig {
    pub base_url: String,
    pub timeout: Duration,
    /// Sort listings by descending id (newest first)
    pub sort_newest_first: bool,
}

impl CatalogConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            sort_newest_first: true,
        }
    }
}

/// Catalog service client
pub struct CatalogClient {
    config: CatalogConfig,
    client: reqwest::Client,
}

impl CatalogClient {
    /// Create a client from explicit connection settings
    pub fn new(config: CatalogConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_default();
        Self { config, client }
    }

    /// Create a client with a custom base URL and default settings (for testing)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self::new(CatalogConfig::new(base_url))
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    // -------------------------------------------------------------------------
    // Normalized operations
    // -------------------------------------------------------------------------

    /// All records, newest first. Empty on any failure.
    pub async fn list_all(&self) -> Vec<MediaRecord> {
        self.try_list_all().await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Catalog listing failed");
            Vec::new()
        })
    }

    /// One record by id. Absent on any failure, including "not found".
    pub async fn get_by_id(&self, id: impl Display) -> Option<MediaRecord> {
        let id = id.to_string();
        self.try_get_by_id(&id).await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, id = %id, "Catalog lookup failed");
            None
        })
    }

    /// Records matching a free-text query. Empty on any failure.
    pub async fn search(&self, query: &str) -> Vec<MediaRecord> {
        self.try_search(query).await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, query, "Catalog search failed");
            Vec::new()
        })
    }

    // -------------------------------------------------------------------------
    // Fallible operations
    // -------------------------------------------------------------------------

    /// List all records, keeping failures distinct from an empty catalog
    pub async fn try_list_all(&self) -> Result<Vec<MediaRecord>, CatalogError> {
        let body = self.get("/media").await?;
        let mut records: Vec<MediaRecord> = decode_sequence(&body)?;

        if self.config.sort_newest_first {
            records.sort_by(|a, b| b.id.cmp(&a.id));
        }

        tracing::debug!(count = records.len(), "Fetched catalog listing");
        Ok(records)
    }

    /// Look up one record. `Ok(None)` for a blank id or a 404.
    pub async fn try_get_by_id(&self, id: impl Display) -> Result<Option<MediaRecord>, CatalogError> {
        let id = id.to_string();
        let id = id.trim();
        if id.is_empty() {
            return Ok(None);
        }

        let endpoint = format!("/media/{}", urlencoding::encode(id));
        let body = match self.get(&endpoint).await {
            Ok(body) => body,
            Err(CatalogError::Status(404)) => return Ok(None),
            Err(e) => return Err(e),
        };

        let record: MediaRecord = decode(&body)?;
        tracing::debug!(id = record.id, title = %record.title, "Fetched media record");
        Ok(Some(record))
    }

    /// Search the catalog. A blank query returns nothing without a request.
    pub async fn try_search(&self, query: &str) -> Result<Vec<MediaRecord>, CatalogError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let endpoint = format!("/search?q={}", urlencoding::encode(query));
        let body = self.get(&endpoint).await?;
        let records: Vec<MediaRecord> = decode_sequence(&body)?;

        tracing::debug!(query, count = records.len(), "Fetched search results");
        Ok(records)
    }

    /// Single GET against the catalog, returning the raw body on 2xx
    async fn get(&self, endpoint: &str) -> Result<String, CatalogError> {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint);
        tracing::debug!(url = %url, "Catalog request");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            if status != StatusCode::NOT_FOUND {
                tracing::warn!(url = %url, status = status.as_u16(), "Catalog returned an error status");
            }
            return Err(CatalogError::Status(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, CatalogError> {
    serde_json::from_str(body)
        .map_err(|e| CatalogError::DecodeFailed(format!("JSON parse error: {}", e)))
}

/// Decode a payload that must be a JSON array
///
/// The service is not guaranteed to answer with an array (error payloads are
/// objects), so the shape is checked before decoding records.
fn decode_sequence<T: DeserializeOwned>(body: &str) -> Result<Vec<T>, CatalogError> {
    if !body.trim_start().starts_with('[') {
        decode::<IgnoredAny>(body)?;
        return Err(CatalogError::DecodeFailed(
            "expected a JSON array of media records".into(),
        ));
    }
    decode(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_sequence_rejects_objects() {
        let result: Result<Vec<MediaRecord>, _> = decode_sequence(r#"{"error": "boom"}"#);
        match result {
            Err(CatalogError::DecodeFailed(msg)) => assert!(msg.contains("array")),
            other => panic!("Expected DecodeFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_sequence_reports_malformed_json() {
        let result: Result<Vec<MediaRecord>, _> = decode_sequence("<html>oops</html>");
        match result {
            Err(CatalogError::DecodeFailed(msg)) => assert!(msg.contains("JSON parse error")),
            other => panic!("Expected DecodeFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_sequence_accepts_empty_array() {
        let records: Vec<MediaRecord> = decode_sequence("  []").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_config_defaults() {
        let config = CatalogConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(config.sort_newest_first);

        let config = CatalogConfig::new("http://localhost:5000").with_timeout(Duration::from_secs(5));
        assert_eq!(config.base_url, "http://localhost:5000");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_unreachable_classification() {
        assert!(CatalogError::Status(503).is_unreachable());
        assert!(!CatalogError::DecodeFailed("x".into()).is_unreachable());
    }
}
