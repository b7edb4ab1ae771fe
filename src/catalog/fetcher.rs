//! Remote catalog fetching.
//!
//! A fetch is one bounded GET against a volumes endpoint:
//!
//! ```text
//! GET <endpoint>?q=subject:<subject>&maxResults=<n>
//! ```
//!
//! The response body is expected to carry an optional `items` array whose
//! entries each hold a `volumeInfo` object. Every field in `volumeInfo` is
//! optional; missing values are replaced by placeholders before the result
//! set is normalized.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use super::record::{
    coerce_count, join_or, normalize, publication_year, BookRecord, UNCATEGORIZED,
    UNKNOWN_AUTHOR, UNKNOWN_TITLE,
};

/// Public Google Books volumes endpoint
pub const DEFAULT_ENDPOINT: &str = "https://www.googleapis.com/books/v1/volumes";

/// Default page size requested from the service
pub const DEFAULT_MAX_RESULTS: u32 = 40;

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

/// Failure talking to the remote catalog
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("API request failed for subject '{subject}': {source}")]
    Transport {
        subject: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("API request failed for subject '{subject}': HTTP {status}")]
    Status { subject: String, status: u16 },

    #[error("API response for subject '{subject}' could not be decoded: {source}")]
    Decode {
        subject: String,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    /// Subject the failed request was for
    pub fn subject(&self) -> Option<&str> {
        match self {
            FetchError::Client(_) => None,
            FetchError::Transport { subject, .. }
            | FetchError::Status { subject, .. }
            | FetchError::Decode { subject, .. } => Some(subject),
        }
    }
}

/// Source of catalog records
#[async_trait]
pub trait CatalogFetcher: Send + Sync {
    /// Human-readable source name
    fn name(&self) -> &str;

    /// Fetch up to `max_results` normalized records for a subject
    async fn fetch(&self, subject: &str, max_results: u32) -> Result<Vec<BookRecord>, FetchError>;
}

/// Top-level volumes response
#[derive(Debug, Default, Deserialize)]
struct VolumesResponse {
    #[serde(default)]
    items: Vec<VolumeItem>,
}

#[derive(Debug, Default, Deserialize)]
struct VolumeItem {
    #[serde(default, rename = "volumeInfo")]
    volume_info: VolumeInfo,
}

/// Fields read from `volumeInfo`.
///
/// `ratingsCount` stays a raw value so non-integer payloads degrade to 0
/// instead of failing the whole page.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeInfo {
    title: Option<String>,
    authors: Option<Vec<String>>,
    published_date: Option<String>,
    categories: Option<Vec<String>>,
    ratings_count: Option<Value>,
}

impl VolumeInfo {
    fn into_record(self) -> BookRecord {
        BookRecord {
            title: self.title.unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            authors: join_or(self.authors.as_deref().unwrap_or_default(), UNKNOWN_AUTHOR),
            genre: join_or(self.categories.as_deref().unwrap_or_default(), UNCATEGORIZED),
            publication_year: self
                .published_date
                .as_deref()
                .map(publication_year)
                .unwrap_or(0),
            ratings_count: coerce_count(self.ratings_count.as_ref()),
        }
    }
}

/// Decode a volumes response body into normalized records
pub fn parse_volumes(subject: &str, body: &str) -> Result<Vec<BookRecord>, FetchError> {
    let response: VolumesResponse =
        serde_json::from_str(body).map_err(|source| FetchError::Decode {
            subject: subject.to_string(),
            source,
        })?;

    let raw = response
        .items
        .into_iter()
        .map(|item| item.volume_info.into_record());

    Ok(normalize(raw))
}

/// HTTP fetcher for Google Books style volume search
pub struct GoogleBooksFetcher {
    endpoint: String,
    client: reqwest::Client,
}

impl GoogleBooksFetcher {
    /// Create a fetcher for the public endpoint with the default timeout
    pub fn new() -> Result<Self, FetchError> {
        Self::with_endpoint(
            DEFAULT_ENDPOINT,
            Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
        )
    }

    /// Create a fetcher for a custom endpoint
    pub fn with_endpoint(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Query parameters for a subject search
    fn query(subject: &str, max_results: u32) -> [(&'static str, String); 2] {
        [
            ("q", format!("subject:{}", subject)),
            ("maxResults", max_results.to_string()),
        ]
    }
}

#[async_trait]
impl CatalogFetcher for GoogleBooksFetcher {
    fn name(&self) -> &str {
        "google-books"
    }

    async fn fetch(&self, subject: &str, max_results: u32) -> Result<Vec<BookRecord>, FetchError> {
        info!(subject, max_results, "Fetching books");

        let transport = |source| FetchError::Transport {
            subject: subject.to_string(),
            source,
        };

        let response = self
            .client
            .get(&self.endpoint)
            .query(&Self::query(subject, max_results))
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            warn!(subject, status = status.as_u16(), "Catalog returned an error status");
            return Err(FetchError::Status {
                subject: subject.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(transport)?;
        let records = parse_volumes(subject, &body)?;

        info!(subject, count = records.len(), "Fetched books");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_volumes_fills_placeholders() {
        let body = r#"{
            "items": [
                {"volumeInfo": {"title": "Dune", "publishedDate": "1965-08-01"}}
            ]
        }"#;

        let records = parse_volumes("Fiction", body).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].authors, UNKNOWN_AUTHOR);
        assert_eq!(records[0].genre, UNCATEGORIZED);
        assert_eq!(records[0].publication_year, 1965);
        assert_eq!(records[0].ratings_count, 0);
    }

    #[test]
    fn test_parse_volumes_without_items() {
        let records = parse_volumes("Fiction", r#"{"kind": "books#volumes", "totalItems": 0}"#)
            .unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_parse_volumes_drops_untitled() {
        let body = r#"{"items": [{"volumeInfo": {"authors": ["Nobody"]}}, {}]}"#;
        let records = parse_volumes("Fiction", body).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_parse_volumes_keeps_blank_title() {
        let body = r#"{"items": [{"volumeInfo": {"title": "   ", "authors": ["Someone"]}}]}"#;
        let records = parse_volumes("Fiction", body).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "   ");
    }

    #[test]
    fn test_parse_volumes_malformed_body() {
        let err = parse_volumes("History", "<html>oops</html>").unwrap_err();
        assert!(matches!(err, FetchError::Decode { .. }));
        assert_eq!(err.subject(), Some("History"));
    }

    #[test]
    fn test_query_parameters() {
        let query = GoogleBooksFetcher::query("Science Fiction", 40);
        assert_eq!(query[0], ("q", "subject:Science Fiction".to_string()));
        assert_eq!(query[1], ("maxResults", "40".to_string()));
    }

    #[tokio::test]
    async fn test_fetcher_creation() {
        let fetcher = GoogleBooksFetcher::new().unwrap();
        assert_eq!(fetcher.name(), "google-books");
        assert_eq!(fetcher.endpoint(), DEFAULT_ENDPOINT);
    }
}
