//! # bookclub-http
//!
//! HTTP client for the club's Meetup page.
//!
//! The dashboard headline quotes the number of members shown on the
//! page. Fetching is async; the parsing helpers are plain functions so
//! they can be used on HTML obtained some other way.

use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Element on the Meetup page holding the member count.
pub const DEFAULT_MEMBER_ELEMENT: &str = "member-count-link";

/// Member count used when the page gives nothing usable.
pub const DEFAULT_MEMBER_COUNT: u64 = 6000;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Result type for HTTP operations.
pub type HttpResult<T> = Result<T, HttpError>;

/// Errors from fetching a page.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Building the client or sending the request failed.
    #[error("HTTP error: {0}")]
    Request(String),

    /// The server answered with a non-success status.
    #[error("HTTP {status} - {reason}")]
    Status { status: u16, reason: String },
}

/// HTTP client for fetching pages.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Constructs a new `HttpClient` with a 30-second timeout.
    ///
    /// # Examples
    ///
    /// ```
    /// use bookclub_http::HttpClient;
    /// let client = HttpClient::new().expect("failed to create HttpClient");
    /// ```
    pub fn new() -> HttpResult<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    /// Constructs an `HttpClient` with a custom per-request timeout.
    ///
    /// ```
    /// let client = bookclub_http::HttpClient::with_timeout(10).unwrap();
    /// ```
    pub fn with_timeout(timeout_secs: u64) -> HttpResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            // Disable system proxy lookup to avoid macOS system-configuration issues
            .no_proxy()
            .build()
            .map_err(|e| HttpError::Request(e.to_string()))?;

        Ok(Self { client })
    }

    /// Fetch a page body as text.
    pub async fn fetch_text(&self, url: &str) -> HttpResult<String> {
        debug!(url, "fetching page");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| HttpError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HttpError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| HttpError::Request(format!("Failed to read body: {e}")))
    }

    /// Fetch `url` and read the member count from the element with id
    /// `element_id`.
    ///
    /// A missing element or unreadable count yields `default`; transport
    /// and status failures are returned as errors.
    pub async fn fetch_member_count(
        &self,
        url: &str,
        element_id: &str,
        default: u64,
    ) -> HttpResult<u64> {
        let html = self.fetch_text(url).await?;
        let text = element_text(&html, element_id).unwrap_or_default();
        if text.is_empty() {
            warn!(url, element_id, "member count element not found");
        }
        Ok(parse_member_count(&text, default))
    }
}

/// Text content of the element with the given id, if the document has one.
pub fn element_text(html: &str, element_id: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("[id]").ok()?;
    document
        .select(&selector)
        .find(|el| el.value().id() == Some(element_id))
        .map(|el| el.text().collect())
}

/// Parse a member count such as `"6,012 members"`.
///
/// The first whitespace-separated token, with thousands separators
/// removed, is read as an integer. Anything else gives `default`.
pub fn parse_member_count(text: &str, default: u64) -> u64 {
    text.split_whitespace()
        .next()
        .and_then(|token| token.replace(',', "").parse().ok())
        .unwrap_or(default)
}
