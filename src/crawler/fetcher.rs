//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the shared HTTP client with user agent and per-page timeout
//! - GET requests for page content
//! - Content-Type filtering (only `text/html` bodies are returned)
//! - Error classification

use crate::config::UserAgentConfig;
use reqwest::Client;
use std::time::Duration;

/// Per-page fetch timeout used when none is configured
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(180);

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched an HTML page
    Html {
        /// Page body content
        body: String,
    },

    /// Page is not HTML, or carries no Content-Type at all
    ContentMismatch {
        /// The Content-Type received, if any
        content_type: Option<String>,
    },

    /// Non-success HTTP status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, body read failure, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

/// Builds an HTTP client with proper configuration
///
/// The user agent is formatted as `CrawlerName/Version`. Redirects are
/// followed with reqwest's default policy.
///
/// # Example
///
/// ```no_run
/// use mail_ripple::config::UserAgentConfig;
/// use mail_ripple::crawler::{build_http_client, DEFAULT_FETCH_TIMEOUT};
///
/// let client = build_http_client(&UserAgentConfig::default(), DEFAULT_FETCH_TIMEOUT).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    let user_agent = format!("{}/{}", config.crawler_name, config.crawler_version);

    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and classifies the outcome
///
/// | Condition                          | Result            |
/// |------------------------------------|-------------------|
/// | Request or body read fails         | `NetworkError`    |
/// | Status is not 2xx                  | `HttpError`       |
/// | Content-Type missing or not HTML   | `ContentMismatch` |
/// | Otherwise                          | `Html`            |
pub async fn fetch_page(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            let error = if e.is_timeout() {
                "Request timeout".to_string()
            } else if e.is_connect() {
                "Connection refused".to_string()
            } else {
                e.to_string()
            };
            return FetchResult::NetworkError { error };
        }
    };

    let status = response.status();
    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    match content_type.as_deref() {
        Some(ct) if ct.contains("text/html") => {}
        _ => return FetchResult::ContentMismatch { content_type },
    }

    match response.text().await {
        Ok(body) => FetchResult::Html { body },
        Err(e) => FetchResult::NetworkError {
            error: e.to_string(),
        },
    }
}
