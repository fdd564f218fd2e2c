//! Mail-Ripple: a bounded breadth-first email harvester
//!
//! This crate crawls outward from seed URLs, a bounded number of pages and
//! hostnames at a time, and collects the email addresses found on every HTML
//! page it visits. Many seeds are crawled concurrently by a fixed-size worker
//! pool and the results are written out batch by batch.

pub mod config;
pub mod crawler;
pub mod input;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Mail-Ripple operations
#[derive(Debug, Error)]
pub enum MailError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Input error: {0}")]
    Input(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Missing host in URL: {0}")]
    MissingHost(String),
}

/// Result type alias for Mail-Ripple operations
pub type Result<T> = std::result::Result<T, MailError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{BatchOrchestrator, CrawlLimits, CrawlOutcome, SiteCrawler};
pub use input::{SeedRecord, SeedSource};
pub use state::{EmailMap, ResultTable};
pub use url::{normalize_seed, resolve_link, PageUrl};
