use crate::crawler::{
    CrawlLimits, DEFAULT_BATCH_SIZE, DEFAULT_FETCH_TIMEOUT, DEFAULT_MAX_DOMAINS, DEFAULT_WORKERS,
};
use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Mail-Ripple
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of dequeues per crawl (batch-level override)
    #[serde(rename = "max-iterations", default = "default_max_iterations")]
    pub max_iterations: i64,

    /// Number of distinct hostnames a crawl may admit
    #[serde(rename = "max-domains", default = "default_max_domains")]
    pub max_domains: i64,

    /// Number of crawls running at the same time
    #[serde(default = "default_workers")]
    pub workers: u32,

    /// Number of seed records per output batch
    #[serde(rename = "batch-size", default = "default_batch_size")]
    pub batch_size: u32,

    /// Timeout for a single page fetch (seconds)
    #[serde(rename = "fetch-timeout-secs", default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

impl CrawlerConfig {
    /// Converts the validated caps into crawl limits
    ///
    /// Negative values are clamped to zero; `validate` rejects them before
    /// this is ever reached in the binary.
    pub fn limits(&self) -> CrawlLimits {
        CrawlLimits {
            max_domains: self.max_domains.max(0) as usize,
            max_iterations: self.max_iterations.max(0) as usize,
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            max_domains: default_max_domains(),
            workers: default_workers(),
            batch_size: default_batch_size(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

fn default_max_iterations() -> i64 {
    10
}

fn default_max_domains() -> i64 {
    DEFAULT_MAX_DOMAINS as i64
}

fn default_workers() -> u32 {
    DEFAULT_WORKERS as u32
}

fn default_batch_size() -> u32 {
    DEFAULT_BATCH_SIZE as u32
}

fn default_fetch_timeout_secs() -> u64 {
    DEFAULT_FETCH_TIMEOUT.as_secs()
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "MailRipple".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Seed input configuration
#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    /// Path to the SQLite database holding the seed records
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Query returning `key, homepage[, name]` rows
    pub query: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving one tab-separated file per batch
    pub directory: String,

    /// Optional SQLite database receiving every email row
    #[serde(rename = "database-path", default)]
    pub database_path: Option<String>,

    /// Optional path of the markdown run summary
    #[serde(rename = "summary-path", default)]
    pub summary_path: Option<String>,
}
