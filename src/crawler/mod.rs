//! Crawler module for page fetching, email extraction and batch execution
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with content-type filtering
//! - Email extraction over raw page bodies
//! - Anchor extraction over parsed HTML
//! - The bounded breadth-first single-site crawl
//! - The worker pool that runs many crawls at once, and the batch runner

mod batch;
mod extract;
mod fetcher;
mod orchestrator;
mod parser;
mod site;

pub use batch::{run_batches, DEFAULT_BATCH_SIZE};
pub use extract::extract_emails;
pub use fetcher::{build_http_client, fetch_page, FetchResult, DEFAULT_FETCH_TIMEOUT};
pub use orchestrator::{BatchOrchestrator, BatchReport, DEFAULT_WORKERS};
pub use parser::extract_hrefs;
pub use site::{
    CrawlLimits, CrawlOutcome, CrawlStats, SeedCrawler, SiteCrawler, SiteReport,
    DEFAULT_MAX_DOMAINS, DEFAULT_MAX_ITERATIONS,
};
