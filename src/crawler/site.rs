//! Single-site crawler
//!
//! Runs one bounded breadth-first crawl from a seed URL and collects the
//! email addresses found on every HTML page it reaches. Each loop iteration
//! dequeues exactly one URL:
//!
//! 1. Pop the front of the frontier (the URL is now processed)
//! 2. Skip it if its hostname is refused by the domain cap
//! 3. Fetch it; skip on network errors, non-2xx statuses and non-HTML bodies
//! 4. Scan the raw body for emails and file them under the hostname
//! 5. Parse the body, resolve every anchor and enqueue unseen links
//!
//! The loop stops when the frontier is empty or `max_iterations + 1` URLs
//! have been dequeued, skipped ones included.

use crate::config::Config;
use crate::crawler::extract::extract_emails;
use crate::crawler::fetcher::{build_http_client, fetch_page, FetchResult};
use crate::crawler::parser::extract_hrefs;
use crate::state::{count_emails, merge_emails, DomainSet, EmailMap, Frontier};
use crate::url::{normalize_seed, resolve_link, PageUrl};
use crate::MailError;
use reqwest::Client;
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Iteration cap used when a caller does not pick one
pub const DEFAULT_MAX_ITERATIONS: usize = 999;

/// Domain cap used when a caller does not pick one
pub const DEFAULT_MAX_DOMAINS: usize = 10;

/// Bounds applied to every crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlLimits {
    /// Hostnames are refused once more than this many have been admitted
    pub max_domains: usize,

    /// The crawl stops after `max_iterations + 1` dequeues
    pub max_iterations: usize,
}

impl Default for CrawlLimits {
    fn default() -> Self {
        Self {
            max_domains: DEFAULT_MAX_DOMAINS,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// Counters collected during one crawl
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// URLs popped from the frontier
    pub dequeued: usize,
    /// URLs that could not be split into host and path
    pub unparseable: usize,
    /// URLs dropped because their hostname was refused by the domain cap
    pub skipped_domain_cap: usize,
    /// Fetches attempted
    pub fetched: usize,
    /// Fetches that returned an HTML body
    pub html_pages: usize,
    /// Fetches that failed at the network or HTTP level
    pub fetch_failures: usize,
    /// Fetches that returned something other than HTML
    pub non_html: usize,
    /// Links added to the frontier
    pub links_enqueued: usize,
    /// Distinct hostnames admitted
    pub domains_admitted: usize,
    /// `(hostname, email)` pairs in the final result
    pub emails_found: usize,
}

/// Result of a crawl that ran to completion
#[derive(Debug, Clone)]
pub struct SiteReport {
    /// The normalized seed the crawl started from
    pub seed: String,
    pub emails: EmailMap,
    pub stats: CrawlStats,
}

/// How a cancellable crawl ended
#[derive(Debug, Clone)]
pub enum CrawlOutcome {
    Completed(SiteReport),
    /// The cancellation token fired; no partial result is returned
    Cancelled,
}

/// Something that can crawl a seed URL to completion or cancellation
///
/// `SiteCrawler` is the real implementation; the batch orchestrator is
/// generic over this so crawls can be swapped out in tests.
pub trait SeedCrawler: Clone + Send + Sync + 'static {
    fn crawl_seed(
        &self,
        seed: String,
        cancel: CancellationToken,
    ) -> impl Future<Output = CrawlOutcome> + Send;
}

/// Crawls one site at a time with a shared HTTP client
#[derive(Debug, Clone)]
pub struct SiteCrawler {
    client: Client,
    limits: CrawlLimits,
}

impl SiteCrawler {
    pub fn new(client: Client, limits: CrawlLimits) -> Self {
        Self { client, limits }
    }

    /// Builds a crawler from the configuration's user agent, timeout and caps
    pub fn from_config(config: &Config) -> Result<Self, MailError> {
        let client = build_http_client(&config.user_agent, config.crawler.fetch_timeout())?;
        Ok(Self::new(client, config.crawler.limits()))
    }

    pub fn limits(&self) -> CrawlLimits {
        self.limits
    }

    /// Crawls from `seed` and returns the emails found, grouped by hostname
    ///
    /// Page-level failures are absorbed, so this always returns a map,
    /// possibly empty.
    pub async fn crawl(&self, seed: &str) -> EmailMap {
        match self.crawl_until_cancelled(seed, &CancellationToken::new()).await {
            CrawlOutcome::Completed(report) => report.emails,
            CrawlOutcome::Cancelled => EmailMap::new(),
        }
    }

    /// Crawls from `seed` until done or until `cancel` fires
    ///
    /// Cancellation aborts an in-flight fetch and discards everything found
    /// so far.
    pub async fn crawl_until_cancelled(
        &self,
        seed: &str,
        cancel: &CancellationToken,
    ) -> CrawlOutcome {
        let seed = normalize_seed(seed);
        let mut frontier = Frontier::with_seed(seed.clone());
        let mut domains = DomainSet::new(self.limits.max_domains);
        let mut emails = EmailMap::new();
        let mut stats = CrawlStats::default();

        tracing::debug!("Starting crawl from {}", seed);

        while stats.dequeued <= self.limits.max_iterations {
            if cancel.is_cancelled() {
                return CrawlOutcome::Cancelled;
            }

            let url = match frontier.pop() {
                Some(url) => url,
                None => break,
            };
            stats.dequeued += 1;

            let page = match PageUrl::parse(&url) {
                Ok(page) => page,
                Err(e) => {
                    tracing::debug!("Skipping {}: {}", url, e);
                    stats.unparseable += 1;
                    continue;
                }
            };

            if !domains.admit(&page.hostname) {
                tracing::trace!("Domain cap reached, skipping {}", url);
                stats.skipped_domain_cap += 1;
                continue;
            }

            stats.fetched += 1;
            let fetched = tokio::select! {
                biased;
                _ = cancel.cancelled() => return CrawlOutcome::Cancelled,
                result = fetch_page(&self.client, &url) => result,
            };

            let body = match fetched {
                FetchResult::Html { body } => body,
                FetchResult::ContentMismatch { content_type } => {
                    tracing::debug!("Page is not HTML ({:?}): {}", content_type, url);
                    stats.non_html += 1;
                    continue;
                }
                FetchResult::HttpError { status_code } => {
                    tracing::debug!("HTTP {} for {}", status_code, url);
                    stats.fetch_failures += 1;
                    continue;
                }
                FetchResult::NetworkError { error } => {
                    tracing::debug!("Failed to fetch {}: {}", url, error);
                    stats.fetch_failures += 1;
                    continue;
                }
            };
            stats.html_pages += 1;

            merge_emails(&mut emails, &page.hostname, extract_emails(&body));

            for href in extract_hrefs(&body) {
                if frontier.push(resolve_link(&href, &page)) {
                    stats.links_enqueued += 1;
                }
            }
        }

        stats.domains_admitted = domains.len();
        stats.emails_found = count_emails(&emails);

        tracing::debug!(
            "Finished {}: {} dequeued, {} HTML pages, {} emails, {} left in frontier",
            seed,
            stats.dequeued,
            stats.html_pages,
            stats.emails_found,
            frontier.len()
        );

        CrawlOutcome::Completed(SiteReport {
            seed,
            emails,
            stats,
        })
    }
}

impl SeedCrawler for SiteCrawler {
    fn crawl_seed(
        &self,
        seed: String,
        cancel: CancellationToken,
    ) -> impl Future<Output = CrawlOutcome> + Send {
        let crawler = self.clone();
        async move { crawler.crawl_until_cancelled(&seed, &cancel).await }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UserAgentConfig;
    use std::time::Duration;

    fn crawler(limits: CrawlLimits) -> SiteCrawler {
        let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(2)).unwrap();
        SiteCrawler::new(client, limits)
    }

    #[test]
    fn test_default_limits() {
        let limits = CrawlLimits::default();
        assert_eq!(limits.max_iterations, 999);
        assert_eq!(limits.max_domains, 10);
    }

    #[test]
    fn test_from_config_uses_configured_caps() {
        let config = crate::config::parse_config(
            r#"
[crawler]
max-iterations = 3
max-domains = 0

[input]
database-path = "seeds.db"
query = "SELECT key, homepage FROM seeds"

[output]
directory = "out"
"#,
        )
        .unwrap();

        let crawler = SiteCrawler::from_config(&config).unwrap();
        assert_eq!(
            crawler.limits(),
            CrawlLimits {
                max_domains: 0,
                max_iterations: 3,
            }
        );
    }

    #[tokio::test]
    async fn test_unreachable_seed_yields_empty_map() {
        let crawler = crawler(CrawlLimits::default());
        let emails = crawler.crawl("127.0.0.1:9").await;
        assert!(emails.is_empty());
    }

    #[tokio::test]
    async fn test_seed_only_when_no_iterations() {
        let crawler = crawler(CrawlLimits {
            max_domains: 10,
            max_iterations: 0,
        });
        match crawler
            .crawl_until_cancelled("127.0.0.1:9", &CancellationToken::new())
            .await
        {
            CrawlOutcome::Completed(report) => {
                assert_eq!(report.seed, "http://127.0.0.1:9/");
                assert_eq!(report.stats.dequeued, 1);
                assert_eq!(report.stats.fetch_failures, 1);
            }
            CrawlOutcome::Cancelled => panic!("crawl was not cancelled"),
        }
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let crawler = crawler(CrawlLimits::default());
        let token = CancellationToken::new();
        token.cancel();

        let outcome = crawler.crawl_until_cancelled("example.com", &token).await;
        assert!(matches!(outcome, CrawlOutcome::Cancelled));
    }

    #[tokio::test]
    async fn test_unparseable_seed_is_consumed() {
        let crawler = crawler(CrawlLimits::default());
        match crawler
            .crawl_until_cancelled("http://[bad", &CancellationToken::new())
            .await
        {
            CrawlOutcome::Completed(report) => {
                assert_eq!(report.stats.dequeued, 1);
                assert_eq!(report.stats.unparseable, 1);
                assert_eq!(report.stats.fetched, 0);
            }
            CrawlOutcome::Cancelled => panic!("crawl was not cancelled"),
        }
    }
}
