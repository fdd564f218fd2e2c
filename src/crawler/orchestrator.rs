//! Batch orchestrator - runs many site crawls on a bounded worker pool
//!
//! Every seed record gets its own task. A semaphore limits how many crawls
//! run at once and a `JoinSet` is the barrier the orchestrator waits on.
//! Results land in a shared [`ResultTable`] under the record's key.
//!
//! Failure handling per task:
//! - a crawl that panics is logged and its key receives an empty map
//! - a cancelled crawl writes nothing, so its key stays absent

use crate::crawler::site::{CrawlOutcome, SeedCrawler, SiteCrawler};
use crate::input::SeedRecord;
use crate::state::{EmailMap, ResultTable};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Default number of crawls running at the same time
pub const DEFAULT_WORKERS: usize = 4;

/// What happened to one task of a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TaskOutcome {
    Completed,
    Failed,
    Cancelled,
}

/// Task counts for one batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub completed: usize,
    pub failed: usize,
    pub cancelled: usize,
}

impl BatchReport {
    fn record(&mut self, outcome: TaskOutcome) {
        match outcome {
            TaskOutcome::Completed => self.completed += 1,
            TaskOutcome::Failed => self.failed += 1,
            TaskOutcome::Cancelled => self.cancelled += 1,
        }
    }
}

/// Runs one crawl per seed record on a fixed-size worker pool
pub struct BatchOrchestrator<C = SiteCrawler> {
    crawler: C,
    workers: usize,
    cancel: CancellationToken,
}

impl<C: SeedCrawler> BatchOrchestrator<C> {
    /// Creates an orchestrator running at most `workers` crawls at once
    ///
    /// A pool size of zero is bumped to one.
    pub fn new(crawler: C, workers: usize) -> Self {
        Self {
            crawler,
            workers: workers.max(1),
            cancel: CancellationToken::new(),
        }
    }

    /// Uses `cancel` instead of a private token
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Token that stops every in-flight and pending crawl when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Crawls every record and returns the emails found per key
    ///
    /// Returns only after every task has finished.
    pub async fn run_batch(&self, items: &[SeedRecord]) -> HashMap<String, EmailMap> {
        let table = ResultTable::new();
        self.run_into(items, &table).await;
        table.take()
    }

    /// Crawls every record, writing each finished result into `table`
    pub async fn run_into(&self, items: &[SeedRecord], table: &ResultTable) -> BatchReport {
        let semaphore = Arc::new(Semaphore::new(self.workers));
        let total = items.len();
        let mut tasks = JoinSet::new();

        for (index, item) in items.iter().cloned().enumerate() {
            let semaphore = Arc::clone(&semaphore);
            let crawler = self.crawler.clone();
            let table = table.clone();
            let cancel = self.cancel.clone();

            tasks.spawn(async move {
                let _permit = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return TaskOutcome::Cancelled,
                    permit = semaphore.acquire_owned() => match permit {
                        Ok(permit) => permit,
                        Err(_) => return TaskOutcome::Cancelled,
                    },
                };

                // The crawl runs in its own task so a panic stays inside it
                let seed = item.url.clone();
                let token = cancel.clone();
                let crawl = tokio::spawn(async move { crawler.crawl_seed(seed, token).await });

                let (outcome, emails) = match crawl.await {
                    Ok(CrawlOutcome::Completed(report)) => {
                        (TaskOutcome::Completed, Some(report.emails))
                    }
                    Ok(CrawlOutcome::Cancelled) => {
                        tracing::warn!("Crawl for key {} ({}) cancelled", item.key, item.url);
                        (TaskOutcome::Cancelled, None)
                    }
                    Err(e) if e.is_cancelled() || cancel.is_cancelled() => {
                        tracing::warn!("Crawl for key {} ({}) aborted", item.key, item.url);
                        (TaskOutcome::Cancelled, None)
                    }
                    Err(e) => {
                        tracing::error!("Crawl for key {} ({}) failed: {}", item.key, item.url, e);
                        (TaskOutcome::Failed, Some(EmailMap::new()))
                    }
                };

                // Every write to the table gets a progress line
                if let Some(emails) = emails {
                    table.insert(item.key.clone(), emails);
                    tracing::info!("{} of {}: {}", index + 1, total, item.url);
                }
                outcome
            });
        }

        let mut report = BatchReport::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => report.record(outcome),
                Err(e) => {
                    tracing::error!("A batch task panicked or was aborted: {}", e);
                    report.record(TaskOutcome::Failed);
                }
            }
        }

        tracing::debug!(
            "Batch finished: {} completed, {} failed, {} cancelled",
            report.completed,
            report.failed,
            report.cancelled
        );

        report
    }
}
