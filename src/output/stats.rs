//! Run statistics
//!
//! Collected by the batch runner while it works through the seeds and
//! handed to every output handler at the end of the run.

use crate::output::traits::EmailRow;
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

/// Summary of one run over all batches
#[derive(Debug, Clone)]
pub struct RunStatistics {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Seeds supplied by the input
    pub seeds_total: usize,

    /// Seeds whose batch ran to completion
    pub seeds_crawled: usize,

    /// Seeds that produced at least one email
    pub seeds_with_emails: usize,

    /// Batches written successfully
    pub batches_written: usize,

    /// Indices of batches whose output failed
    pub failed_batches: Vec<usize>,

    /// Email rows written successfully
    pub rows_written: usize,

    /// Distinct hostnames across all written rows
    pub hostnames: BTreeSet<String>,

    /// Whether the run stopped on cancellation
    pub cancelled: bool,
}

impl RunStatistics {
    pub fn start(seeds_total: usize) -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            seeds_total,
            seeds_crawled: 0,
            seeds_with_emails: 0,
            batches_written: 0,
            failed_batches: Vec::new(),
            rows_written: 0,
            hostnames: BTreeSet::new(),
            cancelled: false,
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn record_hostnames(&mut self, rows: &[EmailRow]) {
        self.hostnames
            .extend(rows.iter().map(|row| row.hostname.clone()));
    }

    /// Wall-clock duration in seconds, once finished
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }
}

/// Prints statistics to stdout
pub fn print_statistics(stats: &RunStatistics) {
    println!("=== Mail-Ripple Run Statistics ===\n");

    println!("Started:  {}", stats.started_at.to_rfc3339());
    if let Some(finished) = stats.finished_at {
        println!("Finished: {}", finished.to_rfc3339());
    }
    if let Some(secs) = stats.duration_seconds() {
        println!("Duration: {}s", secs);
    }
    if stats.cancelled {
        println!("Status:   cancelled");
    }

    println!("\nSeeds:");
    println!("  Total: {}", stats.seeds_total);
    println!("  Crawled: {}", stats.seeds_crawled);
    println!("  With emails: {}", stats.seeds_with_emails);

    println!("\nBatches:");
    println!("  Written: {}", stats.batches_written);
    println!("  Failed: {}", stats.failed_batches.len());
    for index in &stats.failed_batches {
        println!("    - batch {}", index);
    }

    println!("\nEmails:");
    println!("  Rows written: {}", stats.rows_written);
    println!("  Distinct hostnames: {}", stats.hostnames.len());
}
