//! Output module for writing harvested emails
//!
//! This module handles:
//! - Flattening per-key results into `(key, hostname, email)` rows
//! - Writing one tab-separated file per batch
//! - Appending rows to a SQLite database
//! - Generating a markdown run summary and printing run statistics

mod markdown;
mod sqlite_output;
pub mod stats;
mod traits;
mod tsv;

pub use markdown::MarkdownSummaryHandler;
pub use sqlite_output::SqliteOutputHandler;
pub use stats::{print_statistics, RunStatistics};
pub use traits::{EmailRow, MemoryOutput, OutputError, OutputFanout, OutputHandler, OutputResult};
pub use tsv::{write_rows, TsvOutputHandler};

use crate::input::SeedRecord;
use crate::state::EmailMap;
use std::collections::HashMap;

/// Flattens a batch's results into one row per `(key, hostname, email)`
///
/// Rows are joined back to `records` for the display name and homepage,
/// in record order, then by hostname and email. Keys missing from
/// `results` (cancelled crawls) and keys with no emails produce no rows.
pub fn flatten_results(records: &[SeedRecord], results: &HashMap<String, EmailMap>) -> Vec<EmailRow> {
    let mut rows = Vec::new();

    for record in records {
        let Some(emails) = results.get(&record.key) else {
            continue;
        };

        for (hostname, addresses) in emails {
            for email in addresses {
                rows.push(EmailRow {
                    key: record.key.clone(),
                    name: record.name.clone().unwrap_or_default(),
                    homepage: record.url.clone(),
                    hostname: hostname.clone(),
                    email: email.clone(),
                });
            }
        }
    }

    rows
}
