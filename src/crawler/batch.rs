//! Sequential batch runner
//!
//! Splits the seed records into fixed-size batches, crawls each batch with
//! the orchestrator, and hands the flattened rows to the output handler
//! before moving on. A batch whose output fails to write is logged and
//! counted; the following batches still run.

use crate::crawler::orchestrator::BatchOrchestrator;
use crate::crawler::site::SeedCrawler;
use crate::input::SeedRecord;
use crate::output::{flatten_results, OutputHandler, RunStatistics};

/// Default number of seed records per batch
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Crawls `records` batch by batch and writes each batch through `handler`
///
/// Stops early, without writing the interrupted batch, once the
/// orchestrator's cancellation token fires.
pub async fn run_batches<C: SeedCrawler>(
    orchestrator: &BatchOrchestrator<C>,
    records: &[SeedRecord],
    batch_size: usize,
    handler: &mut dyn OutputHandler,
) -> RunStatistics {
    let batch_size = batch_size.max(1);
    let batch_count = records.len().div_ceil(batch_size);
    let cancel = orchestrator.cancellation_token();
    let mut stats = RunStatistics::start(records.len());

    tracing::info!(
        "Crawling {} seeds in {} batches of up to {} ({} workers)",
        records.len(),
        batch_count,
        batch_size,
        orchestrator.workers()
    );

    for (index, batch) in records.chunks(batch_size).enumerate() {
        if cancel.is_cancelled() {
            tracing::warn!("Cancelled before batch {}, stopping", index);
            stats.cancelled = true;
            break;
        }

        let results = orchestrator.run_batch(batch).await;

        if cancel.is_cancelled() {
            tracing::warn!("Batch {} interrupted, discarding its partial results", index);
            stats.cancelled = true;
            break;
        }

        let rows = flatten_results(batch, &results);
        stats.seeds_crawled += batch.len();
        stats.seeds_with_emails += results.values().filter(|m| !m.is_empty()).count();

        tracing::info!("Writing files of batch process {}...", index);
        match handler.write_batch(index, &rows) {
            Ok(()) => {
                stats.batches_written += 1;
                stats.rows_written += rows.len();
                stats.record_hostnames(&rows);
            }
            Err(e) => {
                tracing::error!("Error in batch {}: {}", index, e);
                stats.failed_batches.push(index);
            }
        }
    }

    stats.finish();

    if let Err(e) = handler.finish(&stats) {
        tracing::error!("Failed to finalize output: {}", e);
    }

    stats
}
