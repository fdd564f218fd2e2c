//! Output handler traits and types
//!
//! This module defines the trait interface for output handlers and the
//! flattened row format every handler consumes.

use crate::output::stats::RunStatistics;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// One `(key, hostname, email)` triple, joined with its seed record
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct EmailRow {
    /// Seed key the email was found under
    pub key: String,

    /// Display name of the seed record, empty when unknown
    pub name: String,

    /// Seed URL as supplied by the input
    pub homepage: String,

    /// Hostname of the page the email was found on
    pub hostname: String,

    /// The email address as matched
    pub email: String,
}

/// Trait for output handler implementations
///
/// Handlers receive one call per successfully crawled batch and a final
/// call once the run is over.
pub trait OutputHandler {
    /// Writes the rows of one batch
    fn write_batch(&mut self, batch_index: usize, rows: &[EmailRow]) -> OutputResult<()>;

    /// Called once after the last batch
    fn finish(&mut self, _stats: &RunStatistics) -> OutputResult<()> {
        Ok(())
    }
}

/// Writes every batch to several handlers
///
/// Every handler is attempted; the first error is returned afterwards.
#[derive(Default)]
pub struct OutputFanout {
    handlers: Vec<Box<dyn OutputHandler + Send>>,
}

impl OutputFanout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, handler: Box<dyn OutputHandler + Send>) {
        self.handlers.push(handler);
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl OutputHandler for OutputFanout {
    fn write_batch(&mut self, batch_index: usize, rows: &[EmailRow]) -> OutputResult<()> {
        let mut first_error = None;
        for handler in &mut self.handlers {
            if let Err(e) = handler.write_batch(batch_index, rows) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn finish(&mut self, stats: &RunStatistics) -> OutputResult<()> {
        let mut first_error = None;
        for handler in &mut self.handlers {
            if let Err(e) = handler.finish(stats) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

/// Keeps every row in memory
#[derive(Debug, Default)]
pub struct MemoryOutput {
    pub batches: Vec<(usize, Vec<EmailRow>)>,
}

impl OutputHandler for MemoryOutput {
    fn write_batch(&mut self, batch_index: usize, rows: &[EmailRow]) -> OutputResult<()> {
        self.batches.push((batch_index, rows.to_vec()));
        Ok(())
    }
}
