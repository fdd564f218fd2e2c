//! Markdown run summary
//!
//! Collects per-batch row counts as batches are written and renders a
//! human-readable summary when the run finishes.

use crate::output::stats::RunStatistics;
use crate::output::traits::{EmailRow, OutputHandler, OutputResult};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Hostnames listed in the summary before it switches to a count
const TOP_HOSTNAMES: usize = 20;

/// Output handler that writes a markdown summary at the end of the run
#[derive(Debug, Clone)]
pub struct MarkdownSummaryHandler {
    path: PathBuf,
    config_hash: Option<String>,
    batch_rows: BTreeMap<usize, usize>,
    hostname_rows: BTreeMap<String, usize>,
}

impl MarkdownSummaryHandler {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            config_hash: None,
            batch_rows: BTreeMap::new(),
            hostname_rows: BTreeMap::new(),
        }
    }

    /// Records the configuration hash in the summary header
    pub fn with_config_hash(mut self, hash: impl Into<String>) -> Self {
        self.config_hash = Some(hash.into());
        self
    }

    /// Renders the summary for `stats` and the batches seen so far
    pub fn render(&self, stats: &RunStatistics) -> String {
        let mut md = String::new();

        md.push_str("# Mail-Ripple Run Summary\n\n");

        md.push_str("## Run Information\n\n");
        md.push_str(&format!("- **Started**: {}\n", stats.started_at.to_rfc3339()));
        if let Some(finished) = stats.finished_at {
            md.push_str(&format!("- **Finished**: {}\n", finished.to_rfc3339()));
        }
        if let Some(duration) = stats.duration_seconds() {
            md.push_str(&format!(
                "- **Duration**: {} seconds ({:.2} minutes)\n",
                duration,
                duration as f64 / 60.0
            ));
        }
        let status = if stats.cancelled { "cancelled" } else { "completed" };
        md.push_str(&format!("- **Status**: {}\n", status));
        if let Some(hash) = &self.config_hash {
            md.push_str(&format!("- **Config Hash**: {}\n", hash));
        }
        md.push('\n');

        md.push_str("## Overall Statistics\n\n");
        md.push_str(&format!("- **Seeds**: {}\n", stats.seeds_total));
        md.push_str(&format!("- **Seeds Crawled**: {}\n", stats.seeds_crawled));
        md.push_str(&format!(
            "- **Seeds With Emails**: {}\n",
            stats.seeds_with_emails
        ));
        md.push_str(&format!("- **Email Rows**: {}\n", stats.rows_written));
        md.push_str(&format!(
            "- **Distinct Hostnames**: {}\n\n",
            stats.hostnames.len()
        ));

        if !self.batch_rows.is_empty() || !stats.failed_batches.is_empty() {
            md.push_str("## Batches\n\n");
            md.push_str("| Batch | Rows | Status |\n");
            md.push_str("|-------|------|--------|\n");

            let mut indices: Vec<usize> = self
                .batch_rows
                .keys()
                .copied()
                .chain(stats.failed_batches.iter().copied())
                .collect();
            indices.sort_unstable();
            indices.dedup();

            for index in indices {
                if stats.failed_batches.contains(&index) {
                    md.push_str(&format!("| {} | - | failed |\n", index));
                } else {
                    let rows = self.batch_rows.get(&index).copied().unwrap_or(0);
                    md.push_str(&format!("| {} | {} | written |\n", index, rows));
                }
            }
            md.push('\n');
        }

        if !self.hostname_rows.is_empty() {
            md.push_str(&format!("## Top {} Hostnames\n\n", TOP_HOSTNAMES));
            md.push_str("| Hostname | Emails |\n");
            md.push_str("|----------|--------|\n");

            let mut hosts: Vec<_> = self.hostname_rows.iter().collect();
            hosts.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

            for (host, count) in hosts.iter().take(TOP_HOSTNAMES) {
                md.push_str(&format!("| {} | {} |\n", host, count));
            }
            if hosts.len() > TOP_HOSTNAMES {
                md.push_str(&format!("\n... and {} more\n", hosts.len() - TOP_HOSTNAMES));
            }
            md.push('\n');
        }

        md
    }
}

impl OutputHandler for MarkdownSummaryHandler {
    fn write_batch(&mut self, batch_index: usize, rows: &[EmailRow]) -> OutputResult<()> {
        self.batch_rows.insert(batch_index, rows.len());
        for row in rows {
            *self.hostname_rows.entry(row.hostname.clone()).or_default() += 1;
        }
        Ok(())
    }

    fn finish(&mut self, stats: &RunStatistics) -> OutputResult<()> {
        let markdown = self.render(stats);
        let mut file = File::create(&self.path)?;
        file.write_all(markdown.as_bytes())?;
        tracing::info!("Summary written to {}", self.path.display());
        Ok(())
    }
}
