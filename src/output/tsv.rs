//! Tab-separated batch files
//!
//! Each batch is written to `File-<batch>.csv` in the output directory, one
//! header line followed by one line per email row. Tabs and line breaks
//! inside values are replaced by spaces so every row stays on one line.

use crate::output::traits::{EmailRow, OutputHandler, OutputResult};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const HEADER: [&str; 5] = ["key", "name", "homepage", "hostname", "email"];

/// Writes one tab-separated file per batch
#[derive(Debug, Clone)]
pub struct TsvOutputHandler {
    directory: PathBuf,
}

impl TsvOutputHandler {
    /// Creates the handler, creating `directory` if needed
    pub fn new(directory: impl AsRef<Path>) -> OutputResult<Self> {
        let directory = directory.as_ref().to_path_buf();
        fs::create_dir_all(&directory)?;
        Ok(Self { directory })
    }

    /// Path of the file a batch is written to
    pub fn batch_path(&self, batch_index: usize) -> PathBuf {
        self.directory.join(format!("File-{}.csv", batch_index))
    }
}

impl OutputHandler for TsvOutputHandler {
    fn write_batch(&mut self, batch_index: usize, rows: &[EmailRow]) -> OutputResult<()> {
        let path = self.batch_path(batch_index);
        let mut writer = BufWriter::new(File::create(&path)?);
        write_rows(&mut writer, rows)?;
        writer.flush()?;

        tracing::debug!("Wrote {} rows to {}", rows.len(), path.display());
        Ok(())
    }
}

/// Writes the header and `rows` as tab-separated lines
pub fn write_rows<W: Write>(writer: &mut W, rows: &[EmailRow]) -> std::io::Result<()> {
    writeln!(writer, "{}", HEADER.join("\t"))?;
    for row in rows {
        let fields = [&row.key, &row.name, &row.homepage, &row.hostname, &row.email];
        let line = fields
            .iter()
            .map(|f| sanitize(f))
            .collect::<Vec<_>>()
            .join("\t");
        writeln!(writer, "{}", line)?;
    }
    Ok(())
}

fn sanitize(field: &str) -> String {
    field.replace(['\t', '\r', '\n'], " ")
}
