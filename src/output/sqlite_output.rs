//! SQLite-based output handler implementation
//!
//! Every run gets a row in `runs`; every email row is appended to `emails`
//! with the run and batch it came from.

use crate::output::stats::RunStatistics;
use crate::output::traits::{EmailRow, OutputHandler, OutputResult};
use chrono::Utc;
use rusqlite::{params, Connection};
use std::path::Path;

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    started_at TEXT NOT NULL,
    finished_at TEXT,
    status TEXT NOT NULL,
    seeds_total INTEGER NOT NULL DEFAULT 0,
    rows_written INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS emails (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    run_id INTEGER NOT NULL REFERENCES runs(id),
    batch INTEGER NOT NULL,
    seed_key TEXT NOT NULL,
    name TEXT NOT NULL,
    homepage TEXT NOT NULL,
    hostname TEXT NOT NULL,
    email TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_emails_key ON emails(seed_key);
CREATE INDEX IF NOT EXISTS idx_emails_hostname ON emails(hostname);
"#;

/// Appends email rows to a SQLite database
pub struct SqliteOutputHandler {
    conn: Connection,
    run_id: i64,
}

impl SqliteOutputHandler {
    /// Opens (or creates) the database at `path` and starts a new run
    pub fn new(path: &Path) -> OutputResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;
        Self::with_connection(conn)
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> OutputResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> OutputResult<Self> {
        conn.execute_batch(SCHEMA_SQL)?;
        conn.execute(
            "INSERT INTO runs (started_at, status) VALUES (?1, 'running')",
            params![Utc::now().to_rfc3339()],
        )?;
        let run_id = conn.last_insert_rowid();
        Ok(Self { conn, run_id })
    }

    pub fn run_id(&self) -> i64 {
        self.run_id
    }

    /// Number of email rows stored for this run
    pub fn count_rows(&self) -> OutputResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM emails WHERE run_id = ?1",
            params![self.run_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

impl OutputHandler for SqliteOutputHandler {
    fn write_batch(&mut self, batch_index: usize, rows: &[EmailRow]) -> OutputResult<()> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO emails (run_id, batch, seed_key, name, homepage, hostname, email)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for row in rows {
                stmt.execute(params![
                    self.run_id,
                    batch_index as i64,
                    row.key,
                    row.name,
                    row.homepage,
                    row.hostname,
                    row.email
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn finish(&mut self, stats: &RunStatistics) -> OutputResult<()> {
        let status = if stats.cancelled { "cancelled" } else { "completed" };
        let finished_at = stats.finished_at.unwrap_or_else(Utc::now).to_rfc3339();
        self.conn.execute(
            "UPDATE runs SET finished_at = ?1, status = ?2, seeds_total = ?3, rows_written = ?4
             WHERE id = ?5",
            params![
                finished_at,
                status,
                stats.seeds_total as i64,
                stats.rows_written as i64,
                self.run_id
            ],
        )?;
        Ok(())
    }
}
