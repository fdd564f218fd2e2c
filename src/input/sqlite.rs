//! SQLite seed source
//!
//! Runs a configured query and reads `key, homepage[, name]` from each row.
//! Keys may be stored as text or integers; rows with an empty homepage are
//! dropped.

use crate::input::{SeedRecord, SeedSource};
use crate::MailError;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags, Row};
use std::path::{Path, PathBuf};

/// Reads seed records from a SQLite database
#[derive(Debug, Clone)]
pub struct SqliteSeedSource {
    path: PathBuf,
    query: String,
}

impl SqliteSeedSource {
    pub fn new(path: impl AsRef<Path>, query: impl Into<String>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            query: query.into(),
        }
    }

    /// Runs the query against an already open connection
    pub fn load_from(conn: &Connection, query: &str) -> Result<Vec<SeedRecord>, MailError> {
        let mut stmt = conn.prepare(query)?;
        let columns = stmt.column_count();
        if columns < 2 {
            return Err(MailError::Input(format!(
                "seed query must return at least key and homepage columns, got {}",
                columns
            )));
        }

        let rows = stmt.query_map([], |row| {
            let key = column_text(row, 0)?;
            let url = column_text(row, 1)?;
            let name = if columns > 2 {
                Some(column_text(row, 2)?).filter(|n| !n.is_empty())
            } else {
                None
            };
            Ok(SeedRecord {
                key,
                url: url.trim().to_string(),
                name,
            })
        })?;

        let mut records = Vec::new();
        for row in rows {
            let record = row?;
            if record.url.is_empty() {
                tracing::debug!("Dropping seed {} without homepage", record.key);
                continue;
            }
            records.push(record);
        }

        Ok(records)
    }
}

impl SeedSource for SqliteSeedSource {
    fn load_seeds(&self) -> Result<Vec<SeedRecord>, MailError> {
        let conn = Connection::open_with_flags(&self.path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        let records = Self::load_from(&conn, &self.query)?;
        tracing::info!(
            "Loaded {} seed records from {}",
            records.len(),
            self.path.display()
        );
        Ok(records)
    }
}

/// Reads a column as text whatever its storage class; NULL becomes empty
fn column_text(row: &Row<'_>, index: usize) -> rusqlite::Result<String> {
    Ok(match row.get_ref(index)? {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(t) | ValueRef::Blob(t) => String::from_utf8_lossy(t).into_owned(),
    })
}
