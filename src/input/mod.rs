//! Seed input
//!
//! Seeds arrive as `(key, url)` records from a [`SeedSource`]. The key is an
//! opaque identifier that groups the results; the URL is a candidate seed
//! that the crawler normalizes itself.

mod sqlite;

pub use sqlite::SqliteSeedSource;

use crate::Result;

/// One seed to crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedRecord {
    /// Opaque identifier the results are filed under
    pub key: String,

    /// Candidate seed URL, not necessarily normalized
    pub url: String,

    /// Optional display name carried through to the output
    pub name: Option<String>,
}

impl SeedRecord {
    pub fn new(key: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            url: url.into(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Supplies the ordered list of seeds for a run
pub trait SeedSource {
    fn load_seeds(&self) -> Result<Vec<SeedRecord>>;
}

impl SeedSource for Vec<SeedRecord> {
    fn load_seeds(&self) -> Result<Vec<SeedRecord>> {
        Ok(self.clone())
    }
}
