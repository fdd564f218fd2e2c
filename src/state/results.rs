use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Emails found by one crawl, grouped by the hostname of the page they were on
pub type EmailMap = BTreeMap<String, BTreeSet<String>>;

/// Unions `emails` into the set kept for `hostname`
///
/// Nothing is inserted when `emails` is empty, so hostnames without matches
/// never show up as empty entries.
pub fn merge_emails<I>(map: &mut EmailMap, hostname: &str, emails: I)
where
    I: IntoIterator<Item = String>,
{
    let mut emails = emails.into_iter().peekable();
    if emails.peek().is_none() {
        return;
    }

    map.entry(hostname.to_string()).or_default().extend(emails);
}

/// Counts every `(hostname, email)` pair in a map
pub fn count_emails(map: &EmailMap) -> usize {
    map.values().map(BTreeSet::len).sum()
}

/// Result table shared by all workers of a batch
///
/// Each key receives its whole `EmailMap` in a single insert, so readers see
/// either nothing or the complete result for a key. Cloning the table clones
/// the handle, not the contents.
#[derive(Debug, Clone, Default)]
pub struct ResultTable {
    inner: Arc<Mutex<HashMap<String, EmailMap>>>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, EmailMap>> {
        // A panicking writer cannot leave a half-written map behind since
        // inserts are single operations, so a poisoned lock is still usable
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores the result for `key`, replacing any previous value
    pub fn insert(&self, key: impl Into<String>, emails: EmailMap) {
        self.lock().insert(key.into(), emails);
    }

    pub fn get(&self, key: &str) -> Option<EmailMap> {
        self.lock().get(key).cloned()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Moves every entry out, leaving the table empty
    pub fn take(&self) -> HashMap<String, EmailMap> {
        std::mem::take(&mut *self.lock())
    }
}
