use std::collections::HashSet;

/// Hostnames admitted during one crawl
///
/// The cap only gates hostnames that have not been seen yet: once the set
/// holds more than `max_domains` entries, new hostnames are refused while
/// already admitted ones keep passing.
#[derive(Debug, Clone)]
pub struct DomainSet {
    hosts: HashSet<String>,
    max_domains: usize,
}

impl DomainSet {
    pub fn new(max_domains: usize) -> Self {
        Self {
            hosts: HashSet::new(),
            max_domains,
        }
    }

    /// Admits a hostname, returning `false` when the cap refuses it
    pub fn admit(&mut self, hostname: &str) -> bool {
        if self.hosts.contains(hostname) {
            return true;
        }

        if self.hosts.len() > self.max_domains {
            return false;
        }

        self.hosts.insert(hostname.to_string());
        true
    }

    pub fn contains(&self, hostname: &str) -> bool {
        self.hosts.contains(hostname)
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Largest number of hostnames this set can ever hold
    pub fn capacity(&self) -> usize {
        self.max_domains + 1
    }
}
