use crate::state::record::Record;
use crate::url::canonicalize;
use std::collections::HashSet;

/// Extracted records, unique by source URL and bounded in size
#[derive(Debug, Clone)]
pub struct RecordStore {
    records: Vec<Record>,
    sources: HashSet<String>,
    capacity: usize,
}

impl RecordStore {
    /// Creates an empty store that accepts at most `capacity` records
    pub fn new(capacity: usize) -> Self {
        Self {
            records: Vec::new(),
            sources: HashSet::new(),
            capacity,
        }
    }

    /// Adds a record unless its source URL is already stored or the store is full
    ///
    /// Returns true if the record was inserted.
    pub fn add(&mut self, record: Record) -> bool {
        if self.is_full() {
            tracing::warn!(
                "Record store full ({}), dropping: {}",
                self.capacity,
                record.title
            );
            return false;
        }

        let key = canonicalize(&record.source_url);
        if !self.sources.insert(key) {
            tracing::warn!("Duplicate record skipped: {}", record.title);
            return false;
        }

        tracing::info!("Record added: {} at {}", record.title, record.company);
        self.records.push(record);
        true
    }

    /// Number of stored records
    pub fn count(&self) -> usize {
        self.records.len()
    }

    /// Maximum number of records
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns whether the store has reached its capacity
    pub fn is_full(&self) -> bool {
        self.records.len() >= self.capacity
    }

    /// Returns whether a record from this source URL is stored
    pub fn contains_source(&self, url: &str) -> bool {
        self.sources.contains(&canonicalize(url))
    }

    /// Iterates over records in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    /// Records in insertion order
    pub fn as_slice(&self) -> &[Record] {
        &self.records
    }

    /// Consumes the store, returning its records in insertion order
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(url: &str, title: &str) -> Record {
        Record::new(title, "Acme", "desc", "apply", url)
    }

    #[test]
    fn test_add_and_count() {
        let mut store = RecordStore::new(3);
        assert!(store.add(record("https://acme.test/jobs/1", "One")));
        assert!(store.add(record("https://acme.test/jobs/2", "Two")));
        assert_eq!(store.count(), 2);
        assert!(!store.is_full());
    }

    #[test]
    fn test_add_is_idempotent_by_source_url() {
        let mut store = RecordStore::new(5);
        assert!(store.add(record("https://acme.test/jobs/1", "One")));
        assert!(!store.add(record("https://acme.test/jobs/1", "One again")));
        assert!(!store.add(record("https://acme.test/jobs/1/#top", "Same page")));
        assert_eq!(store.count(), 1);
        assert_eq!(store.as_slice()[0].title, "One");
    }

    #[test]
    fn test_capacity_is_enforced() {
        let mut store = RecordStore::new(1);
        assert!(store.add(record("https://acme.test/jobs/1", "One")));
        assert!(store.is_full());
        assert!(!store.add(record("https://acme.test/jobs/2", "Two")));
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_preserves_insertion_order() {
        let mut store = RecordStore::new(5);
        store.add(record("https://acme.test/jobs/b", "B"));
        store.add(record("https://acme.test/jobs/a", "A"));
        let titles: Vec<&str> = store.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["B", "A"]);
        assert!(store.contains_source("https://acme.test/jobs/a"));
        assert_eq!(store.into_records().len(), 2);
    }
}
