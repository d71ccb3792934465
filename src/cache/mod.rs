//! Read-through cache of fetched records.
//!
//! Only records carrying both an identifier and a version are kept. When the
//! cache is full the entry inserted first is evicted.

use std::collections::{HashMap, VecDeque};

use crate::models::Record;

#[derive(Debug)]
pub struct RecordCache {
    capacity: usize,
    entries: HashMap<String, Record>,
    order: VecDeque<String>,
}

impl RecordCache {
    /// A cache holding at most `capacity` records; `0` disables caching.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The cached record for `id`, if it carries a version.
    pub fn get(&self, id: &str) -> Option<&Record> {
        self.entries.get(id).filter(|r| r.version().is_some())
    }

    /// Store a record, replacing any older copy with the same identifier.
    /// Returns `false` when the record lacks an identifier or version.
    pub fn insert(&mut self, record: Record) -> bool {
        if self.capacity == 0 || record.version().is_none() {
            return false;
        }
        let Some(id) = record.id().map(str::to_string) else {
            return false;
        };

        if self.entries.insert(id.clone(), record).is_some() {
            self.order.retain(|cached| cached != &id);
        }
        self.order.push_back(id);

        while self.order.len() > self.capacity {
            if let Some(evicted) = self.order.pop_front() {
                tracing::debug!("RecordCache: evicting {}", evicted);
                self.entries.remove(&evicted);
            }
        }
        true
    }

    pub fn invalidate(&mut self, id: &str) -> Option<Record> {
        let removed = self.entries.remove(id);
        if removed.is_some() {
            self.order.retain(|cached| cached != id);
        }
        removed
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

impl Default for RecordCache {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecordPayload;
    use serde_json::json;

    fn record(id: &str, etag: Option<&str>) -> Record {
        let payload: RecordPayload = serde_json::from_value(json!({
            "titel": format!("Titel {}", id),
            "art": "KINDLE",
            "_links": { "self": { "href": format!("http://localhost/rest/fluege/{}", id) } }
        }))
        .unwrap();
        Record::from_server(payload, etag)
    }

    #[test]
    fn test_single_slot_is_replaced() {
        let mut cache = RecordCache::default();
        assert!(cache.insert(record("1", Some("\"0\""))));
        assert!(cache.insert(record("2", Some("\"0\""))));

        assert_eq!(cache.len(), 1);
        assert!(cache.get("1").is_none());
        assert!(cache.get("2").is_some());
    }

    #[test]
    fn test_unversioned_records_are_not_cached() {
        let mut cache = RecordCache::new(4);
        assert!(!cache.insert(record("1", None)));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_reinsert_refreshes_entry() {
        let mut cache = RecordCache::new(2);
        cache.insert(record("1", Some("\"0\"")));
        cache.insert(record("2", Some("\"0\"")));
        cache.insert(record("1", Some("\"1\"")));
        cache.insert(record("3", Some("\"0\"")));

        assert_eq!(cache.get("1").and_then(Record::version), Some(1));
        assert!(cache.get("2").is_none());
        assert!(cache.get("3").is_some());
    }

    #[test]
    fn test_invalidate_and_clear() {
        let mut cache = RecordCache::new(3);
        cache.insert(record("1", Some("\"0\"")));
        cache.insert(record("2", Some("\"0\"")));

        assert!(cache.invalidate("1").is_some());
        assert!(cache.invalidate("1").is_none());
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_zero_capacity_disables_cache() {
        let mut cache = RecordCache::new(0);
        assert!(!cache.insert(record("1", Some("\"0\""))));
        assert_eq!(cache.capacity(), 0);
    }
}
