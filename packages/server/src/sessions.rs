//! In-memory store of uploaded datasets.
//!
//! Each upload gets a random session id. The store holds at most
//! `capacity` datasets; inserting beyond that evicts the oldest upload.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

use biodiv_map_occurrence::OccurrenceDataset;
use uuid::Uuid;

/// Uploaded datasets keyed by session id, oldest first.
#[derive(Debug)]
pub struct SessionStore {
    capacity: usize,
    order: VecDeque<Uuid>,
    datasets: BTreeMap<Uuid, Arc<OccurrenceDataset>>,
}

impl SessionStore {
    /// Creates an empty store. A capacity of zero is treated as one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            order: VecDeque::new(),
            datasets: BTreeMap::new(),
        }
    }

    /// Stores a dataset under a fresh session id, evicting the oldest
    /// sessions when full.
    pub fn insert(&mut self, dataset: OccurrenceDataset) -> Uuid {
        while self.order.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.datasets.remove(&oldest);
                log::info!("Evicted session {oldest}");
            }
        }

        let id = Uuid::new_v4();
        self.order.push_back(id);
        self.datasets.insert(id, Arc::new(dataset));
        id
    }

    /// Returns the dataset for `id`, if still stored.
    #[must_use]
    pub fn get(&self, id: &Uuid) -> Option<Arc<OccurrenceDataset>> {
        self.datasets.get(id).cloned()
    }

    /// Drops the dataset for `id`. Returns whether it was present.
    pub fn remove(&mut self, id: &Uuid) -> bool {
        if self.datasets.remove(id).is_none() {
            return false;
        }
        self.order.retain(|s| s != id);
        true
    }

    /// Number of stored datasets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_and_returns_datasets() {
        let mut store = SessionStore::new(2);
        let id = store.insert(OccurrenceDataset::default());
        assert!(store.get(&id).is_some());
        assert!(store.get(&Uuid::nil()).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn evicts_oldest_when_full() {
        let mut store = SessionStore::new(2);
        let first = store.insert(OccurrenceDataset::default());
        let second = store.insert(OccurrenceDataset::default());
        let third = store.insert(OccurrenceDataset::default());

        assert!(store.get(&first).is_none());
        assert!(store.get(&second).is_some());
        assert!(store.get(&third).is_some());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn removal_frees_a_slot() {
        let mut store = SessionStore::new(2);
        let first = store.insert(OccurrenceDataset::default());
        let second = store.insert(OccurrenceDataset::default());

        assert!(store.remove(&first));
        assert!(!store.remove(&first));

        let third = store.insert(OccurrenceDataset::default());
        assert!(store.get(&second).is_some());
        assert!(store.get(&third).is_some());
    }

    #[test]
    fn zero_capacity_keeps_latest() {
        let mut store = SessionStore::new(0);
        store.insert(OccurrenceDataset::default());
        let latest = store.insert(OccurrenceDataset::default());
        assert_eq!(store.len(), 1);
        assert!(store.get(&latest).is_some());
        assert!(!store.is_empty());
    }
}
