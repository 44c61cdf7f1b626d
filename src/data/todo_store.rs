use std::collections::HashSet;
use tracing::{debug, warn};

use crate::data::datatable::Todo;

/// The full in-memory record set. Ids are unique at all times.
#[derive(Debug, Clone, Default)]
pub struct TodoStore {
    records: Vec<Todo>,
}

impl TodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from delivered records; see [`TodoStore::replace_all`]
    pub fn from_records(records: Vec<Todo>) -> Self {
        let mut store = Self::new();
        store.replace_all(records);
        store
    }

    /// Replace the entire set. Records repeating an id already seen are dropped.
    pub fn replace_all(&mut self, records: Vec<Todo>) {
        let delivered = records.len();
        let mut seen = HashSet::with_capacity(delivered);
        self.records = records
            .into_iter()
            .filter(|record| seen.insert(record.id))
            .collect();

        if self.records.len() != delivered {
            warn!(target: "store",
                "Dropped {} records with duplicate ids",
                delivered - self.records.len()
            );
        }
        debug!(target: "store", "Loaded {} records", self.records.len());
    }

    /// Overwrite the record with the same id. Returns false when no record matches.
    pub fn replace(&mut self, record: Todo) -> bool {
        match self.records.iter_mut().find(|existing| existing.id == record.id) {
            Some(existing) => {
                *existing = record;
                true
            }
            None => false,
        }
    }

    /// Remove the record with `id`. Returns false when it was not present.
    pub fn delete(&mut self, id: i64) -> bool {
        let before = self.records.len();
        self.records.retain(|record| record.id != id);
        self.records.len() != before
    }

    pub fn get(&self, id: i64) -> Option<&Todo> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn records(&self) -> &[Todo] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_all_keeps_first_of_duplicate_ids() {
        let store = TodoStore::from_records(vec![
            Todo::new(1, 1, "first"),
            Todo::new(1, 2, "second"),
            Todo::new(2, 1, "duplicate"),
        ]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(1).map(|t| t.title.as_str()), Some("first"));
    }

    #[test]
    fn test_replace_matches_by_id_only() {
        let mut store = TodoStore::from_records(vec![Todo::new(1, 1, "a"), Todo::new(1, 2, "b")]);
        assert!(store.replace(Todo::new(1, 2, "bee")));
        assert!(!store.replace(Todo::new(1, 99, "missing")));
        assert_eq!(store.records()[1].title, "bee");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_delete_reports_presence() {
        let mut store = TodoStore::from_records(vec![Todo::new(1, 1, "a")]);
        assert!(store.delete(1));
        assert!(!store.delete(1));
        assert!(store.is_empty());
    }
}
