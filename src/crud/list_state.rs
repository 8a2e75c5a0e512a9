//! Local copy of one entity collection, kept in step with server responses

use crate::models::{Identified, RecordId};

/// Ordered records as last reported by the server
#[derive(Debug, Clone, PartialEq)]
pub struct EntityListState<R> {
    records: Vec<R>,
}

impl<R> Default for EntityListState<R> {
    fn default() -> Self {
        Self { records: Vec::new() }
    }
}

impl<R: Identified> EntityListState<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace everything with a fresh `list()` result
    pub fn replace_all(&mut self, records: Vec<R>) {
        self.records = records;
    }

    /// Add a created record at the end
    pub fn append(&mut self, record: R) {
        self.records.push(record);
    }

    /// Swap in the server's version of record `id`. Returns false if it is not loaded.
    pub fn replace(&mut self, id: RecordId, record: R) -> bool {
        match self.records.iter_mut().find(|r| r.id() == id) {
            Some(slot) => {
                *slot = record;
                true
            }
            None => false,
        }
    }

    /// Drop record `id`, keeping the order of the rest
    pub fn remove(&mut self, id: RecordId) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id() != id);
        self.records.len() != before
    }

    pub fn get(&self, id: RecordId) -> Option<&R> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn records(&self) -> &[R] {
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

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: RecordId,
        name: &'static str,
    }

    impl Identified for Row {
        fn id(&self) -> RecordId {
            self.id
        }
    }

    fn seeded() -> EntityListState<Row> {
        let mut state = EntityListState::new();
        state.replace_all(vec![
            Row { id: 1, name: "a" },
            Row { id: 2, name: "b" },
            Row { id: 3, name: "c" },
        ]);
        state
    }

    #[test]
    fn test_append_adds_once_at_end() {
        let mut state = seeded();
        state.append(Row { id: 9, name: "new" });
        assert_eq!(state.len(), 4);
        assert_eq!(state.records()[3], Row { id: 9, name: "new" });
        assert_eq!(state.records().iter().filter(|r| r.id == 9).count(), 1);
        assert_eq!(state.records()[..3], seeded().records()[..]);
    }

    #[test]
    fn test_replace_is_wholesale_and_local() {
        let mut state = seeded();
        assert!(state.replace(2, Row { id: 2, name: "B" }));
        assert_eq!(state.get(2).map(|r| r.name), Some("B"));
        assert_eq!(state.get(1), Some(&Row { id: 1, name: "a" }));
        assert_eq!(state.get(3), Some(&Row { id: 3, name: "c" }));
        assert!(!state.replace(42, Row { id: 42, name: "x" }));
        assert_eq!(state.len(), 3);
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut state = seeded();
        assert!(state.remove(2));
        let ids: Vec<_> = state.records().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(!state.remove(2));
    }
}
