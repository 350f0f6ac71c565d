//! In-memory view of the publish queue.
//!
//! A request-scoped aggregation of pending change records, keyed by entity
//! type. Deliberately a dedicated wrapper type rather than a map alias: the
//! contract is exactly the four operations below, nothing container-shaped
//! leaks out. Not durable; rebuilt from the persisted queue whenever a
//! consistent snapshot is needed.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::domain::entities::ChangeRecord;

/// Map from entity type to the set of changed entity ids.
#[derive(Debug, Default)]
pub struct CollectionChanges {
    changes: HashMap<String, HashSet<String>>,
}

impl CollectionChanges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all state with a replay of persisted records.
    ///
    /// Records without an entity id (the value was cleared concurrently)
    /// are skipped silently; they carry nothing to invalidate.
    pub fn initialize<'a>(&mut self, records: impl IntoIterator<Item = &'a ChangeRecord>) {
        self.changes.clear();
        for record in records {
            if let Some(entity_id) = &record.entity_id {
                self.changes
                    .entry(record.entity_type.clone())
                    .or_default()
                    .insert(entity_id.clone());
            }
        }
    }

    /// Idempotent add; creates the per-type set on first use.
    pub fn add_item(&mut self, entity_type: impl Into<String>, entity_id: impl Into<String>) {
        self.changes
            .entry(entity_type.into())
            .or_default()
            .insert(entity_id.into());
    }

    pub fn get(&self, entity_type: &str) -> Option<&HashSet<String>> {
        self.changes.get(entity_type)
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Plain mapping for API responses: entity type to its changed ids.
    ///
    /// Types with no changes are omitted entirely; id order within a type
    /// is not significant (sorted here for stable output).
    pub fn serialize(&self) -> BTreeMap<String, Vec<String>> {
        self.changes
            .iter()
            .filter(|(_, ids)| !ids.is_empty())
            .map(|(entity_type, ids)| {
                let mut ids: Vec<String> = ids.iter().cloned().collect();
                ids.sort();
                (entity_type.clone(), ids)
            })
            .collect()
    }
}
