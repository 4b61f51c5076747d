use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::entity::EntityType;
use crate::error::{StoreError, StoreResult};
use crate::record::StoredRecord;
use crate::traits::RecordStore;

type Key = (EntityType, String);

/// In-memory, map-based record store.
///
/// Intended for tests and embedding. Records are held behind a `RwLock` for
/// safe concurrent access and cloned on read/write.
pub struct InMemoryRecordStore {
    records: RwLock<BTreeMap<Key, StoredRecord>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
        }
    }

    /// Total number of records across all entity types.
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self
            .records
            .read()
            .map_err(|_| StoreError::LockPoisoned)?
            .len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Every record, ordered by entity type then id.
    pub fn snapshot(&self) -> StoreResult<Vec<StoredRecord>> {
        let map = self.records.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(map.values().cloned().collect())
    }
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for InMemoryRecordStore {
    fn get(&self, entity: EntityType, id: &str) -> StoreResult<Option<StoredRecord>> {
        let map = self.records.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(map.get(&(entity, id.to_string())).cloned())
    }

    fn set(&self, record: StoredRecord) -> StoreResult<()> {
        if record.id.is_empty() {
            return Err(StoreError::EmptyId(record.entity));
        }
        let mut map = self.records.write().map_err(|_| StoreError::LockPoisoned)?;
        map.insert((record.entity, record.id.clone()), record);
        Ok(())
    }

    fn list(&self, entity: EntityType) -> StoreResult<Vec<StoredRecord>> {
        let map = self.records.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(map
            .range((entity, String::new())..)
            .take_while(|((e, _), _)| *e == entity)
            .map(|(_, record)| record.clone())
            .collect())
    }
}

impl std::fmt::Debug for InMemoryRecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryRecordStore")
            .field("record_count", &self.len().unwrap_or(0))
            .finish()
    }
}
