use crate::entity::EntityType;
use crate::error::StoreResult;
use crate::record::{Entity, StoredRecord};

/// Record store consumed by the ingest pipeline.
///
/// All implementations must satisfy these invariants:
/// - `set` is create-or-replace keyed by `(entity, id)`; last write wins.
/// - Nothing is deleted through this interface.
/// - There is no uniqueness constraint beyond the id and no cross-record
///   transaction.
pub trait RecordStore: Send + Sync {
    /// Read a record. Returns `Ok(None)` if it does not exist.
    fn get(&self, entity: EntityType, id: &str) -> StoreResult<Option<StoredRecord>>;

    /// Upsert a record.
    fn set(&self, record: StoredRecord) -> StoreResult<()>;

    /// All records of one entity type, sorted by id.
    fn list(&self, entity: EntityType) -> StoreResult<Vec<StoredRecord>>;

    /// Upsert several records.
    ///
    /// Default implementation calls `set()` for each record. Backends may
    /// override to batch I/O.
    fn set_batch(&self, records: Vec<StoredRecord>) -> StoreResult<()> {
        records.into_iter().try_for_each(|r| self.set(r))
    }

    /// Number of records of one entity type.
    fn count(&self, entity: EntityType) -> StoreResult<usize> {
        Ok(self.list(entity)?.len())
    }
}

/// Typed convenience layer over any [`RecordStore`].
pub trait RecordStoreExt {
    fn load<E: Entity>(&self, id: &str) -> StoreResult<Option<E>>;
    fn save<E: Entity>(&self, entity: &E) -> StoreResult<()>;
    fn load_all<E: Entity>(&self) -> StoreResult<Vec<E>>;
}

impl<S: RecordStore + ?Sized> RecordStoreExt for S {
    fn load<E: Entity>(&self, id: &str) -> StoreResult<Option<E>> {
        self.get(E::ENTITY, id)?
            .map(|record| E::from_record(&record))
            .transpose()
    }

    fn save<E: Entity>(&self, entity: &E) -> StoreResult<()> {
        self.set(entity.to_record()?)
    }

    fn load_all<E: Entity>(&self) -> StoreResult<Vec<E>> {
        self.list(E::ENTITY)?.iter().map(E::from_record).collect()
    }
}
