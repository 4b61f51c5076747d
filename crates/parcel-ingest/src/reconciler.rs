//! Root identity reconciliation.
//!
//! A root record starts life keyed by the chain property hash. When the
//! Property leaf carries a parcel identifier, the root moves to that id for
//! good: a later event of the same lineage that yields no parcel identifier
//! is forwarded to the id already chosen. Whatever an earlier event recorded under either id is merged in, and
//! the event's repeatable leaves are committed under the final id.

use parcel_store::{IdSource, RecordStore, RecordStoreExt, RootRecord};
use tracing::{debug, info};

use crate::error::IngestResult;
use crate::materializer::WorkingSet;

/// The result of committing one event's root and repeatables.
#[derive(Clone, Debug, PartialEq)]
pub struct Reconciliation {
    pub root: RootRecord,
    pub rekeyed: bool,
    pub repeatables_written: usize,
}

/// Choose the final root id: a non-blank parcel identifier, else the
/// property hash.
pub fn final_id(property_hash: &str, parcel_identifier: Option<&str>) -> (String, IdSource) {
    match parcel_identifier.map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => (id.to_string(), IdSource::ParcelIdentifier),
        None => (property_hash.to_string(), IdSource::PropertyHash),
    }
}

pub struct Reconciler<'a> {
    store: &'a dyn RecordStore,
}

impl<'a> Reconciler<'a> {
    pub fn new(store: &'a dyn RecordStore) -> Self {
        Self { store }
    }

    /// Re-key `root`, merge prior state, and write everything.
    ///
    /// `root` arrives keyed by its property hash with this event's foreign
    /// keys set. Repeatables are written before the root so a reader never
    /// sees a root whose repeatables are still keyed elsewhere. A root left
    /// behind under the old id is not modified.
    pub fn reconcile(
        &self,
        mut root: RootRecord,
        parcel_identifier: Option<&str>,
        working_set: WorkingSet,
    ) -> IngestResult<Reconciliation> {
        let (id, id_source) = match final_id(&root.property_hash, parcel_identifier) {
            (hash_id, IdSource::PropertyHash) => match self.forwarded_id(&root.property_hash)? {
                Some(canonical) => {
                    debug!(old_id = %hash_id, root_id = %canonical, "following earlier re-key");
                    (canonical, IdSource::ParcelIdentifier)
                }
                None => (hash_id, IdSource::PropertyHash),
            },
            chosen => chosen,
        };
        let rekeyed = id != root.property_hash;
        root.id = id;
        root.id_source = id_source;

        if let Some(prior) = self.store.load::<RootRecord>(&root.id)? {
            debug!(root_id = %root.id, "merging existing root");
            root.absorb(&prior);
        }
        if rekeyed {
            if let Some(provisional) = self.store.load::<RootRecord>(&root.property_hash)? {
                debug!(
                    root_id = %root.id,
                    old_id = %root.property_hash,
                    "merging provisional root"
                );
                root.absorb(&provisional);
            }
            info!(old_id = %root.property_hash, root_id = %root.id, "root re-keyed to parcel identifier");
        }

        let records = working_set.commit(&root.id)?;
        let repeatables_written = records.len();
        self.store.set_batch(records)?;
        self.store.save(&root)?;

        Ok(Reconciliation {
            root,
            rekeyed,
            repeatables_written,
        })
    }

    /// The parcel identifier an earlier event moved this property hash to.
    /// The most recent submission wins if the lineage was keyed more than once.
    fn forwarded_id(&self, property_hash: &str) -> IngestResult<Option<String>> {
        let roots: Vec<RootRecord> = self.store.load_all()?;
        Ok(roots
            .into_iter()
            .filter(|r| {
                r.property_hash == property_hash
                    && r.id_source == IdSource::ParcelIdentifier
                    && r.id != property_hash
            })
            .max_by_key(|r| r.timestamp)
            .map(|r| r.id))
    }
}
