//! Leaf payload to typed record conversion.
//!
//! Singleton leaves are returned ready to upsert, together with the root
//! foreign key each one fills. Repeatable leaves are staged in a
//! [`WorkingSet`] because their `property_id` is only known once the root
//! identity has been reconciled.

use parcel_graph::{ResolvedLeaf, WalkReport};
use parcel_store::{
    AddressData, CompanyData, DeedData, Entity, EntityType, FileData, FloodStormData,
    IpfsFactSheetData, LayoutData, Leaf, LeafData, LotData, PersonData, PropertyData,
    SalesHistoryData, StoreError, StoreResult, StoredRecord, StructureData, TaxData, UtilityData,
};
use parcel_types::ContentId;
use serde_json::Value;
use tracing::{debug, warn};

/// Body key that links a repeatable leaf to its root record.
pub const PROPERTY_ID_FIELD: &str = "property_id";

/// Decode a leaf payload into the stored form of its entity type.
///
/// Returns `Ok(None)` for entity types that are not leaves.
pub fn leaf_record(
    kind: EntityType,
    id: &str,
    payload: &Value,
) -> StoreResult<Option<StoredRecord>> {
    let record = match kind {
        EntityType::RootRecord => return Ok(None),
        EntityType::Structure => build::<StructureData>(id, payload)?,
        EntityType::Address => build::<AddressData>(id, payload)?,
        EntityType::Property => build::<PropertyData>(id, payload)?,
        EntityType::Lot => build::<LotData>(id, payload)?,
        EntityType::Utility => build::<UtilityData>(id, payload)?,
        EntityType::FloodStormInformation => build::<FloodStormData>(id, payload)?,
        EntityType::IpfsFactSheet => build::<IpfsFactSheetData>(id, payload)?,
        EntityType::SalesHistory => build::<SalesHistoryData>(id, payload)?,
        EntityType::Tax => build::<TaxData>(id, payload)?,
        EntityType::Person => build::<PersonData>(id, payload)?,
        EntityType::Company => build::<CompanyData>(id, payload)?,
        EntityType::Layout => build::<LayoutData>(id, payload)?,
        EntityType::File => build::<FileData>(id, payload)?,
        EntityType::Deed => build::<DeedData>(id, payload)?,
    };
    Ok(Some(record))
}

fn build<T: LeafData>(id: &str, payload: &Value) -> StoreResult<StoredRecord> {
    Leaf::<T>::from_payload(id, payload)?.to_record()
}

/// Read a non-blank `parcel_identifier` from a Property payload.
pub fn parcel_identifier(payload: &Value) -> Option<String> {
    let leaf = Leaf::<PropertyData>::from_payload("", payload).ok()?;
    leaf.data
        .parcel_identifier
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
}

// ---------------------------------------------------------------------------
// WorkingSet
// ---------------------------------------------------------------------------

/// Repeatable leaves of one event, awaiting their final `property_id`.
#[derive(Clone, Debug, Default)]
pub struct WorkingSet {
    staged: Vec<StoredRecord>,
}

impl WorkingSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&mut self, record: StoredRecord) {
        self.staged.push(record);
    }

    pub fn len(&self) -> usize {
        self.staged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    pub fn staged(&self) -> &[StoredRecord] {
        &self.staged
    }

    /// Stamp every staged record with the final root id.
    pub fn commit(self, property_id: &str) -> StoreResult<Vec<StoredRecord>> {
        self.staged
            .into_iter()
            .map(|mut record| {
                let body = record.body.as_object_mut().ok_or_else(|| {
                    StoreError::Serialization(format!(
                        "{} {} body is not an object",
                        record.entity, record.id
                    ))
                })?;
                body.insert(
                    PROPERTY_ID_FIELD.to_string(),
                    Value::String(property_id.to_string()),
                );
                Ok(record)
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Materialization
// ---------------------------------------------------------------------------

/// Typed output of one walk.
#[derive(Debug, Default)]
pub struct Materialization {
    /// Singleton leaf records, ready to upsert.
    pub singletons: Vec<StoredRecord>,
    /// Root foreign keys, first resolved leaf of each singleton kind.
    pub links: Vec<(EntityType, String)>,
    /// Repeatable leaf records awaiting the final root id.
    pub working_set: WorkingSet,
    /// Parcel identifier from the first Property leaf that carries one.
    pub parcel_identifier: Option<String>,
    /// Leaves whose payload could not be decoded.
    pub undecodable: Vec<ContentId>,
}

/// Convert every resolved leaf of a walk.
pub fn materialize(report: &WalkReport) -> Materialization {
    let mut out = Materialization::default();
    for leaf in &report.leaves {
        materialize_leaf(leaf, &mut out);
    }
    debug!(
        singletons = out.singletons.len(),
        repeatables = out.working_set.len(),
        "leaves materialized"
    );
    out
}

fn materialize_leaf(leaf: &ResolvedLeaf, out: &mut Materialization) {
    let record = match leaf_record(leaf.kind, leaf.cid.as_str(), &leaf.payload) {
        Ok(Some(record)) => record,
        Ok(None) => return,
        Err(e) => {
            warn!(kind = %leaf.kind, cid = %leaf.cid, error = %e, "leaf payload undecodable");
            out.undecodable.push(leaf.cid.clone());
            return;
        }
    };

    if leaf.kind.is_repeatable() {
        out.working_set.stage(record);
        return;
    }

    if leaf.kind == EntityType::Property && out.parcel_identifier.is_none() {
        out.parcel_identifier = parcel_identifier(&leaf.payload);
    }
    if !out.links.iter().any(|(kind, _)| *kind == leaf.kind) {
        out.links.push((leaf.kind, leaf.cid.to_string()));
    }
    out.singletons.push(record);
}

#[cfg(test)]
mod tests {
    use super::*;
    use parcel_graph::EdgeType;
    use serde_json::json;
    use std::sync::Arc;

    fn cid(n: u8) -> ContentId {
        ContentId::from_digest(&[n; 32]).unwrap()
    }

    fn leaf(kind: EntityType, n: u8, payload: Value) -> ResolvedLeaf {
        ResolvedLeaf {
            kind,
            cid: cid(n),
            edge: EdgeType::PropertyHasAddress,
            payload: Arc::new(payload),
        }
    }

    #[test]
    fn every_leaf_kind_decodes() {
        for kind in EntityType::ALL {
            let record = leaf_record(kind, "bafy", &json!({})).unwrap();
            match kind {
                EntityType::RootRecord => assert!(record.is_none()),
                _ => {
                    let record = record.unwrap();
                    assert_eq!(record.entity, kind);
                    assert_eq!(record.id, "bafy");
                }
            }
        }
    }

    #[test]
    fn non_object_payload_is_an_error() {
        assert!(leaf_record(EntityType::Lot, "bafy", &json!([1, 2])).is_err());
    }

    #[test]
    fn parcel_identifier_is_trimmed_and_non_blank() {
        assert_eq!(
            parcel_identifier(&json!({ "parcel_identifier": " 12-34 " })),
            Some("12-34".into())
        );
        assert_eq!(parcel_identifier(&json!({ "parcel_identifier": "  " })), None);
        assert_eq!(parcel_identifier(&json!({ "parcel_identifier": null })), None);
        assert_eq!(
            parcel_identifier(&json!({ "parcel_identifier": 1234 })),
            Some("1234".into())
        );
        assert_eq!(parcel_identifier(&json!({})), None);
    }

    #[test]
    fn splits_singletons_from_repeatables() {
        let report = WalkReport {
            leaves: vec![
                leaf(EntityType::Property, 1, json!({ "parcel_identifier": "P-1" })),
                leaf(EntityType::Address, 2, json!({ "street_suffix_type": "Ave" })),
                leaf(EntityType::Tax, 3, json!({ "tax_year": "2024" })),
                leaf(EntityType::Layout, 4, json!({})),
            ],
            ..Default::default()
        };
        let m = materialize(&report);
        assert_eq!(m.singletons.len(), 2);
        assert_eq!(m.working_set.len(), 2);
        assert_eq!(m.parcel_identifier.as_deref(), Some("P-1"));
        assert_eq!(
            m.links,
            vec![
                (EntityType::Property, cid(1).to_string()),
                (EntityType::Address, cid(2).to_string()),
            ]
        );
        assert_eq!(m.singletons[1].field_str("street_suffix"), Some("Ave"));
        assert!(m.working_set.staged()[0].body.get(PROPERTY_ID_FIELD).is_none());
    }

    #[test]
    fn first_singleton_of_a_kind_owns_the_link() {
        let report = WalkReport {
            leaves: vec![
                leaf(EntityType::IpfsFactSheet, 1, json!({})),
                leaf(EntityType::IpfsFactSheet, 2, json!({})),
            ],
            ..Default::default()
        };
        let m = materialize(&report);
        assert_eq!(m.singletons.len(), 2, "both leaves are still written");
        assert_eq!(m.links, vec![(EntityType::IpfsFactSheet, cid(1).to_string())]);
    }

    #[test]
    fn undecodable_leaf_is_reported() {
        let report = WalkReport {
            leaves: vec![leaf(EntityType::Lot, 1, json!("not an object"))],
            ..Default::default()
        };
        let m = materialize(&report);
        assert!(m.singletons.is_empty());
        assert_eq!(m.undecodable, vec![cid(1)]);
    }

    #[test]
    fn commit_stamps_property_id() {
        let mut ws = WorkingSet::new();
        ws.stage(leaf_record(EntityType::Tax, "t1", &json!({})).unwrap().unwrap());
        ws.stage(leaf_record(EntityType::Deed, "d1", &json!({})).unwrap().unwrap());

        let records = ws.commit("P-9").unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.field_str(PROPERTY_ID_FIELD) == Some("P-9")));
    }

    #[test]
    fn commit_rejects_non_object_body() {
        let mut ws = WorkingSet::new();
        ws.stage(StoredRecord::new(EntityType::Tax, "t1", json!(null)));
        assert!(ws.commit("P-9").is_err());
    }
}
