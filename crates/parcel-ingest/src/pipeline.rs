use std::sync::Arc;

use parcel_gate::{EventGate, GateConfig, GateDecision};
use parcel_gateway::{ContentSource, FetchCache, GatewayConfig, GatewayResolver};
use parcel_graph::{dispatch, GraphWalker};
use parcel_store::{IdSource, RecordStore, RootRecord};
use parcel_types::{ContentId, SubmissionEvent};
use tracing::info;

use crate::error::IngestResult;
use crate::materializer::materialize;
use crate::reconciler::Reconciler;
use crate::report::{EventOutcome, MaterializeReport};

/// The per-event ingestion pipeline.
///
/// Gate, CID derivation, metadata dispatch, graph walk, materialization and
/// reconciliation run in that order. The pipeline holds no per-event state,
/// so one instance can serve any number of sequential or concurrent events.
pub struct Pipeline {
    gate: EventGate,
    source: Arc<dyn ContentSource>,
}

impl Pipeline {
    pub fn new(gate: EventGate, source: Arc<dyn ContentSource>) -> Self {
        Self { gate, source }
    }

    /// Build a pipeline over HTTP gateways sharing `cache`.
    pub fn from_config(
        gate: GateConfig,
        gateway: &GatewayConfig,
        cache: Arc<FetchCache>,
    ) -> IngestResult<Self> {
        let resolver = GatewayResolver::from_config(gateway, cache)?;
        Ok(Self::new(
            EventGate::with_default_stages(gate),
            Arc::new(resolver),
        ))
    }

    pub fn gate(&self) -> &EventGate {
        &self.gate
    }

    pub fn source(&self) -> &Arc<dyn ContentSource> {
        &self.source
    }

    /// Process one event against `store`.
    ///
    /// Errors abort the event before the root record is written. Leaves that
    /// were already upserted stay, and a replay overwrites them in place.
    pub async fn process(
        &self,
        event: &SubmissionEvent,
        store: &dyn RecordStore,
    ) -> IngestResult<EventOutcome> {
        if let GateDecision::Rejected { stage, reason } = self.gate.evaluate(event)?.decision {
            return Ok(EventOutcome::Rejected { stage, reason });
        }

        let cid = event.content_id()?;
        let metadata = dispatch(self.source.as_ref(), &cid).await?;
        if !metadata.label.is_county() {
            info!(cid = %cid, label = %metadata.label, "dropping non-County submission");
            return Ok(EventOutcome::Dropped {
                label: metadata.label.to_string(),
            });
        }

        let walk = GraphWalker::new(self.source.as_ref())
            .walk(&metadata.edges)
            .await;
        let materialized = materialize(&walk);

        let singletons_written = materialized.singletons.len();
        store.set_batch(materialized.singletons)?;

        let mut root = provisional_root(event, &cid, metadata.label.as_str());
        for (kind, leaf_id) in materialized.links {
            root.link(kind, leaf_id);
        }

        let reconciled = Reconciler::new(store).reconcile(
            root,
            materialized.parcel_identifier.as_deref(),
            materialized.working_set,
        )?;

        let mut failed_leaves: Vec<ContentId> =
            walk.failed_leaves.iter().map(|f| f.cid.clone()).collect();
        failed_leaves.extend(materialized.undecodable);
        let report = MaterializeReport {
            cid,
            root_id: reconciled.root.id,
            id_source: reconciled.root.id_source,
            rekeyed: reconciled.rekeyed,
            singletons_written,
            repeatables_written: reconciled.repeatables_written,
            failed_relationships: walk
                .failed_relationships
                .iter()
                .map(|f| f.cid.clone())
                .collect(),
            failed_leaves,
        };
        info!(
            cid = %report.cid,
            root_id = %report.root_id,
            singletons = report.singletons_written,
            repeatables = report.repeatables_written,
            failed = report.failed_relationships.len() + report.failed_leaves.len(),
            "event materialized"
        );
        Ok(EventOutcome::Materialized(report))
    }
}

fn provisional_root(event: &SubmissionEvent, cid: &ContentId, label: &str) -> RootRecord {
    RootRecord {
        id: event.property_hash.clone(),
        property_hash: event.property_hash.clone(),
        submitter: event.submitter.clone(),
        data_hash: event.content_hash.clone(),
        cid: cid.to_string(),
        label: label.to_string(),
        id_source: IdSource::PropertyHash,
        data_group_hash: event.data_group_hash.clone(),
        timestamp: event.timestamp,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IngestError;
    use crate::materializer::PROPERTY_ID_FIELD;
    use parcel_gateway::InMemoryContentSource;
    use parcel_store::{EntityType, InMemoryRecordStore, JsonDirRecordStore, RecordStoreExt};
    use parcel_types::EventKind;
    use serde_json::{json, Value};

    const WALLET: &str = "0xA11CE";
    const PROPERTY_HASH: &str = "0xproperty";

    fn cid(n: u8) -> ContentId {
        ContentId::from_digest(&[n; 32]).unwrap()
    }

    fn link(n: u8) -> Value {
        json!({ "/": cid(n).as_str() })
    }

    /// A pinned County submission.
    ///
    /// Root 0xAA. Relationships 100+. Leaves:
    /// 1 Property, 2 Address, 3 Structure, 4 Lot, 5 Tax, 6 Tax, 7 Person.
    struct Fixture {
        source: Arc<InMemoryContentSource>,
        store: InMemoryRecordStore,
    }

    impl Fixture {
        fn county(parcel_identifier: Option<&str>) -> Self {
            let source = Arc::new(InMemoryContentSource::new());
            source.insert(
                root_cid(),
                json!({
                    "label": "County",
                    "relationships": {
                        "property_has_address": link(100),
                        "property_has_structure": link(101),
                        "property_has_lot": link(102),
                        "property_has_tax": [link(103), link(104)],
                        "person_has_property": [link(105)],
                        "property_seed": link(106),
                    }
                }),
            );
            let rel = |n: u8, from: Option<u8>, to: u8| {
                let mut doc = json!({ "to": link(to) });
                if let Some(from) = from {
                    doc["from"] = link(from);
                }
                source.insert(cid(n), doc);
            };
            rel(100, Some(1), 2);
            rel(101, None, 3);
            rel(102, None, 4);
            rel(103, None, 5);
            rel(104, None, 6);
            rel(105, Some(7), 1);

            source.insert(cid(1), json!({ "parcel_identifier": parcel_identifier, "zoning": "R1" }));
            source.insert(cid(2), json!({ "street_name": "Main", "street_suffix_type": "St" }));
            source.insert(cid(3), json!({ "roof_date": 2004 }));
            source.insert(cid(4), json!({ "lot_area_sqft": "5000" }));
            source.insert(cid(5), json!({ "tax_year": 2023 }));
            source.insert(cid(6), json!({ "tax_year": 2024 }));
            source.insert(cid(7), json!({ "first_name": "Ada" }));

            Self {
                source,
                store: InMemoryRecordStore::new(),
            }
        }

        fn pipeline(&self) -> Pipeline {
            self.pipeline_with(GateConfig::allowing([WALLET]))
        }

        fn pipeline_with(&self, gate: GateConfig) -> Pipeline {
            Pipeline::new(EventGate::with_default_stages(gate), self.source.clone())
        }

        async fn process(&self, event: &SubmissionEvent) -> EventOutcome {
            self.pipeline().process(event, &self.store).await.unwrap()
        }

        fn root(&self, id: &str) -> Option<RootRecord> {
            self.store.load::<RootRecord>(id).unwrap()
        }

        fn total_records(&self) -> usize {
            self.store.len().unwrap()
        }
    }

    fn root_cid() -> ContentId {
        cid(0xaa)
    }

    fn event() -> SubmissionEvent {
        SubmissionEvent {
            kind: EventKind::DataSubmitted,
            content_hash: format!("0x{}", "aa".repeat(32)),
            submitter: WALLET.to_lowercase(),
            property_hash: PROPERTY_HASH.into(),
            data_group_hash: Some("0xgroup".into()),
            timestamp: 1_700_000_000,
        }
    }

    fn report(outcome: EventOutcome) -> MaterializeReport {
        match outcome {
            EventOutcome::Materialized(report) => report,
            other => panic!("expected materialized outcome, got {other}"),
        }
    }

    // -----------------------------------------------------------------------
    // 1. Full County submission
    // -----------------------------------------------------------------------
    #[tokio::test]
    async fn county_submission_materializes_every_leaf() {
        let fx = Fixture::county(Some("P-1"));
        let report = report(fx.process(&event()).await);

        assert!(report.is_complete());
        assert_eq!(report.cid, root_cid());
        assert_eq!(report.root_id, "P-1");
        assert_eq!(report.id_source, IdSource::ParcelIdentifier);
        assert!(report.rekeyed);
        assert_eq!(report.singletons_written, 4); // Property, Address, Structure, Lot
        assert_eq!(report.repeatables_written, 3); // Tax x2, Person

        let root = fx.root("P-1").unwrap();
        assert_eq!(root.property_hash, PROPERTY_HASH);
        assert_eq!(root.submitter, WALLET.to_lowercase());
        assert_eq!(root.cid, root_cid().as_str());
        assert_eq!(root.label, "County");
        assert_eq!(root.data_group_hash.as_deref(), Some("0xgroup"));
        assert_eq!(root.property_id.as_deref(), Some(cid(1).as_str()));
        assert_eq!(root.address_id.as_deref(), Some(cid(2).as_str()));
        assert_eq!(root.structure_id.as_deref(), Some(cid(3).as_str()));
        assert_eq!(root.lot_id.as_deref(), Some(cid(4).as_str()));
        assert!(root.utility_id.is_none());

        let address = fx.store.get(EntityType::Address, cid(2).as_str()).unwrap().unwrap();
        assert_eq!(address.field_str("street_suffix"), Some("St"));
        for (kind, n) in [(EntityType::Tax, 5), (EntityType::Tax, 6), (EntityType::Person, 7)] {
            let record = fx.store.get(kind, cid(n).as_str()).unwrap().unwrap();
            assert_eq!(record.field_str(PROPERTY_ID_FIELD), Some("P-1"));
        }
        // The seed edge is never fetched.
        assert_eq!(fx.source.requests(&cid(106)), 0);
    }

    // -----------------------------------------------------------------------
    // 2. Idempotent replay
    // -----------------------------------------------------------------------
    #[tokio::test]
    async fn replay_converges_to_same_record_set() {
        let fx = Fixture::county(Some("P-1"));
        fx.process(&event()).await;
        let first = fx.store.snapshot().unwrap();

        fx.process(&event()).await;
        let second = fx.store.snapshot().unwrap();
        assert_eq!(first, second);
    }

    // -----------------------------------------------------------------------
    // 3. Re-keying convergence
    // -----------------------------------------------------------------------
    #[tokio::test]
    async fn later_parcel_identifier_rekeys_root_and_repeatables() {
        let fx = Fixture::county(None);
        let first = report(fx.process(&event()).await);
        assert_eq!(first.root_id, PROPERTY_HASH);
        assert!(!first.rekeyed);
        let tax = fx.store.get(EntityType::Tax, cid(5).as_str()).unwrap().unwrap();
        assert_eq!(tax.field_str(PROPERTY_ID_FIELD), Some(PROPERTY_HASH));

        // The Property document is re-pinned with a parcel id and the Lot
        // goes missing; the lot key from the first event must survive.
        fx.source.insert(cid(1), json!({ "parcel_identifier": "P-1" }));
        fx.source.remove(&cid(4));
        let second = report(fx.process(&event()).await);
        assert_eq!(second.root_id, "P-1");
        assert!(second.rekeyed);

        let root = fx.root("P-1").unwrap();
        assert_eq!(root.lot_id.as_deref(), Some(cid(4).as_str()));
        for n in [5, 6] {
            let record = fx.store.get(EntityType::Tax, cid(n).as_str()).unwrap().unwrap();
            assert_eq!(record.field_str(PROPERTY_ID_FIELD), Some("P-1"));
        }
        assert_eq!(fx.store.count(EntityType::Tax).unwrap(), 2);

        // The provisional root is left as it was.
        let stale = fx.root(PROPERTY_HASH).unwrap();
        assert_eq!(stale.id_source, IdSource::PropertyHash);
        assert_eq!(fx.store.count(EntityType::RootRecord).unwrap(), 2);
    }

    #[tokio::test]
    async fn rekey_survives_later_event_missing_property() {
        let fx = Fixture::county(Some("P-1"));
        let first = report(fx.process(&event()).await);
        assert_eq!(first.root_id, "P-1");

        // The address edge is the only path to the Property leaf.
        fx.source.remove(&cid(100));
        let mut later = event();
        later.timestamp += 60;
        let second = report(fx.process(&later).await);

        assert_eq!(second.failed_relationships, vec![cid(100)]);
        assert_eq!(second.root_id, "P-1");
        assert_eq!(second.id_source, IdSource::ParcelIdentifier);

        let root = fx.root("P-1").unwrap();
        assert_eq!(root.timestamp, later.timestamp);
        assert_eq!(root.property_id.as_deref(), Some(cid(1).as_str()));
        for n in [5, 6] {
            let record = fx.store.get(EntityType::Tax, cid(n).as_str()).unwrap().unwrap();
            assert_eq!(record.field_str(PROPERTY_ID_FIELD), Some("P-1"));
        }
        assert!(fx.root(PROPERTY_HASH).is_none());
        assert_eq!(fx.store.count(EntityType::RootRecord).unwrap(), 1);
    }

    // -----------------------------------------------------------------------
    // 4. Partial-branch tolerance
    // -----------------------------------------------------------------------
    #[tokio::test]
    async fn failed_lot_leaves_other_branches_intact() {
        let fx = Fixture::county(Some("P-1"));
        fx.source.remove(&cid(4));

        let report = report(fx.process(&event()).await);
        assert_eq!(report.failed_leaves, vec![cid(4)]);
        assert!(report.failed_relationships.is_empty());
        assert_eq!(report.singletons_written, 3);

        let root = fx.root("P-1").unwrap();
        assert!(root.lot_id.is_none());
        assert!(root.structure_id.is_some());
        assert!(root.address_id.is_some());
        assert!(fx.store.get(EntityType::Lot, cid(4).as_str()).unwrap().is_none());

        assert_eq!(report.repeatables_written, 3);
        assert_eq!(fx.store.count(EntityType::Tax).unwrap(), 2);
        for n in [5, 6] {
            let tax = fx.store.get(EntityType::Tax, cid(n).as_str()).unwrap().unwrap();
            assert_eq!(tax.field_str(PROPERTY_ID_FIELD), Some("P-1"));
        }
    }

    #[tokio::test]
    async fn failed_relationship_is_reported() {
        let fx = Fixture::county(Some("P-1"));
        fx.source.remove(&cid(101));

        let report = report(fx.process(&event()).await);
        assert_eq!(report.failed_relationships, vec![cid(101)]);
        assert!(fx.root("P-1").unwrap().structure_id.is_none());
    }

    #[tokio::test]
    async fn malformed_unread_from_keeps_structure() {
        let fx = Fixture::county(Some("P-1"));
        fx.source
            .insert(cid(101), json!({ "from": { "/": "" }, "to": link(3) }));

        let report = report(fx.process(&event()).await);
        assert!(report.is_complete());
        assert_eq!(report.singletons_written, 4);
        assert_eq!(
            fx.root("P-1").unwrap().structure_id.as_deref(),
            Some(cid(3).as_str())
        );
    }

    #[tokio::test]
    async fn address_with_both_suffix_keys_is_materialized() {
        let fx = Fixture::county(Some("P-1"));
        fx.source.insert(
            cid(2),
            json!({ "street_name": "Main", "street_suffix_type": "Street", "street_suffix": "St" }),
        );

        let report = report(fx.process(&event()).await);
        assert!(report.failed_leaves.is_empty());
        let address = fx.store.get(EntityType::Address, cid(2).as_str()).unwrap().unwrap();
        assert_eq!(address.field_str("street_suffix"), Some("St"));
    }

    // -----------------------------------------------------------------------
    // 5. Allow-list enforcement
    // -----------------------------------------------------------------------
    #[tokio::test]
    async fn unlisted_submitter_writes_nothing() {
        let fx = Fixture::county(Some("P-1"));
        let mut e = event();
        e.submitter = "0xmallory".into();

        let outcome = fx.process(&e).await;
        assert_eq!(
            outcome,
            EventOutcome::Rejected {
                stage: "allow_list".into(),
                reason: "submitter 0xmallory is not allow-listed".into(),
            }
        );
        assert_eq!(fx.total_records(), 0);
        assert_eq!(fx.source.total_requests(), 0);
    }

    #[tokio::test]
    async fn empty_allow_list_writes_nothing() {
        let fx = Fixture::county(Some("P-1"));
        let outcome = fx
            .pipeline_with(GateConfig::default())
            .process(&event(), &fx.store)
            .await
            .unwrap();
        assert!(matches!(outcome, EventOutcome::Rejected { .. }));
        assert_eq!(fx.total_records(), 0);
    }

    // -----------------------------------------------------------------------
    // 6. Sparse edge map
    // -----------------------------------------------------------------------
    #[tokio::test]
    async fn address_only_submission() {
        let fx = Fixture::county(Some("P-7"));
        fx.source.insert(
            root_cid(),
            json!({ "label": "County", "relationships": { "property_has_address": link(100) } }),
        );

        let report = report(fx.process(&event()).await);
        assert_eq!(report.root_id, "P-7");
        assert_eq!(report.singletons_written, 2);
        assert_eq!(report.repeatables_written, 0);

        let root = fx.root("P-7").unwrap();
        assert_eq!(root.property_id.as_deref(), Some(cid(1).as_str()));
        assert_eq!(root.address_id.as_deref(), Some(cid(2).as_str()));
        assert!(root.structure_id.is_none());
        assert_eq!(fx.total_records(), 3);
    }

    #[tokio::test]
    async fn county_without_relationships_writes_root_only() {
        let fx = Fixture::county(None);
        fx.source.insert(root_cid(), json!({ "label": "County" }));

        let report = report(fx.process(&event()).await);
        assert_eq!(report.root_id, PROPERTY_HASH);
        assert_eq!(fx.total_records(), 1);
    }

    // -----------------------------------------------------------------------
    // 7. Fatal inputs write nothing
    // -----------------------------------------------------------------------
    #[tokio::test]
    async fn malformed_content_hash_is_fatal() {
        let fx = Fixture::county(Some("P-1"));
        let mut e = event();
        e.content_hash = "0xnot-hex".into();

        let err = fx.pipeline().process(&e, &fx.store).await.unwrap_err();
        assert!(matches!(err, IngestError::MalformedInput(_)));

        e.content_hash = "aa".repeat(31);
        let err = fx.pipeline().process(&e, &fx.store).await.unwrap_err();
        assert!(matches!(err, IngestError::MalformedInput(_)));
        assert_eq!(fx.total_records(), 0);
    }

    #[tokio::test]
    async fn blank_content_hash_is_malformed_input() {
        let fx = Fixture::county(Some("P-1"));
        for blank in ["", "   "] {
            let mut e = event();
            e.content_hash = blank.into();
            let err = fx.pipeline().process(&e, &fx.store).await.unwrap_err();
            assert!(matches!(err, IngestError::MalformedInput(_)), "{blank:?}: {err}");
        }
        assert_eq!(fx.total_records(), 0);
        assert_eq!(fx.source.total_requests(), 0);
    }

    #[tokio::test]
    async fn metadata_exhaustion_is_fatal() {
        let fx = Fixture::county(Some("P-1"));
        fx.source.remove(&root_cid());

        let err = fx.pipeline().process(&event(), &fx.store).await.unwrap_err();
        assert!(matches!(err, IngestError::MetadataUnavailable(_)));
        assert_eq!(fx.total_records(), 0);
    }

    #[tokio::test]
    async fn metadata_without_label_is_fatal() {
        let fx = Fixture::county(Some("P-1"));
        fx.source.insert(root_cid(), json!({ "relationships": {} }));

        let err = fx.pipeline().process(&event(), &fx.store).await.unwrap_err();
        assert!(matches!(err, IngestError::MetadataUnavailable(_)));
        assert_eq!(fx.total_records(), 0);
    }

    // -----------------------------------------------------------------------
    // 8. Non-County labels are dropped
    // -----------------------------------------------------------------------
    #[tokio::test]
    async fn seed_submission_is_dropped() {
        let fx = Fixture::county(Some("P-1"));
        fx.source.insert(
            root_cid(),
            json!({ "label": "Seed", "relationships": { "property_seed": link(106) } }),
        );

        let outcome = fx.process(&event()).await;
        assert_eq!(outcome, EventOutcome::Dropped { label: "Seed".into() });
        assert_eq!(fx.total_records(), 0);
        assert_eq!(fx.source.total_requests(), 1);
    }

    // -----------------------------------------------------------------------
    // 9. Heartbeats are processed like submissions
    // -----------------------------------------------------------------------
    #[tokio::test]
    async fn heartbeat_event_materializes() {
        let fx = Fixture::county(Some("P-1"));
        let mut e = event();
        e.kind = EventKind::DataGroupHeartBeat;
        assert!(fx.process(&e).await.is_materialized());
    }

    // -----------------------------------------------------------------------
    // 10. Durable store
    // -----------------------------------------------------------------------
    #[tokio::test]
    async fn json_dir_store_round_trip() {
        let fx = Fixture::county(Some("P-1"));
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirRecordStore::open(dir.path()).unwrap();

        let outcome = fx.pipeline().process(&event(), &store).await.unwrap();
        assert!(outcome.is_materialized());

        let reopened = JsonDirRecordStore::open(dir.path()).unwrap();
        let root = reopened.load::<RootRecord>("P-1").unwrap().unwrap();
        assert_eq!(root.lot_id.as_deref(), Some(cid(4).as_str()));
        assert_eq!(reopened.count(EntityType::Tax).unwrap(), 2);
    }
}
