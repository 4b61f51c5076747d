//! Root metadata dispatch.
//!
//! The root document of a submission names its data-group `label` and an
//! optional `relationships` map from edge-type name to one link or an array
//! of links. Only `County` documents are walked further.

use std::fmt;

use parcel_gateway::{ContentSource, RetryBudget};
use parcel_types::{ContentId, Link};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{GraphError, GraphResult};
use crate::registry::{Arity, EdgeType};
use crate::shapes::metadata_check;

/// Key of the adjacency map inside a root document.
pub const RELATIONSHIPS_KEY: &str = "relationships";

/// The label that triggers leaf resolution.
pub const COUNTY_LABEL: &str = "County";

/// Data-group label of a root document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Label {
    County,
    /// Any other label, including `Seed`.
    Other(String),
}

impl Label {
    pub fn parse(label: &str) -> Self {
        if label == COUNTY_LABEL {
            Self::County
        } else {
            Self::Other(label.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::County => COUNTY_LABEL,
            Self::Other(label) => label,
        }
    }

    pub fn is_county(&self) -> bool {
        matches!(self, Self::County)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One relationship-object link found under an edge type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EdgeLink {
    pub edge: EdgeType,
    pub cid: ContentId,
}

/// The dispatched root document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RootMetadata {
    pub label: Label,
    /// Relationship links in document order. Ignored edge types are absent.
    pub edges: Vec<EdgeLink>,
}

impl RootMetadata {
    /// Read label and edges from a document that already passed
    /// [`metadata_check`].
    pub fn from_document(document: &Value) -> Self {
        let label = document
            .get("label")
            .and_then(Value::as_str)
            .map(Label::parse)
            .unwrap_or_else(|| Label::Other(String::new()));

        let edges = match document.get(RELATIONSHIPS_KEY) {
            Some(Value::Object(map)) => map
                .iter()
                .flat_map(|(name, links)| edge_links(name, links))
                .collect(),
            Some(Value::Null) | None => Vec::new(),
            Some(_) => {
                warn!("relationships is not an object, ignoring");
                Vec::new()
            }
        };

        Self { label, edges }
    }
}

fn edge_links(name: &str, links: &Value) -> Vec<EdgeLink> {
    let Some(edge) = EdgeType::from_name(name) else {
        debug!(edge = name, "unknown edge type, ignoring");
        return Vec::new();
    };
    if edge.spec().is_ignored() {
        debug!(%edge, "edge type yields no leaves, ignoring");
        return Vec::new();
    }

    let candidates: Vec<&Value> = match links {
        Value::Array(items) => items.iter().collect(),
        Value::Null => Vec::new(),
        single => vec![single],
    };
    if edge.spec().arity == Arity::Single && candidates.len() > 1 {
        debug!(%edge, count = candidates.len(), "single edge carries several links");
    }

    candidates
        .into_iter()
        .filter_map(|value| match parse_link(value) {
            Ok(cid) => Some(EdgeLink { edge, cid }),
            Err(reason) => {
                warn!(%edge, %reason, "skipping malformed relationship link");
                None
            }
        })
        .collect()
}

fn parse_link(value: &Value) -> Result<ContentId, String> {
    let link: Link = serde_json::from_value(value.clone()).map_err(|e| e.to_string())?;
    link.content_id().map_err(|e| e.to_string())
}

/// Fetch and dispatch the root document of a submission.
///
/// Uses the metadata budget; exhaustion is fatal to the event.
pub async fn dispatch(source: &dyn ContentSource, cid: &ContentId) -> GraphResult<RootMetadata> {
    let document = source
        .resolve(cid, metadata_check, RetryBudget::Metadata)
        .await
        .map_err(|err| GraphError::MetadataUnavailable {
            cid: cid.clone(),
            source: err,
        })?;
    let metadata = RootMetadata::from_document(&document);
    debug!(cid = %cid, label = %metadata.label, edges = metadata.edges.len(), "root metadata dispatched");
    Ok(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use parcel_gateway::InMemoryContentSource;
    use serde_json::json;

    fn cid(n: u8) -> ContentId {
        ContentId::from_digest(&[n; 32]).unwrap()
    }

    fn link(n: u8) -> Value {
        json!({ "/": cid(n).as_str() })
    }

    #[test]
    fn county_document_with_mixed_arity() {
        let doc = json!({
            "label": "County",
            "relationships": {
                "property_has_address": link(1),
                "property_has_sales_history": [link(2), link(3)],
                "property_has_structure": [link(4)],
                "person_has_property": link(5),
            }
        });
        let meta = RootMetadata::from_document(&doc);
        assert!(meta.label.is_county());

        let mut edges: Vec<(EdgeType, ContentId)> =
            meta.edges.into_iter().map(|l| (l.edge, l.cid)).collect();
        edges.sort();
        assert_eq!(
            edges,
            vec![
                (EdgeType::PropertyHasStructure, cid(4)),
                (EdgeType::PropertyHasAddress, cid(1)),
                (EdgeType::PropertyHasSalesHistory, cid(2)),
                (EdgeType::PropertyHasSalesHistory, cid(3)),
                (EdgeType::PersonHasProperty, cid(5)),
            ]
        );
    }

    #[test]
    fn seed_and_unknown_edges_are_skipped() {
        let doc = json!({
            "label": "County",
            "relationships": {
                "property_seed": link(1),
                "property_has_pool": link(2),
                "property_has_lot": null,
                "property_has_tax": [],
            }
        });
        assert!(RootMetadata::from_document(&doc).edges.is_empty());
    }

    #[test]
    fn malformed_links_are_skipped() {
        let doc = json!({
            "label": "County",
            "relationships": {
                "property_has_file": [link(1), { "/": "not-a-cid" }, "bare", { "cid": "x" }],
            }
        });
        let meta = RootMetadata::from_document(&doc);
        assert_eq!(
            meta.edges,
            vec![EdgeLink {
                edge: EdgeType::PropertyHasFile,
                cid: cid(1)
            }]
        );
    }

    #[test]
    fn missing_relationships_is_empty() {
        let meta = RootMetadata::from_document(&json!({ "label": "Seed" }));
        assert_eq!(meta.label, Label::Other("Seed".into()));
        assert!(!meta.label.is_county());
        assert!(meta.edges.is_empty());

        let meta = RootMetadata::from_document(&json!({ "label": "County", "relationships": [1] }));
        assert!(meta.edges.is_empty());
    }

    #[test]
    fn label_is_case_sensitive() {
        assert_eq!(Label::parse("county"), Label::Other("county".into()));
        assert_eq!(Label::parse("County").to_string(), "County");
    }

    #[tokio::test]
    async fn dispatch_fetches_with_metadata_check() {
        let source = InMemoryContentSource::new();
        source.insert(cid(9), json!({ "label": "County", "relationships": { "property_has_lot": link(1) } }));

        let meta = dispatch(&source, &cid(9)).await.unwrap();
        assert!(meta.label.is_county());
        assert_eq!(meta.edges.len(), 1);
    }

    #[tokio::test]
    async fn dispatch_surfaces_unavailable_metadata() {
        let source = InMemoryContentSource::new();
        source.insert(cid(9), json!({ "relationships": {} }));

        let err = dispatch(&source, &cid(9)).await.unwrap_err();
        assert!(matches!(err, GraphError::MetadataUnavailable { .. }));
        assert!(err.to_string().contains("label is missing"));
    }
}
