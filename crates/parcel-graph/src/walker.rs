//! Two-phase graph traversal.
//!
//! Phase one resolves every relationship object named by the root metadata
//! and waits for the whole batch. Phase two extracts the registry side(s)
//! of each relationship, deduplicates the leaf targets by kind and CID, and
//! resolves all leaves as a second batch. A failure in either phase only
//! drops the affected branch.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use futures::future::join_all;
use parcel_gateway::{ContentSource, RetryBudget};
use parcel_store::EntityType;
use parcel_types::{ContentId, RelationshipEdge};
use serde_json::Value;
use tracing::{debug, warn};

use crate::metadata::EdgeLink;
use crate::registry::EdgeType;
use crate::shapes::{object_check, relationship_check};

/// A leaf document ready for materialization.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedLeaf {
    pub kind: EntityType,
    pub cid: ContentId,
    /// Edge that first named this leaf.
    pub edge: EdgeType,
    pub payload: Arc<Value>,
}

/// Which phase a branch failed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalkPhase {
    Relationship,
    Leaf,
}

impl fmt::Display for WalkPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Relationship => f.write_str("relationship"),
            Self::Leaf => f.write_str("leaf"),
        }
    }
}

/// A branch that could not be resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalkFailure {
    pub phase: WalkPhase,
    pub edge: EdgeType,
    /// Leaf kind, for leaf failures.
    pub kind: Option<EntityType>,
    pub cid: ContentId,
    pub reason: String,
}

impl fmt::Display for WalkFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} via {}", self.phase, self.cid, self.edge)?;
        if let Some(kind) = self.kind {
            write!(f, " ({kind})")?;
        }
        write!(f, ": {}", self.reason)
    }
}

/// Everything one traversal produced.
#[derive(Clone, Debug, Default)]
pub struct WalkReport {
    /// Resolved leaves in first-seen order, unique by `(kind, cid)`.
    pub leaves: Vec<ResolvedLeaf>,
    pub failed_relationships: Vec<WalkFailure>,
    pub failed_leaves: Vec<WalkFailure>,
}

impl WalkReport {
    /// The first resolved leaf of a kind.
    pub fn first(&self, kind: EntityType) -> Option<&ResolvedLeaf> {
        self.leaves.iter().find(|leaf| leaf.kind == kind)
    }

    pub fn is_complete(&self) -> bool {
        self.failed_relationships.is_empty() && self.failed_leaves.is_empty()
    }
}

/// A leaf target extracted from a relationship object.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct LeafTarget {
    kind: EntityType,
    cid: ContentId,
    edge: EdgeType,
}

/// Walks relationship links down to their leaves through a [`ContentSource`].
pub struct GraphWalker<'a> {
    source: &'a dyn ContentSource,
}

impl<'a> GraphWalker<'a> {
    pub fn new(source: &'a dyn ContentSource) -> Self {
        Self { source }
    }

    pub async fn walk(&self, edges: &[EdgeLink]) -> WalkReport {
        let mut report = WalkReport::default();

        let mut seen_links = HashSet::new();
        let links: Vec<&EdgeLink> = edges
            .iter()
            .filter(|link| !link.edge.spec().is_ignored() && seen_links.insert(*link))
            .collect();

        // Phase one: relationship objects.
        let relationships = join_all(links.iter().map(|link| async move {
            let result = self
                .source
                .resolve(&link.cid, relationship_check, RetryBudget::Content)
                .await;
            (*link, result)
        }))
        .await;

        let mut targets = Vec::new();
        let mut seen_targets = HashSet::new();
        for (link, result) in relationships {
            let edge = match result
                .map_err(|e| e.to_string())
                .and_then(|doc| RelationshipEdge::from_json(&doc).map_err(|e| e.to_string()))
            {
                Ok(edge) => edge,
                Err(reason) => {
                    warn!(edge = %link.edge, cid = %link.cid, %reason, "relationship unresolved");
                    report.failed_relationships.push(WalkFailure {
                        phase: WalkPhase::Relationship,
                        edge: link.edge,
                        kind: None,
                        cid: link.cid.clone(),
                        reason,
                    });
                    continue;
                }
            };
            let (extracted, invalid) = extract_targets(link.edge, &edge);
            if !invalid.is_empty() {
                let reason = invalid.join("; ");
                warn!(edge = %link.edge, cid = %link.cid, %reason, "relationship side invalid");
                report.failed_relationships.push(WalkFailure {
                    phase: WalkPhase::Relationship,
                    edge: link.edge,
                    kind: None,
                    cid: link.cid.clone(),
                    reason,
                });
            }
            for target in extracted {
                if seen_targets.insert((target.kind, target.cid.clone())) {
                    targets.push(target);
                }
            }
        }
        debug!(
            relationships = links.len(),
            leaves = targets.len(),
            "relationship phase complete"
        );

        // Phase two: leaf documents.
        let leaves = join_all(targets.into_iter().map(|target| async move {
            let result = self
                .source
                .resolve(&target.cid, object_check, RetryBudget::Content)
                .await;
            (target, result)
        }))
        .await;

        for (target, result) in leaves {
            match result {
                Ok(payload) => report.leaves.push(ResolvedLeaf {
                    kind: target.kind,
                    cid: target.cid,
                    edge: target.edge,
                    payload,
                }),
                Err(e) => {
                    let reason = e.to_string();
                    warn!(
                        edge = %target.edge,
                        kind = %target.kind,
                        cid = %target.cid,
                        %reason,
                        "leaf unresolved"
                    );
                    report.failed_leaves.push(WalkFailure {
                        phase: WalkPhase::Leaf,
                        edge: target.edge,
                        kind: Some(target.kind),
                        cid: target.cid,
                        reason,
                    });
                }
            }
        }
        report
    }
}

/// Leaf targets for the sides the registry reads from `edge`.
///
/// A malformed side the registry reads is returned as a failure reason and
/// the other side is still used. A malformed side it does not read is
/// ignored.
fn extract_targets(
    edge: EdgeType,
    relationship: &RelationshipEdge,
) -> (Vec<LeafTarget>, Vec<String>) {
    let spec = edge.spec();
    let mut targets = Vec::with_capacity(2);
    let mut invalid = Vec::new();
    match (spec.from, relationship.from_id()) {
        (Some(kind), Some(Ok(cid))) => targets.push(LeafTarget { kind, cid, edge }),
        (Some(_), Some(Err(e))) => invalid.push(format!("from: {e}")),
        (Some(_), None) => debug!(%edge, "relationship has no from side"),
        (None, Some(Err(e))) => warn!(%edge, error = %e, "ignoring malformed from side"),
        (None, _) => {}
    }
    match (spec.to, relationship.to_id()) {
        (Some(kind), Ok(cid)) => targets.push(LeafTarget { kind, cid, edge }),
        (Some(_), Err(e)) => invalid.push(format!("to: {e}")),
        (None, Err(e)) => warn!(%edge, error = %e, "ignoring malformed to side"),
        (None, Ok(_)) => {}
    }
    (targets, invalid)
}
