use std::fmt;

use parcel_store::IdSource;
use parcel_types::ContentId;
use serde::Serialize;

/// What happened to one inbound event.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EventOutcome {
    /// Stopped by a gate stage. Nothing was fetched or written.
    Rejected { stage: String, reason: String },
    /// The root document's label is not `County`. Nothing was written.
    Dropped { label: String },
    /// The graph was walked and records were written.
    Materialized(MaterializeReport),
}

impl EventOutcome {
    pub fn is_materialized(&self) -> bool {
        matches!(self, Self::Materialized(_))
    }

    pub fn report(&self) -> Option<&MaterializeReport> {
        match self {
            Self::Materialized(report) => Some(report),
            _ => None,
        }
    }
}

impl fmt::Display for EventOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected { stage, reason } => write!(f, "rejected at {stage}: {reason}"),
            Self::Dropped { label } => write!(f, "dropped (label {label})"),
            Self::Materialized(report) => write!(f, "{report}"),
        }
    }
}

/// Summary of a materialized event.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MaterializeReport {
    /// CID of the event's root document.
    pub cid: ContentId,
    /// Final id of the root record.
    pub root_id: String,
    pub id_source: IdSource,
    /// `true` when the root id moved from the property hash to a parcel id.
    pub rekeyed: bool,
    pub singletons_written: usize,
    pub repeatables_written: usize,
    /// Relationship objects that could not be resolved.
    pub failed_relationships: Vec<ContentId>,
    /// Leaf documents that could not be resolved or decoded.
    pub failed_leaves: Vec<ContentId>,
}

impl MaterializeReport {
    pub fn is_complete(&self) -> bool {
        self.failed_relationships.is_empty() && self.failed_leaves.is_empty()
    }
}

impl fmt::Display for MaterializeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "materialized {} ({}{}): {} singleton(s), {} repeatable(s)",
            self.root_id,
            self.id_source,
            if self.rekeyed { ", rekeyed" } else { "" },
            self.singletons_written,
            self.repeatables_written,
        )?;
        if !self.is_complete() {
            write!(
                f,
                ", {} failed relationship(s), {} failed leaf/leaves",
                self.failed_relationships.len(),
                self.failed_leaves.len()
            )?;
        }
        Ok(())
    }
}
