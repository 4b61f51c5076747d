//! Event ingestion for the parcel indexer.
//!
//! [`Pipeline::process`] is the host-driven entry point: it takes one decoded
//! submission event and a [`parcel_store::RecordStore`], and either rejects,
//! drops, or materializes the event.
//!
//! # Pipeline
//!
//! 1. Gate: validation, then the submitter allow-list.
//! 2. CID derivation from the event's content hash.
//! 3. Root metadata dispatch; only `County` continues.
//! 4. Graph walk: relationships, then leaves, each as one concurrent batch.
//! 5. Materialization: singleton leaves are upserted, repeatables staged.
//! 6. Reconciliation: the root id is settled, repeatables are committed
//!    under it, and the root record is upserted last.

pub mod error;
pub mod materializer;
pub mod pipeline;
pub mod reconciler;
pub mod report;

pub use error::{IngestError, IngestResult};
pub use materializer::{leaf_record, materialize, Materialization, WorkingSet, PROPERTY_ID_FIELD};
pub use pipeline::Pipeline;
pub use reconciler::{final_id, Reconciler, Reconciliation};
pub use report::{EventOutcome, MaterializeReport};
