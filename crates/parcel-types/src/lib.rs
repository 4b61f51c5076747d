//! Foundation types for the parcel indexer.
//!
//! Every other `parcel-*` crate depends on `parcel-types`.
//!
//! # Key Types
//!
//! - [`ContentId`] -- CIDv1 string derived from a chain digest or parsed from a link
//! - [`Link`] -- IPLD link object (`{"/": cid}`)
//! - [`RelationshipEdge`] -- `{from?, to}` pointer pair from a relationship object
//! - [`SubmissionEvent`] -- inbound chain event that starts one unit of work

pub mod content_id;
pub mod error;
pub mod event;
pub mod link;

pub use content_id::ContentId;
pub use error::TypeError;
pub use event::{EventKind, SubmissionEvent};
pub use link::{Link, RelationshipEdge};
