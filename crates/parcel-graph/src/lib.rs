//! Relationship graph traversal for the parcel indexer.
//!
//! A submission's root document links to relationship objects, and each
//! relationship object links to one or two leaf documents. This crate knows
//! which edges exist ([`EdgeType`]), reads the root document
//! ([`metadata::dispatch`]), and walks the graph down to its leaves
//! ([`GraphWalker`]).
//!
//! # Invariants
//!
//! - Only a `County` root is walked.
//! - Relationships are resolved as one concurrent batch, then leaves as a
//!   second batch.
//! - Each `(kind, cid)` leaf is fetched at most once per walk.
//! - A failed branch is reported, never fatal.

pub mod error;
pub mod metadata;
pub mod registry;
pub mod shapes;
pub mod walker;

pub use error::{GraphError, GraphResult};
pub use metadata::{dispatch, EdgeLink, Label, RootMetadata, COUNTY_LABEL, RELATIONSHIPS_KEY};
pub use registry::{Arity, EdgeSpec, EdgeType};
pub use shapes::{metadata_check, object_check, relationship_check};
pub use walker::{GraphWalker, ResolvedLeaf, WalkFailure, WalkPhase, WalkReport};
