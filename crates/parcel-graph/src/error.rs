//! Error types for graph traversal.

use parcel_gateway::GatewayError;
use parcel_types::ContentId;

/// Errors that stop a traversal before any leaf is resolved.
///
/// Relationship and leaf failures never surface here; they are collected in
/// the walk report instead.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// The root metadata document could not be fetched within its budget.
    #[error("root metadata {cid} unavailable: {source}")]
    MetadataUnavailable {
        cid: ContentId,
        #[source]
        source: GatewayError,
    },
}

/// Convenience alias for graph results.
pub type GraphResult<T> = Result<T, GraphError>;
