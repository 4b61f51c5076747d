use thiserror::Error;

/// Errors that abort processing of one event.
///
/// Gate rejections, non-County labels and failed graph branches are not
/// errors; they are reported through [`crate::EventOutcome`].
#[derive(Debug, Error)]
pub enum IngestError {
    /// The event's content hash cannot be turned into a CID.
    #[error("malformed input: {0}")]
    MalformedInput(#[from] parcel_types::TypeError),

    /// Root metadata could not be fetched within its pass budget.
    #[error("metadata unavailable: {0}")]
    MetadataUnavailable(#[from] parcel_graph::GraphError),

    /// The gateway resolver could not be built.
    #[error("gateway error: {0}")]
    Gateway(#[from] parcel_gateway::GatewayError),

    #[error("gate error: {0}")]
    Gate(#[from] parcel_gate::GateError),

    #[error("store error: {0}")]
    Store(#[from] parcel_store::StoreError),
}

pub type IngestResult<T> = Result<T, IngestError>;
