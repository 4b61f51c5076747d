use std::fmt;

use parcel_types::ContentId;
use thiserror::Error;

/// How a failed attempt is treated by the retry loop.
///
/// Both tiers are retried; the split exists for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FailureTier {
    /// Connection refused, timeout, DNS failure, HTTP 429/502/504.
    Tier1,
    /// Any other non-2xx status, or a 2xx body of the wrong shape.
    Tier2,
}

impl fmt::Display for FailureTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tier1 => write!(f, "tier-1"),
            Self::Tier2 => write!(f, "tier-2"),
        }
    }
}

/// Why one request to one gateway failed.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AttemptError {
    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request timed out")]
    Timeout,

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("body is not JSON: {0}")]
    NotJson(String),

    #[error("shape mismatch: {0}")]
    Shape(String),
}

impl AttemptError {
    pub fn tier(&self) -> FailureTier {
        match self {
            Self::Connect(_) | Self::Timeout => FailureTier::Tier1,
            Self::Status(429 | 502 | 504) => FailureTier::Tier1,
            Self::Status(_) | Self::NotJson(_) | Self::Shape(_) => FailureTier::Tier2,
        }
    }
}

/// One failed attempt, attributed to its gateway.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttemptFailure {
    /// Gateway base URL (never includes the token).
    pub endpoint: String,
    pub error: AttemptError,
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.endpoint, self.error.tier(), self.error)
    }
}

/// Errors surfaced by the resolver.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Every pass allowed by the budget failed on every endpoint.
    #[error("{cid}: no gateway succeeded after {passes} pass(es); last pass: {}", summarize(.last_pass))]
    Exhausted {
        cid: ContentId,
        passes: u32,
        /// Failures from the final pass, in endpoint order.
        last_pass: Vec<AttemptFailure>,
    },

    /// The endpoint list is empty.
    #[error("no gateway endpoints configured")]
    NoEndpoints,

    /// Configuration is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

fn summarize(failures: &[AttemptFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result alias for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;
