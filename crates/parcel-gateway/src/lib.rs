//! Multi-gateway IPFS resolution for the parcel indexer.
//!
//! A CID is resolved by rotating through an ordered list of HTTP gateways.
//! Any failure on one gateway moves immediately to the next; only when a
//! full pass over the list fails does the resolver wait before starting a
//! new pass. Failures are classified into two tiers for diagnostics.
//!
//! Two budgets exist: [`RetryBudget::Metadata`] caps root metadata at a few
//! passes, while [`RetryBudget::Content`] keeps retrying relationship and
//! leaf documents through long gateway outages.

pub mod cache;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod memory;
pub mod resolver;
pub mod sleep;
pub mod transport;

pub use cache::FetchCache;
pub use config::{GatewayConfig, RetryBudget, RetryPolicy};
pub use endpoint::{default_gateways, ordered_endpoints, GatewayEndpoint, TOKEN_QUERY_PARAM};
pub use error::{AttemptError, AttemptFailure, FailureTier, GatewayError, GatewayResult};
pub use memory::InMemoryContentSource;
pub use resolver::{ContentSource, GatewayResolver, ShapeCheck};
pub use sleep::{Sleeper, TokioSleeper};
pub use transport::{GatewayTransport, HttpTransport};
