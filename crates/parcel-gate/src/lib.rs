//! Event gate for the parcel indexer.
//!
//! Every inbound submission event passes through the gate before any CID is
//! derived or fetched. The gate runs a fail-fast pipeline of stages
//! (validation, then the submitter allow-list) and produces an accept/reject
//! decision with a per-stage trail. A rejected event causes zero writes.
//!
//! # Quick Start
//!
//! ```rust
//! use parcel_gate::{EventGate, GateConfig};
//! use parcel_types::SubmissionEvent;
//!
//! let gate = EventGate::with_default_stages(GateConfig::allowing(["0xABC"]));
//! let event = SubmissionEvent {
//!     kind: Default::default(),
//!     content_hash: "aa".repeat(32),
//!     submitter: "0xabc".into(),
//!     property_hash: "0xprop".into(),
//!     data_group_hash: None,
//!     timestamp: 0,
//! };
//! assert!(gate.evaluate(&event).unwrap().is_accepted());
//! ```

pub mod config;
pub mod error;
pub mod gate;
pub mod stage;
pub mod stages;

pub use config::{GateConfig, ENV_WALLET_PREFIX};
pub use error::GateError;
pub use gate::{EventGate, GateDecision, GateResult};
pub use stage::{GateContext, GateStage, StageDecision, StageResult};
pub use stages::{AllowList, AllowListStage, ValidationStage};
