//! Built-in gate stages.

pub mod allow_list;
pub mod validation;

pub use allow_list::{AllowList, AllowListStage};
pub use validation::ValidationStage;
