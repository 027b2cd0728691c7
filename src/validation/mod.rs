//! Input validation at the boundary of the numeric pipeline.
//!
//! Every check fails fast with a typed [`EngineError`](crate::error::EngineError);
//! nothing here downgrades bad input to defaults.
pub mod changes;
pub mod matrices;

pub use changes::validate_changes;
pub use matrices::{build_matrix, validate_inputs, FINAL_DEMAND, INTERMEDIATE_CONSUMPTION};
