//! Counterfactual ("what-if") evaluation on top of a [`MatrixEngine`](crate::engine::MatrixEngine).
//!
//! Nothing in this module mutates engine inputs; every evaluation runs against
//! an [`EngineSnapshot`](crate::engine::EngineSnapshot).
pub mod batch;
pub mod change;
pub mod evaluator;

pub use batch::{calculate_output_scenarios, snapshot_output_scenarios, ScenarioOutput};
pub use change::{ChangeKind, ScenarioChange};
pub use evaluator::{PercentChangeMatrix, ScenarioEvaluator, ScenarioResult};
