// Leontief input-output engine.
//
// Raw (intermediate consumption, final demand) tables go in; technical
// coefficients, the Leontief inverse, multipliers and scenario projections
// come out. Everything above this crate (HTTP, storage, CSV, display) talks to
// it through labelled matrices and typed errors.

// --- Core modules ---
pub mod config;
pub mod engine;
pub mod error;
pub mod matrix;
pub mod scenario;
pub mod validation;

// --- Boundary shapes ---
pub mod record;
pub mod sample;

pub mod logging;

pub use config::{AlignmentPolicy, CoefficientBasis, EngineConfig, PercentChangeBase, ScenarioOptions};
pub use engine::{EngineSnapshot, MatrixEngine, MatrixOperation, Multipliers, OperationOutput, OperationResult};
pub use error::EngineError;
pub use matrix::{LabeledMatrix, LabeledVector, Labels, TableData};
pub use record::{MatrixRecord, MatrixRecordUpdate};
pub use scenario::{
    calculate_output_scenarios, ChangeKind, PercentChangeMatrix, ScenarioChange, ScenarioEvaluator, ScenarioOutput,
    ScenarioResult,
};
