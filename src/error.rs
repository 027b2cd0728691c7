//! The single failure type of the engine.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Dimension mismatch: {msg}")]
    DimensionMismatch { msg: String },
    #[error("Matrix '{matrix}' is empty")]
    EmptyMatrix { matrix: String },
    #[error("Matrix '{matrix}' contains a non-finite value at [{row}][{col}]: {value}")]
    NonNumericData { matrix: String, row: usize, col: usize, value: f64 },
    #[error("Duplicate label '{label}'")]
    DuplicateLabel { label: String },
    #[error("Row labels do not match the sector set (missing: {missing:?}, unexpected: {unexpected:?})")]
    LabelMismatch { missing: Vec<String>, unexpected: Vec<String> },
    #[error("(I - A) is singular: {reason}")]
    SingularMatrix { reason: String },
    #[error("Numeric overflow while deriving {artifact}")]
    NumericOverflow { artifact: &'static str },

    #[error("At least one sector change is required")]
    EmptyChangeSet,
    #[error("Total final use and component changes cannot be used together")]
    MixedChangeTypes,
    #[error("Duplicate sector-demand combination: {sector} - {demand}")]
    DuplicateChange { sector: String, demand: String },
    #[error("Value must be non-negative, got {value}, for sector '{sector}' and demand '{demand}'")]
    NegativeChangeValue { sector: String, demand: String, value: f64 },
    #[error("Unknown sector '{0}'")]
    UnknownSector(String),
    #[error("Unknown demand category '{0}'")]
    UnknownDemandCategory(String),
    #[error("Percent change undefined for ({sector}, {demand}): zero base")]
    DivideByZeroInPercentChange { sector: String, demand: String },

    #[error("Unknown operation type: {0}")]
    UnknownOperation(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl EngineError {
    pub(crate) fn mismatch(msg: impl Into<String>) -> Self {
        EngineError::DimensionMismatch { msg: msg.into() }
    }

    /// Names the offending matrix in errors raised by generic constructors.
    pub(crate) fn in_matrix(self, name: &str) -> Self {
        match self {
            EngineError::NonNumericData { row, col, value, .. } => {
                EngineError::NonNumericData { matrix: name.to_string(), row, col, value }
            }
            EngineError::EmptyMatrix { .. } => EngineError::EmptyMatrix { matrix: name.to_string() },
            EngineError::DimensionMismatch { msg } => EngineError::mismatch(format!("{}: {}", name, msg)),
            other => other,
        }
    }

    /// True for failures caused by malformed caller input, as opposed to
    /// numeric failures of the pipeline itself.
    pub fn is_input_error(&self) -> bool {
        !matches!(
            self,
            EngineError::SingularMatrix { .. } | EngineError::NumericOverflow { .. }
        )
    }
}
