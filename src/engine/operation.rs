//! The closed set of computations the request surface can ask for.
use super::multipliers::Multipliers;
use crate::error::EngineError;
use crate::matrix::LabeledMatrix;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatrixOperation {
    IoMatrix,
    IntermediateConsumption,
    FinalDemand,
    TechnicalCoefficients,
    LeontiefInverse,
    Multipliers,
}

impl MatrixOperation {
    pub const ALL: [MatrixOperation; 6] = [
        MatrixOperation::IoMatrix,
        MatrixOperation::IntermediateConsumption,
        MatrixOperation::FinalDemand,
        MatrixOperation::TechnicalCoefficients,
        MatrixOperation::LeontiefInverse,
        MatrixOperation::Multipliers,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MatrixOperation::IoMatrix => "io_matrix",
            MatrixOperation::IntermediateConsumption => "intermediate_consumption",
            MatrixOperation::FinalDemand => "final_demand",
            MatrixOperation::TechnicalCoefficients => "technical_coefficients",
            MatrixOperation::LeontiefInverse => "leontief_inverse",
            MatrixOperation::Multipliers => "multipliers",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            MatrixOperation::IoMatrix => "Full IO Matrix",
            MatrixOperation::IntermediateConsumption => "Intermediate Consumption Matrix",
            MatrixOperation::FinalDemand => "Final Demand Matrix",
            MatrixOperation::TechnicalCoefficients => "Technical Coefficients Matrix",
            MatrixOperation::LeontiefInverse => "Leontief Inverse Matrix",
            MatrixOperation::Multipliers => "Economic Multipliers",
        }
    }
}

impl fmt::Display for MatrixOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MatrixOperation {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MatrixOperation::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| EngineError::UnknownOperation(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OperationOutput {
    Matrix(Arc<LabeledMatrix>),
    Multipliers(Arc<Multipliers>),
}

impl OperationOutput {
    pub fn as_matrix(&self) -> Option<&LabeledMatrix> {
        match self {
            OperationOutput::Matrix(m) => Some(m),
            OperationOutput::Multipliers(_) => None,
        }
    }

    pub fn as_multipliers(&self) -> Option<&Multipliers> {
        match self {
            OperationOutput::Multipliers(m) => Some(m),
            OperationOutput::Matrix(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationResult {
    pub operation: MatrixOperation,
    pub description: &'static str,
    pub sectors: Vec<String>,
    pub output: OperationOutput,
}
