//! Engine configuration.
//!
//! Every field has a default, so a partial JSON document (or none at all)
//! yields a usable configuration.
use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Reserved demand label that addresses a sector's total final use.
pub const TOTAL_FINAL_USE: &str = "total_final_use";

/// Which sector's total output divides an intermediate flow z_ij.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoefficientBasis {
    /// a_ij = z_ij / x_j: input from sector i per unit of sector j's output.
    #[default]
    PurchaserOutput,
    /// a_ij = z_ij / x_i: each producing row normalised by its own output.
    ProducerOutput,
}

/// How final-demand rows are matched to the sector order of the
/// intermediate consumption matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignmentPolicy {
    /// Same label set required; only the order may differ.
    #[default]
    Strict,
    /// Unknown rows are dropped and missing rows are filled with zeros.
    FillMissing,
}

/// Denominator of the scenario percent-change matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PercentChangeBase {
    /// Divide by the unmodified final demand.
    #[default]
    Baseline,
    /// Divide by the modified (scenario) final demand.
    Scenario,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioOptions {
    /// Skip changes that name an unknown sector or demand category instead
    /// of failing the whole batch.
    pub lenient_labels: bool,
    pub percent_change_base: PercentChangeBase,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub coefficient_basis: CoefficientBasis,
    pub alignment: AlignmentPolicy,
    /// Smallest acceptable ratio between the smallest and largest pivot of
    /// the LU factorisation of (I - A).
    pub singular_tolerance: f64,
    pub total_final_use_label: String,
    pub scenario: ScenarioOptions,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            coefficient_basis: CoefficientBasis::default(),
            alignment: AlignmentPolicy::default(),
            singular_tolerance: 1e-12,
            total_final_use_label: TOTAL_FINAL_USE.to_string(),
            scenario: ScenarioOptions::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, EngineError> {
        let config: Self = serde_json::from_str(json).map_err(|e| EngineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| EngineError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.singular_tolerance.is_finite() || self.singular_tolerance < 0.0 {
            return Err(EngineError::Config(format!(
                "singular_tolerance must be a non-negative finite number, got {}",
                self.singular_tolerance
            )));
        }
        if self.total_final_use_label.trim().is_empty() {
            return Err(EngineError::Config("total_final_use_label cannot be empty".into()));
        }
        Ok(())
    }

    /// Whether a demand label addresses total final use. The spaced spelling
    /// used in reports is accepted alongside the configured label.
    pub fn is_total_final_use(&self, demand: &str) -> bool {
        demand == self.total_final_use_label || demand.replace(' ', "_") == self.total_final_use_label
    }
}
