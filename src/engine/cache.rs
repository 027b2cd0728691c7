//! Owned storage for derived artifacts, invalidated as a unit.

use super::multipliers::Multipliers;
use crate::matrix::LabeledMatrix;
use serde::Serialize;
use std::sync::Arc;

/// The quantities the engine derives lazily from its two inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Artifact {
    AlignedFinalDemand,
    CombinedMatrix,
    TechnicalCoefficients,
    LeontiefInverse,
    Multipliers,
}

impl Artifact {
    pub const ALL: [Artifact; 5] = [
        Artifact::AlignedFinalDemand,
        Artifact::CombinedMatrix,
        Artifact::TechnicalCoefficients,
        Artifact::LeontiefInverse,
        Artifact::Multipliers,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Artifact::AlignedFinalDemand => "aligned final demand",
            Artifact::CombinedMatrix => "combined IO matrix",
            Artifact::TechnicalCoefficients => "technical coefficients",
            Artifact::LeontiefInverse => "leontief inverse",
            Artifact::Multipliers => "multipliers",
        }
    }
}

/// One slot per artifact. A slot only ever holds a successfully derived value,
/// so a failed derivation leaves upstream slots untouched.
#[derive(Debug, Clone, Default)]
pub struct ArtifactCache {
    pub(crate) aligned_final_demand: Option<Arc<LabeledMatrix>>,
    pub(crate) combined: Option<Arc<LabeledMatrix>>,
    pub(crate) coefficients: Option<Arc<LabeledMatrix>>,
    pub(crate) inverse: Option<Arc<LabeledMatrix>>,
    pub(crate) multipliers: Option<Arc<Multipliers>>,
}

impl ArtifactCache {
    pub fn new() -> Self { Self::default() }

    pub fn is_cached(&self, artifact: Artifact) -> bool {
        match artifact {
            Artifact::AlignedFinalDemand => self.aligned_final_demand.is_some(),
            Artifact::CombinedMatrix => self.combined.is_some(),
            Artifact::TechnicalCoefficients => self.coefficients.is_some(),
            Artifact::LeontiefInverse => self.inverse.is_some(),
            Artifact::Multipliers => self.multipliers.is_some(),
        }
    }

    pub fn cached(&self) -> Vec<Artifact> {
        Artifact::ALL.into_iter().filter(|a| self.is_cached(*a)).collect()
    }

    /// Every artifact depends on both inputs, so there is no partial invalidation.
    pub fn invalidate_all(&mut self) {
        *self = Self::default();
    }
}
