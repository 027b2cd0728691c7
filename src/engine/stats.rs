use super::cache::Artifact;
use serde::Serialize;

/// Counts how often each artifact was derived versus served from cache.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DerivationStats {
    pub aligned_final_demand: usize,
    pub combined_matrix: usize,
    pub technical_coefficients: usize,
    /// Number of O(n^3) inversions performed.
    pub leontief_inverse: usize,
    pub multipliers: usize,
    pub cache_hits: usize,
    pub cache_resets: usize,
}

impl DerivationStats {
    pub(crate) fn record_derivation(&mut self, artifact: Artifact) {
        *self.counter_mut(artifact) += 1;
    }

    pub(crate) fn record_hit(&mut self) {
        self.cache_hits += 1;
    }

    pub(crate) fn record_reset(&mut self) {
        self.cache_resets += 1;
    }

    pub fn derivations(&self, artifact: Artifact) -> usize {
        match artifact {
            Artifact::AlignedFinalDemand => self.aligned_final_demand,
            Artifact::CombinedMatrix => self.combined_matrix,
            Artifact::TechnicalCoefficients => self.technical_coefficients,
            Artifact::LeontiefInverse => self.leontief_inverse,
            Artifact::Multipliers => self.multipliers,
        }
    }

    pub fn total_derivations(&self) -> usize {
        Artifact::ALL.iter().map(|a| self.derivations(*a)).sum()
    }

    fn counter_mut(&mut self, artifact: Artifact) -> &mut usize {
        match artifact {
            Artifact::AlignedFinalDemand => &mut self.aligned_final_demand,
            Artifact::CombinedMatrix => &mut self.combined_matrix,
            Artifact::TechnicalCoefficients => &mut self.technical_coefficients,
            Artifact::LeontiefInverse => &mut self.leontief_inverse,
            Artifact::Multipliers => &mut self.multipliers,
        }
    }
}
