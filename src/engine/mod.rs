//! The matrix engine: raw (intermediate consumption, final demand) inputs in,
//! lazily derived and cached input-output artifacts out.
//!
//! Derivation chain:
//! aligned final demand -> combined IO matrix -> technical coefficients
//! -> Leontief inverse -> multipliers.
//!
//! Getters take `&mut self` because a miss populates the cache. An engine is
//! meant to be owned by one logical operation at a time; for concurrent
//! read-only use take a [`EngineSnapshot`] first.
pub mod cache;
pub(crate) mod kernel;
pub mod multipliers;
pub mod operation;
pub mod snapshot;
pub mod stats;

pub use cache::{Artifact, ArtifactCache};
pub use multipliers::Multipliers;
pub use operation::{MatrixOperation, OperationOutput, OperationResult};
pub use snapshot::EngineSnapshot;
pub use stats::DerivationStats;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::matrix::{align_rows, LabeledMatrix, LabeledVector, Labels};
use crate::record::MatrixRecord;
use crate::validation::{self, FINAL_DEMAND, INTERMEDIATE_CONSUMPTION};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct MatrixEngine {
    intermediate: Arc<LabeledMatrix>,
    final_demand: Arc<LabeledMatrix>,
    config: EngineConfig,
    cache: ArtifactCache,
    stats: DerivationStats,
}

impl MatrixEngine {
    /// Validates the input pair and builds an engine with an empty cache.
    ///
    /// Final-demand rows may be in a different order than the sectors; they
    /// are aligned when the combined matrix is first derived.
    pub fn new(
        intermediate: LabeledMatrix,
        final_demand: LabeledMatrix,
        config: EngineConfig,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        validation::validate_inputs(&intermediate, &final_demand)?;
        let final_demand = snapshot::strip_total_final_use(&final_demand, &config).into_owned();
        info!(
            sectors = intermediate.nrows(),
            demand_categories = final_demand.ncols(),
            "matrix engine created"
        );
        Ok(Self {
            intermediate: Arc::new(intermediate),
            final_demand: Arc::new(final_demand),
            config,
            cache: ArtifactCache::new(),
            stats: DerivationStats::default(),
        })
    }

    /// Builds an engine from unlabeled row data. Sectors default to positional
    /// labels; demand categories are labelled `fd_0`, `fd_1`, ...
    pub fn from_lists(
        intermediate: Vec<Vec<f64>>,
        final_demand: Vec<Vec<f64>>,
        sectors: Option<Vec<String>>,
    ) -> Result<Self, EngineError> {
        let sectors: Vec<String> = sectors.unwrap_or_else(|| Labels::indexed(intermediate.len()).into());
        let fd_cols = final_demand.first().map_or(0, Vec::len);
        let ic = validation::build_matrix(INTERMEDIATE_CONSUMPTION, intermediate, sectors.clone(), sectors.clone())?;
        let fd = validation::build_matrix(FINAL_DEMAND, final_demand, sectors, Labels::prefixed("fd_", fd_cols).into())?;
        Self::new(ic, fd, EngineConfig::default())
    }

    /// Builds an engine from a persisted record.
    pub fn from_record(record: &MatrixRecord, config: EngineConfig) -> Result<Self, EngineError> {
        let (ic, fd) = record.to_matrices()?;
        Self::new(ic, fd, config)
    }

    pub fn config(&self) -> &EngineConfig { &self.config }
    pub fn stats(&self) -> &DerivationStats { &self.stats }
    pub fn cache(&self) -> &ArtifactCache { &self.cache }
    pub fn sectors(&self) -> &Labels { self.intermediate.row_labels() }

    /// Replaces the configuration. Every policy affects derived values, so the
    /// cache is reset.
    pub fn set_config(&mut self, config: EngineConfig) -> Result<(), EngineError> {
        config.validate()?;
        self.config = config;
        self.reset_cache();
        Ok(())
    }

    pub fn get_intermediate_consumption(&self) -> Arc<LabeledMatrix> {
        Arc::clone(&self.intermediate)
    }

    /// The final demand as supplied, in its original row order.
    pub fn get_final_demand(&self) -> Arc<LabeledMatrix> {
        Arc::clone(&self.final_demand)
    }

    // --- Derived artifacts ---

    pub fn get_aligned_final_demand(&mut self) -> Result<Arc<LabeledMatrix>, EngineError> {
        if let Some(m) = &self.cache.aligned_final_demand {
            self.stats.record_hit();
            return Ok(Arc::clone(m));
        }
        let aligned = align_rows(&self.final_demand, self.intermediate.row_labels(), self.config.alignment)?;
        let aligned = Arc::new(aligned.into_owned());
        self.store(Artifact::AlignedFinalDemand, &aligned);
        self.cache.aligned_final_demand = Some(Arc::clone(&aligned));
        Ok(aligned)
    }

    /// Intermediate consumption followed column-wise by the aligned final demand.
    pub fn get_combined_matrix(&mut self) -> Result<Arc<LabeledMatrix>, EngineError> {
        if let Some(m) = &self.cache.combined {
            self.stats.record_hit();
            return Ok(Arc::clone(m));
        }
        let fd = self.get_aligned_final_demand()?;
        let combined = Arc::new(self.intermediate.hconcat(&fd)?);
        self.store(Artifact::CombinedMatrix, &combined);
        self.cache.combined = Some(Arc::clone(&combined));
        Ok(combined)
    }

    /// Row sums of the combined matrix: each sector's total output.
    pub fn get_total_output(&mut self) -> Result<LabeledVector, EngineError> {
        Ok(self.get_combined_matrix()?.row_sums())
    }

    pub fn get_technical_coefficients(&mut self) -> Result<Arc<LabeledMatrix>, EngineError> {
        if let Some(m) = &self.cache.coefficients {
            self.stats.record_hit();
            return Ok(Arc::clone(m));
        }
        let combined = self.get_combined_matrix()?;
        let total_output = kernel::row_sums(combined.data());
        let a = kernel::technical_coefficients(self.intermediate.data(), &total_output, self.config.coefficient_basis);
        let a = Self::finite(Artifact::TechnicalCoefficients, self.square(a))?;
        self.store(Artifact::TechnicalCoefficients, &a);
        self.cache.coefficients = Some(Arc::clone(&a));
        Ok(a)
    }

    /// (I - A)^-1. A failure here leaves the cached coefficients intact.
    pub fn get_leontief_inverse(&mut self) -> Result<Arc<LabeledMatrix>, EngineError> {
        if let Some(m) = &self.cache.inverse {
            self.stats.record_hit();
            return Ok(Arc::clone(m));
        }
        let a = self.get_technical_coefficients()?;
        debug!(sectors = a.nrows(), "inverting leontief system");
        let inverse = kernel::leontief_inverse(a.data(), self.config.singular_tolerance)?;
        let inverse = Arc::new(self.square(inverse));
        self.store(Artifact::LeontiefInverse, &inverse);
        self.cache.inverse = Some(Arc::clone(&inverse));
        Ok(inverse)
    }

    pub fn get_multipliers(&mut self) -> Result<Arc<Multipliers>, EngineError> {
        if let Some(m) = &self.cache.multipliers {
            self.stats.record_hit();
            return Ok(Arc::clone(m));
        }
        let inverse = self.get_leontief_inverse()?;
        let multipliers = Arc::new(Multipliers::from_inverse(&inverse));
        self.stats.record_derivation(Artifact::Multipliers);
        info!(sectors = multipliers.output().len(), "multipliers derived");
        self.cache.multipliers = Some(Arc::clone(&multipliers));
        Ok(multipliers)
    }

    // --- Projections ---

    /// X = L * y, where y is the row sum of `final_demand` per sector. Only the
    /// inverse is needed; nothing else in the engine changes.
    pub fn compute_output(&mut self, final_demand: &LabeledMatrix) -> Result<LabeledVector, EngineError> {
        let inverse = self.get_leontief_inverse()?;
        snapshot::output_for_demand(&inverse, final_demand, &self.config)
    }

    /// X = L * y for a demand vector keyed by sector.
    pub fn compute_output_for_vector(&mut self, demand: &LabeledVector) -> Result<LabeledVector, EngineError> {
        let column = LabeledMatrix::from_column(&self.config.total_final_use_label, demand)?;
        self.compute_output(&column)
    }

    /// L * FD, one output column per demand category.
    pub fn compute_output_by_category(&mut self, final_demand: &LabeledMatrix) -> Result<LabeledMatrix, EngineError> {
        let inverse = self.get_leontief_inverse()?;
        snapshot::output_by_category(&inverse, final_demand, &self.config)
    }

    /// Forces every artifact and returns them as one immutable bundle.
    pub fn snapshot(&mut self) -> Result<EngineSnapshot, EngineError> {
        let final_demand = self.get_aligned_final_demand()?;
        let combined = self.get_combined_matrix()?;
        let coefficients = self.get_technical_coefficients()?;
        let inverse = self.get_leontief_inverse()?;
        let multipliers = self.get_multipliers()?;
        Ok(EngineSnapshot {
            config: self.config.clone(),
            intermediate: Arc::clone(&self.intermediate),
            final_demand,
            combined,
            coefficients,
            inverse,
            multipliers,
        })
    }

    /// Runs one of the request-surface computations.
    pub fn perform(&mut self, operation: MatrixOperation) -> Result<OperationResult, EngineError> {
        let output = match operation {
            MatrixOperation::IoMatrix => OperationOutput::Matrix(self.get_combined_matrix()?),
            MatrixOperation::IntermediateConsumption => OperationOutput::Matrix(self.get_intermediate_consumption()),
            MatrixOperation::FinalDemand => OperationOutput::Matrix(self.get_final_demand()),
            MatrixOperation::TechnicalCoefficients => OperationOutput::Matrix(self.get_technical_coefficients()?),
            MatrixOperation::LeontiefInverse => OperationOutput::Matrix(self.get_leontief_inverse()?),
            MatrixOperation::Multipliers => OperationOutput::Multipliers(self.get_multipliers()?),
        };
        info!(operation = %operation, "matrix operation completed");
        Ok(OperationResult {
            operation,
            description: operation.description(),
            sectors: self.sectors().as_slice().to_vec(),
            output,
        })
    }

    // --- Mutation ---

    /// Swaps one or both inputs and invalidates every derived artifact. The
    /// engine is left untouched if the new pair fails validation.
    pub fn replace_data(
        &mut self,
        intermediate: Option<LabeledMatrix>,
        final_demand: Option<LabeledMatrix>,
    ) -> Result<(), EngineError> {
        let ic = intermediate.map(Arc::new).unwrap_or_else(|| Arc::clone(&self.intermediate));
        let fd = match final_demand {
            Some(fd) => Arc::new(snapshot::strip_total_final_use(&fd, &self.config).into_owned()),
            None => Arc::clone(&self.final_demand),
        };
        validation::validate_inputs(&ic, &fd)?;

        self.intermediate = ic;
        self.final_demand = fd;
        self.reset_cache();
        info!(sectors = self.intermediate.nrows(), "matrix data replaced");
        Ok(())
    }

    /// Drops every cached artifact without touching the inputs.
    pub fn reset_cache(&mut self) {
        self.cache.invalidate_all();
        self.stats.record_reset();
        debug!("matrix calculation cache reset");
    }

    // --- Helpers ---

    fn square(&self, data: nalgebra::DMatrix<f64>) -> LabeledMatrix {
        let sectors = self.intermediate.row_labels().clone();
        LabeledMatrix::from_parts(sectors.clone(), sectors, data)
    }

    fn finite(artifact: Artifact, m: LabeledMatrix) -> Result<Arc<LabeledMatrix>, EngineError> {
        if m.first_non_finite().is_some() {
            return Err(EngineError::NumericOverflow { artifact: artifact.name() });
        }
        Ok(Arc::new(m))
    }

    fn store(&mut self, artifact: Artifact, m: &LabeledMatrix) {
        self.stats.record_derivation(artifact);
        info!(artifact = artifact.name(), shape = ?m.shape(), "artifact derived");
    }
}
