//! Read-only views over a fully derived engine, shareable across threads.
use super::multipliers::Multipliers;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::matrix::{align_rows, LabeledMatrix, LabeledVector, Labels};
use std::borrow::Cow;
use std::sync::Arc;

/// Every artifact of one engine state, held by `Arc`.
///
/// A snapshot never changes; replacing the engine's data afterwards does not
/// affect snapshots already taken.
#[derive(Debug, Clone)]
pub struct EngineSnapshot {
    pub(crate) config: EngineConfig,
    pub(crate) intermediate: Arc<LabeledMatrix>,
    pub(crate) final_demand: Arc<LabeledMatrix>,
    pub(crate) combined: Arc<LabeledMatrix>,
    pub(crate) coefficients: Arc<LabeledMatrix>,
    pub(crate) inverse: Arc<LabeledMatrix>,
    pub(crate) multipliers: Arc<Multipliers>,
}

impl EngineSnapshot {
    pub fn config(&self) -> &EngineConfig { &self.config }
    pub fn sectors(&self) -> &Labels { self.intermediate.row_labels() }
    pub fn intermediate_consumption(&self) -> &Arc<LabeledMatrix> { &self.intermediate }
    /// Final demand in sector order.
    pub fn final_demand(&self) -> &Arc<LabeledMatrix> { &self.final_demand }
    pub fn combined_matrix(&self) -> &Arc<LabeledMatrix> { &self.combined }
    pub fn technical_coefficients(&self) -> &Arc<LabeledMatrix> { &self.coefficients }
    pub fn leontief_inverse(&self) -> &Arc<LabeledMatrix> { &self.inverse }
    pub fn multipliers(&self) -> &Arc<Multipliers> { &self.multipliers }

    pub fn total_output(&self) -> LabeledVector {
        self.combined.row_sums()
    }

    /// Row sums of the baseline final demand.
    pub fn total_final_use(&self) -> LabeledVector {
        self.final_demand.row_sums()
    }

    pub fn compute_output(&self, final_demand: &LabeledMatrix) -> Result<LabeledVector, EngineError> {
        output_for_demand(&self.inverse, final_demand, &self.config)
    }

    pub fn compute_output_by_category(&self, final_demand: &LabeledMatrix) -> Result<LabeledMatrix, EngineError> {
        output_by_category(&self.inverse, final_demand, &self.config)
    }
}

/// Drops a derived total-final-use column when real demand categories sit
/// beside it. A matrix holding only that column is an override and is kept.
pub(crate) fn strip_total_final_use<'a>(fd: &'a LabeledMatrix, config: &EngineConfig) -> Cow<'a, LabeledMatrix> {
    let keep: Vec<usize> = (0..fd.ncols())
        .filter(|&j| !config.is_total_final_use(&fd.col_labels().as_slice()[j]))
        .collect();
    if keep.is_empty() || keep.len() == fd.ncols() {
        Cow::Borrowed(fd)
    } else {
        Cow::Owned(fd.select_columns(&keep))
    }
}

/// X = L * y, with y the row sums of `final_demand` in sector order.
pub(crate) fn output_for_demand(
    inverse: &LabeledMatrix,
    final_demand: &LabeledMatrix,
    config: &EngineConfig,
) -> Result<LabeledVector, EngineError> {
    let demand = strip_total_final_use(final_demand, config);
    let aligned = align_rows(&demand, inverse.row_labels(), config.alignment)?;
    let y = super::kernel::row_sums(aligned.data());
    let x = inverse.data() * y;
    if x.iter().any(|v| !v.is_finite()) {
        return Err(EngineError::NumericOverflow { artifact: "total output" });
    }
    Ok(LabeledVector::from_dvector(inverse.row_labels().clone(), &x))
}

/// L * FD: the output required by each demand category separately. Its row
/// sums equal [`output_for_demand`].
pub(crate) fn output_by_category(
    inverse: &LabeledMatrix,
    final_demand: &LabeledMatrix,
    config: &EngineConfig,
) -> Result<LabeledMatrix, EngineError> {
    let demand = strip_total_final_use(final_demand, config);
    let aligned = align_rows(&demand, inverse.row_labels(), config.alignment)?;
    let data = inverse.data() * aligned.data();
    if data.iter().any(|v| !v.is_finite()) {
        return Err(EngineError::NumericOverflow { artifact: "output by category" });
    }
    Ok(LabeledMatrix::from_parts(inverse.row_labels().clone(), aligned.col_labels().clone(), data))
}
