//! What-if evaluation of a change batch against a fully derived engine state.
use super::change::{ChangeKind, ScenarioChange};
use crate::config::{EngineConfig, PercentChangeBase, ScenarioOptions};
use crate::engine::{kernel, EngineSnapshot, MatrixEngine, Multipliers};
use crate::error::EngineError;
use crate::matrix::{LabeledMatrix, LabeledVector, Labels};
use crate::validation::validate_changes;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Elementwise percent change. `None` marks a cell whose base is zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PercentChangeMatrix {
    row_labels: Labels,
    col_labels: Labels,
    cells: Vec<Vec<Option<f64>>>,
}

impl PercentChangeMatrix {
    /// `new` and `base` must share labels and shape.
    pub(crate) fn compute(new: &LabeledMatrix, base: &LabeledMatrix) -> Self {
        Self {
            row_labels: new.row_labels().clone(),
            col_labels: new.col_labels().clone(),
            cells: kernel::percent_change(new.data(), base.data()),
        }
    }

    pub fn row_labels(&self) -> &Labels { &self.row_labels }
    pub fn col_labels(&self) -> &Labels { &self.col_labels }
    pub fn cells(&self) -> &[Vec<Option<f64>>] { &self.cells }

    /// `None` if either label is unknown or the cell is undefined.
    pub fn get(&self, row: &str, col: &str) -> Option<f64> {
        self.cells[self.row_labels.position(row)?][self.col_labels.position(col)?]
    }

    /// (sector, demand) pairs whose percent change has a zero denominator.
    pub fn undefined_cells(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        for (i, row) in self.cells.iter().enumerate() {
            for (j, cell) in row.iter().enumerate() {
                if cell.is_none() {
                    out.push((self.row_labels.as_slice()[i].clone(), self.col_labels.as_slice()[j].clone()));
                }
            }
        }
        out
    }

    /// Fails on the first undefined cell, for callers that cannot report nulls.
    pub fn require_defined(&self) -> Result<&Self, EngineError> {
        match self.undefined_cells().into_iter().next() {
            Some((sector, demand)) => Err(EngineError::DivideByZeroInPercentChange { sector, demand }),
            None => Ok(self),
        }
    }
}

/// Everything one scenario run produces, computed from a single engine state.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    pub kind: ChangeKind,
    pub technical_coefficients: Arc<LabeledMatrix>,
    pub leontief_inverse: Arc<LabeledMatrix>,
    pub multipliers: Arc<Multipliers>,
    /// The baseline combined IO matrix.
    pub io_matrix: Arc<LabeledMatrix>,
    pub new_intermediate_consumption: LabeledMatrix,
    /// Modified demand with a trailing total-final-use column.
    pub modified_final_demand: LabeledMatrix,
    /// L * demand, one column per demand category (a single total-final-use
    /// column for total-final-use changes).
    pub output_by_category: LabeledMatrix,
    pub new_output: LabeledVector,
    pub percent_change: PercentChangeMatrix,
    /// Changes ignored in lenient mode because a label was unknown.
    pub skipped_changes: Vec<ScenarioChange>,
}

#[derive(Debug, Clone, Default)]
pub struct ScenarioEvaluator {
    options: ScenarioOptions,
}

impl ScenarioEvaluator {
    pub fn new(options: ScenarioOptions) -> Self {
        Self { options }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.scenario.clone())
    }

    pub fn options(&self) -> &ScenarioOptions { &self.options }

    /// Validates the batch, takes a snapshot of `engine` and evaluates against it.
    /// The engine's inputs are never modified.
    pub fn apply_changes(
        &self,
        engine: &mut MatrixEngine,
        changes: &[ScenarioChange],
    ) -> Result<ScenarioResult, EngineError> {
        validate_changes(changes, engine.config())?;
        let snapshot = engine.snapshot()?;
        self.evaluate(&snapshot, changes)
    }

    pub fn evaluate(&self, snapshot: &EngineSnapshot, changes: &[ScenarioChange]) -> Result<ScenarioResult, EngineError> {
        let config = snapshot.config();
        let kind = validate_changes(changes, config)?;
        debug!(?kind, changes = changes.len(), "evaluating scenario");

        let baseline_fd = snapshot.final_demand();
        let tfu_label = config.total_final_use_label.as_str();
        let mut skipped = Vec::new();

        // `base` is the unmodified demand in the same shape as `demand`.
        let (demand, base) = match kind {
            ChangeKind::Component => {
                let base = LabeledMatrix::clone(baseline_fd);
                let mut demand = base.clone();
                for change in changes {
                    match self.locate_cell(&demand, change)? {
                        Some((i, j)) => demand.set(i, j, change.value),
                        None => skipped.push(change.clone()),
                    }
                }
                (demand, base)
            }
            ChangeKind::TotalFinalUse => {
                let base = LabeledMatrix::from_column(tfu_label, &snapshot.total_final_use())?;
                let mut demand = base.clone();
                for change in changes {
                    match self.locate_sector(snapshot.sectors(), change)? {
                        Some(i) => demand.set(i, 0, change.value),
                        None => skipped.push(change.clone()),
                    }
                }
                (demand, base)
            }
        };

        let output_by_category = snapshot.compute_output_by_category(&demand)?;
        let new_output = output_by_category.row_sums();

        let coefficients = snapshot.technical_coefficients();
        let scaled = kernel::scale_by_output(coefficients.data(), &new_output.to_dvector(), config.coefficient_basis);
        let sectors = snapshot.sectors().clone();
        let new_intermediate_consumption = LabeledMatrix::from_parts(sectors.clone(), sectors, scaled);
        if new_intermediate_consumption.first_non_finite().is_some() {
            return Err(EngineError::NumericOverflow { artifact: "new intermediate consumption" });
        }

        // For a total-final-use change `demand` is that single column.
        let total = demand.row_sums();
        let modified_final_demand = match kind {
            ChangeKind::Component => with_total_column(&demand, &total, config)?,
            ChangeKind::TotalFinalUse => with_total_column(baseline_fd, &total, config)?,
        };

        let percent_base = match self.options.percent_change_base {
            PercentChangeBase::Baseline => &base,
            PercentChangeBase::Scenario => &demand,
        };
        let percent_change = PercentChangeMatrix::compute(&output_by_category, percent_base);
        let undefined = percent_change.undefined_cells().len();
        if undefined > 0 {
            debug!(undefined, "percent change has cells with a zero base");
        }

        info!(?kind, applied = changes.len() - skipped.len(), skipped = skipped.len(), "scenario evaluated");
        Ok(ScenarioResult {
            kind,
            technical_coefficients: Arc::clone(coefficients),
            leontief_inverse: Arc::clone(snapshot.leontief_inverse()),
            multipliers: Arc::clone(snapshot.multipliers()),
            io_matrix: Arc::clone(snapshot.combined_matrix()),
            new_intermediate_consumption,
            modified_final_demand,
            output_by_category,
            new_output,
            percent_change,
            skipped_changes: skipped,
        })
    }

    fn locate_sector(&self, sectors: &Labels, change: &ScenarioChange) -> Result<Option<usize>, EngineError> {
        match sectors.position(&change.sector) {
            Some(i) => Ok(Some(i)),
            None => self.unknown(change, EngineError::UnknownSector(change.sector.clone())),
        }
    }

    fn locate_cell(&self, demand: &LabeledMatrix, change: &ScenarioChange) -> Result<Option<(usize, usize)>, EngineError> {
        let Some(i) = self.locate_sector(demand.row_labels(), change)? else {
            return Ok(None);
        };
        match demand.col_labels().position(&change.demand) {
            Some(j) => Ok(Some((i, j))),
            None => self.unknown(change, EngineError::UnknownDemandCategory(change.demand.clone())),
        }
    }

    fn unknown<T>(&self, change: &ScenarioChange, err: EngineError) -> Result<Option<T>, EngineError> {
        if !self.options.lenient_labels {
            return Err(err);
        }
        warn!(sector = %change.sector, demand = %change.demand, "skipping change with unknown label: {}", err);
        Ok(None)
    }
}

/// Appends a total-final-use column. A matrix that already is a lone
/// total-final-use column is replaced by `total`.
fn with_total_column(fd: &LabeledMatrix, total: &LabeledVector, config: &EngineConfig) -> Result<LabeledMatrix, EngineError> {
    let label = config.total_final_use_label.as_str();
    let is_total_only = fd.ncols() == 1 && fd.col_labels().get(0).is_some_and(|c| config.is_total_final_use(c));
    if is_total_only {
        LabeledMatrix::from_column(label, total)
    } else {
        fd.with_column(label, total)
    }
}
