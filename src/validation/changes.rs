//! Checks on a batch of scenario changes, run before the engine is touched.
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::scenario::{ChangeKind, ScenarioChange};
use std::collections::HashSet;

/// Validates a change batch and returns its homogeneity class.
pub fn validate_changes(changes: &[ScenarioChange], config: &EngineConfig) -> Result<ChangeKind, EngineError> {
    if changes.is_empty() {
        return Err(EngineError::EmptyChangeSet);
    }

    let mut seen = HashSet::with_capacity(changes.len());
    let mut total_final_use = 0usize;

    for (i, change) in changes.iter().enumerate() {
        if !change.value.is_finite() {
            return Err(EngineError::NonNumericData {
                matrix: "scenario changes".into(),
                row: i,
                col: 0,
                value: change.value,
            });
        }
        if change.value < 0.0 {
            return Err(EngineError::NegativeChangeValue {
                sector: change.sector.clone(),
                demand: change.demand.clone(),
                value: change.value,
            });
        }

        let is_total = config.is_total_final_use(&change.demand);
        // Both spellings of the sentinel address the same cell.
        let demand_key = if is_total { config.total_final_use_label.as_str() } else { change.demand.as_str() };
        if !seen.insert((change.sector.as_str(), demand_key)) {
            return Err(EngineError::DuplicateChange {
                sector: change.sector.clone(),
                demand: change.demand.clone(),
            });
        }
        if is_total {
            total_final_use += 1;
        }
    }

    match total_final_use {
        0 => Ok(ChangeKind::Component),
        n if n == changes.len() => Ok(ChangeKind::TotalFinalUse),
        _ => Err(EngineError::MixedChangeTypes),
    }
}
