//! Many final-demand scenarios against one shared Leontief inverse.
use crate::engine::{EngineSnapshot, MatrixEngine};
use crate::error::EngineError;
use crate::matrix::{LabeledMatrix, LabeledVector};
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioOutput {
    /// 1-based position in the input batch.
    pub scenario: usize,
    pub final_demand: LabeledMatrix,
    pub total_output: LabeledVector,
    /// Total output minus the baseline total final use, per sector.
    pub output_change: LabeledVector,
}

/// Derives the inverse once (or reuses the cached one) and evaluates every
/// scenario against it. Results keep the input order.
pub fn calculate_output_scenarios(
    engine: &mut MatrixEngine,
    scenarios: &[LabeledMatrix],
) -> Result<Vec<ScenarioOutput>, EngineError> {
    let snapshot = engine.snapshot()?;
    snapshot_output_scenarios(&snapshot, scenarios)
}

pub fn snapshot_output_scenarios(
    snapshot: &EngineSnapshot,
    scenarios: &[LabeledMatrix],
) -> Result<Vec<ScenarioOutput>, EngineError> {
    let baseline = snapshot.total_final_use();

    let results = scenarios
        .par_iter()
        .enumerate()
        .map(|(i, fd)| -> Result<ScenarioOutput, EngineError> {
            let total_output = snapshot.compute_output(fd)?;
            let change = total_output.values().iter().zip(baseline.values()).map(|(x, y)| x - y).collect();
            Ok(ScenarioOutput {
                scenario: i + 1,
                final_demand: fd.clone(),
                output_change: LabeledVector::from_parts(baseline.labels().clone(), change),
                total_output,
            })
        })
        .collect::<Result<Vec<_>, EngineError>>()?;

    info!(scenarios = results.len(), "calculated output scenarios using shared matrices");
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::sample;

    fn engine() -> MatrixEngine {
        let (ic, fd) = sample::three_sector().unwrap();
        MatrixEngine::new(ic, fd, EngineConfig::default()).unwrap()
    }

    fn scaled(fd: &LabeledMatrix, factor: f64) -> LabeledMatrix {
        let rows = fd.to_rows().into_iter().map(|r| r.into_iter().map(|v| v * factor).collect()).collect();
        LabeledMatrix::new(rows, fd.row_labels().as_slice().to_vec(), fd.col_labels().as_slice().to_vec()).unwrap()
    }

    #[test]
    fn test_single_inversion_for_many_scenarios() {
        let mut e = engine();
        let fd = e.get_final_demand();
        let scenarios: Vec<LabeledMatrix> = (1..=16).map(|k| scaled(&fd, k as f64 / 4.0)).collect();

        let results = calculate_output_scenarios(&mut e, &scenarios).unwrap();
        assert_eq!(results.len(), 16);
        assert_eq!(e.stats().leontief_inverse, 1);
        assert_eq!(e.stats().technical_coefficients, 1);
        assert!(results.iter().enumerate().all(|(i, r)| r.scenario == i + 1));

        calculate_output_scenarios(&mut e, &scenarios).unwrap();
        assert_eq!(e.stats().leontief_inverse, 1);
    }

    #[test]
    fn test_baseline_change_is_intermediate_use() {
        let mut e = engine();
        let fd = LabeledMatrix::clone(&e.get_final_demand());
        let results = calculate_output_scenarios(&mut e, &[fd]).unwrap();
        let change = &results[0].output_change;
        for (got, expected) in change.values().iter().zip([350.0, 550.0, 375.0]) {
            assert!((got - expected).abs() < 1e-9, "{} vs {}", got, expected);
        }
    }

    #[test]
    fn test_scenario_output_is_linear_in_demand() {
        let mut e = engine();
        let fd = e.get_final_demand();
        let results = calculate_output_scenarios(&mut e, &[scaled(&fd, 1.0), scaled(&fd, 2.0)]).unwrap();
        for (x1, x2) in results[0].total_output.values().iter().zip(results[1].total_output.values()) {
            assert!((x2 - 2.0 * x1).abs() < 1e-9 * x2.abs());
        }
    }

    #[test]
    fn test_one_bad_scenario_fails_the_batch() {
        let mut e = engine();
        let wrong = LabeledMatrix::from_rows(vec![vec![1.0], vec![2.0], vec![3.0]]).unwrap();
        let baseline = LabeledMatrix::clone(&e.get_final_demand());
        let result = calculate_output_scenarios(&mut e, &[baseline, wrong]);
        assert!(matches!(result, Err(EngineError::LabelMismatch { .. })));
    }
}
