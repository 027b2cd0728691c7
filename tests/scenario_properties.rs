use leontief_core::scenario::snapshot_output_scenarios;
use leontief_core::{
    CoefficientBasis, EngineConfig, EngineError, LabeledMatrix, MatrixEngine, PercentChangeBase, ScenarioChange,
    ScenarioEvaluator,
};
use proptest::prelude::*;
use std::io::Write;
use std::sync::Arc;

/// Productive economies: intermediate flows are small next to final demand,
/// so every column of A sums well below one.
fn economy() -> impl Strategy<Value = (Vec<Vec<f64>>, Vec<Vec<f64>>)> {
    (1usize..=6, 1usize..=3).prop_flat_map(|(n, k)| {
        (
            prop::collection::vec(prop::collection::vec(0.0f64..100.0, n), n),
            prop::collection::vec(prop::collection::vec(1000.0f64..5000.0, k), n),
        )
    })
}

fn relative_close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * b.abs().max(1.0)
}

proptest! {
    #[test]
    fn prop_artifact_shapes((ic, fd) in economy()) {
        let n = ic.len();
        let k = fd[0].len();
        let mut engine = MatrixEngine::from_lists(ic, fd, None).unwrap();
        prop_assert_eq!(engine.get_combined_matrix().unwrap().shape(), (n, n + k));
        prop_assert_eq!(engine.get_technical_coefficients().unwrap().shape(), (n, n));
        prop_assert_eq!(engine.get_leontief_inverse().unwrap().shape(), (n, n));
        prop_assert_eq!(engine.get_multipliers().unwrap().output().len(), n);
    }

    #[test]
    fn prop_round_trip_reproduces_total_output((ic, fd) in economy()) {
        let mut engine = MatrixEngine::from_lists(ic, fd, None).unwrap();
        let demand = engine.get_final_demand();
        let output = engine.compute_output(&demand).unwrap();
        let total = engine.get_total_output().unwrap();
        for (x, expected) in output.values().iter().zip(total.values()) {
            prop_assert!(relative_close(*x, *expected), "{} vs {}", x, expected);
        }
    }

    #[test]
    fn prop_multipliers_at_least_one((ic, fd) in economy()) {
        let mut engine = MatrixEngine::from_lists(ic, fd, None).unwrap();
        let multipliers = engine.get_multipliers().unwrap();
        prop_assert!(multipliers.output().iter().all(|m| *m >= 1.0 - 1e-12));
        prop_assert_eq!(multipliers.output(), multipliers.type_i());
    }

    #[test]
    fn prop_getters_are_reference_stable((ic, fd) in economy()) {
        let mut engine = MatrixEngine::from_lists(ic, fd, None).unwrap();
        let a = engine.get_technical_coefficients().unwrap();
        let l = engine.get_leontief_inverse().unwrap();
        prop_assert!(Arc::ptr_eq(&a, &engine.get_technical_coefficients().unwrap()));
        prop_assert!(Arc::ptr_eq(&l, &engine.get_leontief_inverse().unwrap()));
        prop_assert_eq!(engine.stats().leontief_inverse, 1);
    }

    #[test]
    fn prop_batch_scenarios_share_one_inversion((ic, fd) in economy(), copies in 1usize..8) {
        let mut engine = MatrixEngine::from_lists(ic, fd, None).unwrap();
        let demand = LabeledMatrix::clone(&engine.get_final_demand());
        let snapshot = engine.snapshot().unwrap();
        let results = snapshot_output_scenarios(&snapshot, &vec![demand; copies]).unwrap();
        prop_assert_eq!(results.len(), copies);
        prop_assert_eq!(engine.stats().leontief_inverse, 1);
    }
}

#[test]
fn replace_data_recomputes_consistently() {
    let mut engine =
        MatrixEngine::from_lists(vec![vec![10.0, 20.0], vec![30.0, 40.0]], vec![vec![100.0], vec![200.0]], None)
            .unwrap();
    let before = engine.get_leontief_inverse().unwrap();

    let fd = LabeledMatrix::new(
        vec![vec![150.0], vec![250.0]],
        vec!["0".into(), "1".into()],
        vec!["fd_0".into()],
    )
    .unwrap();
    engine.replace_data(None, Some(fd.clone())).unwrap();

    let after = engine.get_leontief_inverse().unwrap();
    assert!(!Arc::ptr_eq(&before, &after));
    assert_eq!(engine.get_total_output().unwrap().values(), &[180.0, 320.0]);
    let output = engine.compute_output(&fd).unwrap();
    assert!(relative_close(output.values()[0], 180.0));
    assert!(relative_close(output.values()[1], 320.0));
}

#[test]
fn config_loaded_from_disk_drives_the_engine() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"coefficient_basis": "producer_output", "scenario": {{"percent_change_base": "scenario"}}}}"#
    )
    .unwrap();

    let config = EngineConfig::from_path(file.path()).unwrap();
    assert_eq!(config.coefficient_basis, CoefficientBasis::ProducerOutput);
    assert_eq!(config.scenario.percent_change_base, PercentChangeBase::Scenario);

    let record = leontief_core::sample::three_sector_record();
    let mut engine = MatrixEngine::from_record(&record, config.clone()).unwrap();
    let a = engine.get_technical_coefficients().unwrap();
    assert!((a.value(0, 1) - 200.0 / 750.0).abs() < 1e-12);

    let evaluator = ScenarioEvaluator::from_config(&config);
    let result = evaluator
        .apply_changes(&mut engine, &[ScenarioChange::new("Agriculture", "total_final_use", 0.0)])
        .unwrap();
    assert_eq!(result.percent_change.get("Agriculture", "total_final_use"), None);
}

#[test]
fn malformed_config_file_is_a_config_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"singular_tolerance": "tiny"}}"#).unwrap();
    assert!(matches!(EngineConfig::from_path(file.path()), Err(EngineError::Config(_))));
}
