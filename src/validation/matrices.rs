//! Checks on the (intermediate consumption, final demand) input pair.
use crate::error::EngineError;
use crate::matrix::LabeledMatrix;
use tracing::debug;

pub const INTERMEDIATE_CONSUMPTION: &str = "intermediate consumption";
pub const FINAL_DEMAND: &str = "final demand";

/// Builds a named input matrix, attributing shape and value errors to it.
pub fn build_matrix(
    name: &str,
    rows: Vec<Vec<f64>>,
    row_labels: Vec<String>,
    col_labels: Vec<String>,
) -> Result<LabeledMatrix, EngineError> {
    LabeledMatrix::new(rows, row_labels, col_labels).map_err(|e| e.in_matrix(name))
}

/// Validates an input pair before it is handed to the engine.
///
/// Row labels of the final demand matrix are not compared here: alignment
/// happens when the combined matrix is derived.
pub fn validate_inputs(ic: &LabeledMatrix, fd: &LabeledMatrix) -> Result<(), EngineError> {
    let (ic_rows, ic_cols) = ic.shape();
    let (fd_rows, fd_cols) = fd.shape();

    if ic_rows != fd_rows {
        return Err(EngineError::mismatch(format!(
            "Intermediate consumption matrix rows ({}) must equal final demand matrix rows ({})",
            ic_rows, fd_rows
        )));
    }
    if ic_rows != ic_cols {
        return Err(EngineError::mismatch(format!(
            "Intermediate consumption matrix must be square. Got {}x{}",
            ic_rows, ic_cols
        )));
    }
    if ic.row_labels() != ic.col_labels() {
        return Err(EngineError::LabelMismatch {
            missing: ic.row_labels().difference(ic.col_labels()),
            unexpected: ic.col_labels().difference(ic.row_labels()),
        });
    }
    // Both column sets end up side by side in the combined matrix.
    if let Some(label) = fd.col_labels().iter().find(|c| ic.col_labels().contains(c)) {
        return Err(EngineError::DuplicateLabel { label: label.to_string() });
    }

    for (name, matrix) in [(INTERMEDIATE_CONSUMPTION, ic), (FINAL_DEMAND, fd)] {
        if let Some((row, col, value)) = matrix.first_non_finite() {
            return Err(EngineError::NonNumericData { matrix: name.to_string(), row, col, value });
        }
    }

    debug!(ic_shape = ?(ic_rows, ic_cols), fd_shape = ?(fd_rows, fd_cols), "matrix dimensions validated");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn rows(n: usize, m: usize) -> Vec<Vec<f64>> {
        vec![vec![1.0; m]; n]
    }

    #[rstest]
    #[case(2, 2, 3, 1)]
    #[case(2, 3, 2, 1)]
    fn test_incompatible_shapes(#[case] ic_n: usize, #[case] ic_m: usize, #[case] fd_n: usize, #[case] fd_m: usize) {
        let ic = LabeledMatrix::from_rows(rows(ic_n, ic_m)).unwrap();
        let fd = LabeledMatrix::from_rows(rows(fd_n, fd_m)).unwrap();
        assert!(matches!(validate_inputs(&ic, &fd), Err(EngineError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_consumption_labels_must_match_on_both_axes() {
        let ic = LabeledMatrix::new(
            rows(2, 2),
            vec!["a".into(), "b".into()],
            vec!["a".into(), "c".into()],
        )
        .unwrap();
        let fd = LabeledMatrix::new(rows(2, 1), vec!["a".into(), "b".into()], vec!["x".into()]).unwrap();
        assert_eq!(
            validate_inputs(&ic, &fd).unwrap_err(),
            EngineError::LabelMismatch { missing: vec!["b".into()], unexpected: vec!["c".into()] }
        );
    }

    #[test]
    fn test_build_matrix_names_the_source() {
        let err = build_matrix(FINAL_DEMAND, vec![vec![f64::NAN]], vec!["a".into()], vec!["x".into()]).unwrap_err();
        assert!(matches!(err, EngineError::NonNumericData { ref matrix, .. } if matrix == FINAL_DEMAND));
        let err = build_matrix(FINAL_DEMAND, vec![], vec![], vec!["x".into()]).unwrap_err();
        assert_eq!(err, EngineError::EmptyMatrix { matrix: FINAL_DEMAND.into() });
    }

    #[test]
    fn test_valid_pair_passes() {
        let ic = LabeledMatrix::from_rows(rows(3, 3)).unwrap();
        let fd = LabeledMatrix::new(rows(3, 2), ic.row_labels().as_slice().to_vec(), vec!["fd_0".into(), "fd_1".into()])
            .unwrap();
        assert!(validate_inputs(&ic, &fd).is_ok());
    }

    #[test]
    fn test_demand_category_colliding_with_sector_rejected() {
        let ic = LabeledMatrix::from_rows(rows(2, 2)).unwrap();
        let fd = LabeledMatrix::from_rows(rows(2, 1)).unwrap();
        assert_eq!(validate_inputs(&ic, &fd), Err(EngineError::DuplicateLabel { label: "0".into() }));
    }
}
