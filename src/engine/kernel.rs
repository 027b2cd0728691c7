//! Numeric kernels of the input-output pipeline.
//!
//! All functions work on plain `nalgebra` storage; labels are attached by the caller.
use crate::config::CoefficientBasis;
use crate::error::EngineError;
use nalgebra::{DMatrix, DVector};

/// Total output of each sector: the row sums of the combined IO matrix.
pub(crate) fn row_sums(m: &DMatrix<f64>) -> DVector<f64> {
    DVector::from_iterator(m.nrows(), m.row_iter().map(|r| r.sum()))
}

pub(crate) fn column_sums(m: &DMatrix<f64>) -> Vec<f64> {
    m.column_iter().map(|c| c.sum()).collect()
}

#[inline]
fn coefficient(flow: f64, output: f64) -> f64 {
    // A sector with zero output gets zero coefficients instead of NaN.
    if output == 0.0 { 0.0 } else { flow / output }
}

/// A = Z / x, with the dividing sector chosen by `basis`.
pub(crate) fn technical_coefficients(
    ic: &DMatrix<f64>,
    total_output: &DVector<f64>,
    basis: CoefficientBasis,
) -> DMatrix<f64> {
    let n = ic.nrows();
    DMatrix::from_fn(n, n, |i, j| match basis {
        CoefficientBasis::PurchaserOutput => coefficient(ic[(i, j)], total_output[j]),
        CoefficientBasis::ProducerOutput => coefficient(ic[(i, j)], total_output[i]),
    })
}

/// Inverse of the technical coefficients: Z = A * x, scaled the same way the
/// coefficients were divided.
pub(crate) fn scale_by_output(a: &DMatrix<f64>, output: &DVector<f64>, basis: CoefficientBasis) -> DMatrix<f64> {
    let n = a.nrows();
    DMatrix::from_fn(n, n, |i, j| match basis {
        CoefficientBasis::PurchaserOutput => a[(i, j)] * output[j],
        CoefficientBasis::ProducerOutput => a[(i, j)] * output[i],
    })
}

/// (I - A)^-1 via LU decomposition.
///
/// Fails with `SingularMatrix` when the smallest pivot is negligible relative
/// to the largest (ratio at or below `tolerance`), and with `NumericOverflow`
/// when the inverse is not finite.
pub(crate) fn leontief_inverse(a: &DMatrix<f64>, tolerance: f64) -> Result<DMatrix<f64>, EngineError> {
    let n = a.nrows();
    let system = DMatrix::<f64>::identity(n, n) - a;
    let lu = system.lu();

    let pivots = lu.u().diagonal();
    let (smallest, largest) = (pivots.amin(), pivots.amax());
    let ratio = smallest / largest;
    // Written so that a NaN ratio also counts as singular.
    if !(ratio > tolerance) {
        return Err(EngineError::SingularMatrix {
            reason: format!("pivot ratio {:e} is not above tolerance {:e}", ratio, tolerance),
        });
    }

    let inverse = lu.try_inverse().ok_or_else(|| EngineError::SingularMatrix {
        reason: "LU factorisation could not be inverted".into(),
    })?;
    if inverse.iter().any(|v| !v.is_finite()) {
        return Err(EngineError::NumericOverflow { artifact: "leontief inverse" });
    }
    Ok(inverse)
}

/// Elementwise (new - base) / base * 100. Cells with a zero base are `None`.
pub(crate) fn percent_change(new: &DMatrix<f64>, base: &DMatrix<f64>) -> Vec<Vec<Option<f64>>> {
    debug_assert_eq!(new.shape(), base.shape());
    (0..new.nrows())
        .map(|i| {
            (0..new.ncols())
                .map(|j| {
                    let b = base[(i, j)];
                    if b == 0.0 {
                        return None;
                    }
                    let pct = (new[(i, j)] - b) / b * 100.0;
                    pct.is_finite().then_some(pct)
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn sample_ic() -> DMatrix<f64> {
        DMatrix::from_row_slice(3, 3, &[50.0, 200.0, 100.0, 100.0, 300.0, 150.0, 25.0, 150.0, 200.0])
    }

    fn sample_output() -> DVector<f64> {
        DVector::from_vec(vec![750.0, 1050.0, 675.0])
    }

    #[test]
    fn test_producer_basis_divides_rows() {
        let a = technical_coefficients(&sample_ic(), &sample_output(), CoefficientBasis::ProducerOutput);
        assert!((a[(0, 0)] - 50.0 / 750.0).abs() < 1e-15);
        assert!((a[(0, 1)] - 200.0 / 750.0).abs() < 1e-15);
        assert!((a[(0, 2)] - 100.0 / 750.0).abs() < 1e-15);
    }

    #[test]
    fn test_purchaser_basis_divides_columns() {
        let a = technical_coefficients(&sample_ic(), &sample_output(), CoefficientBasis::PurchaserOutput);
        assert!((a[(0, 1)] - 200.0 / 1050.0).abs() < 1e-15);
        assert!((a[(2, 2)] - 200.0 / 675.0).abs() < 1e-15);
    }

    #[test]
    fn test_zero_output_sector_gets_zero_coefficients() {
        let ic = DMatrix::from_row_slice(2, 2, &[10.0, 0.0, 0.0, 0.0]);
        let x = DVector::from_vec(vec![15.0, 0.0]);
        let a = technical_coefficients(&ic, &x, CoefficientBasis::PurchaserOutput);
        assert!(a.iter().all(|v| v.is_finite()));
        assert_eq!(a[(1, 1)], 0.0);
    }

    #[test]
    fn test_zero_output_purchaser_with_inputs_gets_zero_column() {
        // Sector 1 buys 5 from sector 0 but has no output of its own.
        let ic = DMatrix::from_row_slice(2, 2, &[10.0, 5.0, 0.0, 0.0]);
        let x = DVector::from_vec(vec![35.0, 0.0]);
        let a = technical_coefficients(&ic, &x, CoefficientBasis::PurchaserOutput);
        assert_eq!(a[(0, 1)], 0.0);
        assert_eq!(a[(1, 1)], 0.0);
        assert!((a[(0, 0)] - 10.0 / 35.0).abs() < 1e-15);
    }

    #[test]
    fn test_zero_output_producer_row_gets_zero_row() {
        // Row 1 nets to zero output through a negative flow.
        let ic = DMatrix::from_row_slice(2, 2, &[10.0, 0.0, 4.0, -4.0]);
        let x = DVector::from_vec(vec![20.0, 0.0]);
        let a = technical_coefficients(&ic, &x, CoefficientBasis::ProducerOutput);
        assert_eq!(a[(1, 0)], 0.0);
        assert_eq!(a[(1, 1)], 0.0);
        assert!((a[(0, 0)] - 0.5).abs() < 1e-15);
    }

    #[rstest]
    #[case(CoefficientBasis::PurchaserOutput)]
    #[case(CoefficientBasis::ProducerOutput)]
    fn test_scaling_undoes_coefficients(#[case] basis: CoefficientBasis) {
        let a = technical_coefficients(&sample_ic(), &sample_output(), basis);
        let z = scale_by_output(&a, &sample_output(), basis);
        assert!((z - sample_ic()).amax() < 1e-9);
    }

    #[test]
    fn test_inverse_of_zero_coefficients_is_identity() {
        let inv = leontief_inverse(&DMatrix::zeros(3, 3), 1e-12).unwrap();
        assert_eq!(inv, DMatrix::identity(3, 3));
    }

    #[test]
    fn test_singular_system_detected() {
        // Columns of A sum to one, so 1^T (I - A) = 0.
        let a = DMatrix::from_row_slice(2, 2, &[1.0 / 3.0, 2.0 / 3.0, 2.0 / 3.0, 1.0 / 3.0]);
        assert!(matches!(leontief_inverse(&a, 1e-12), Err(EngineError::SingularMatrix { .. })));
    }

    #[test]
    fn test_inverse_times_system_is_identity() {
        let a = technical_coefficients(&sample_ic(), &sample_output(), CoefficientBasis::PurchaserOutput);
        let inv = leontief_inverse(&a, 1e-12).unwrap();
        let product = (DMatrix::<f64>::identity(3, 3) - &a) * inv;
        assert!((product - DMatrix::<f64>::identity(3, 3)).amax() < 1e-12);
    }

    #[test]
    fn test_percent_change_marks_zero_base() {
        let new = DMatrix::from_row_slice(2, 1, &[110.0, 5.0]);
        let base = DMatrix::from_row_slice(2, 1, &[100.0, 0.0]);
        let pct = percent_change(&new, &base);
        assert!((pct[0][0].unwrap() - 10.0).abs() < 1e-12);
        assert_eq!(pct[1][0], None);
    }
}
