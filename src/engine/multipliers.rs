use crate::matrix::{LabeledMatrix, Labels};
use serde::Serialize;

/// Economy-wide output effect of one unit of final demand per sector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Multipliers {
    sectors: Labels,
    output: Vec<f64>,
    /// Direct plus indirect effects. No income or labour closure is modelled,
    /// so this equals `output`.
    type_i: Vec<f64>,
    matrix_shape: (usize, usize),
}

impl Multipliers {
    /// Column sums of the Leontief inverse.
    pub(crate) fn from_inverse(inverse: &LabeledMatrix) -> Self {
        let output = super::kernel::column_sums(inverse.data());
        Self {
            sectors: inverse.col_labels().clone(),
            type_i: output.clone(),
            output,
            matrix_shape: inverse.shape(),
        }
    }

    pub fn sectors(&self) -> &Labels { &self.sectors }
    pub fn output(&self) -> &[f64] { &self.output }
    pub fn type_i(&self) -> &[f64] { &self.type_i }
    pub fn matrix_shape(&self) -> (usize, usize) { self.matrix_shape }

    pub fn get(&self, sector: &str) -> Option<f64> {
        self.sectors.position(sector).map(|i| self.output[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.sectors.iter().zip(self.output.iter().copied())
    }
}
