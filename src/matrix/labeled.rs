//! Dense matrices and vectors keyed by row and column labels.
use super::labels::Labels;
use crate::error::EngineError;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

/// The tabular boundary form `{data, row_labels, column_labels}` handed over
/// by data sources and persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableData {
    pub data: Vec<Vec<f64>>,
    pub row_labels: Vec<String>,
    pub column_labels: Vec<String>,
}

/// A dense matrix of finite reals with unique row and column labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TableData", into = "TableData")]
pub struct LabeledMatrix {
    row_labels: Labels,
    col_labels: Labels,
    data: DMatrix<f64>,
}

impl LabeledMatrix {
    pub fn new(
        rows: Vec<Vec<f64>>,
        row_labels: Vec<String>,
        col_labels: Vec<String>,
    ) -> Result<Self, EngineError> {
        let row_labels = Labels::new(row_labels)?;
        let col_labels = Labels::new(col_labels)?;
        if rows.is_empty() || col_labels.is_empty() {
            return Err(EngineError::EmptyMatrix { matrix: "matrix".into() });
        }
        if rows.len() != row_labels.len() {
            return Err(EngineError::mismatch(format!(
                "{} rows but {} row labels",
                rows.len(),
                row_labels.len()
            )));
        }
        let ncols = col_labels.len();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != ncols {
                return Err(EngineError::mismatch(format!(
                    "row {} has {} values, expected {}",
                    i,
                    row.len(),
                    ncols
                )));
            }
            if let Some((j, &value)) = row.iter().enumerate().find(|(_, v)| !v.is_finite()) {
                return Err(EngineError::NonNumericData { matrix: "matrix".into(), row: i, col: j, value });
            }
        }
        let data = DMatrix::from_fn(rows.len(), ncols, |i, j| rows[i][j]);
        Ok(Self { row_labels, col_labels, data })
    }

    /// Builds a matrix from unlabeled rows with positional labels.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, EngineError> {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, Vec::len);
        let row_labels = Labels::indexed(nrows).into();
        let col_labels = Labels::indexed(ncols).into();
        Self::new(rows, row_labels, col_labels)
    }

    /// Assembles a derived matrix. Callers guarantee the shape matches the labels.
    pub(crate) fn from_parts(row_labels: Labels, col_labels: Labels, data: DMatrix<f64>) -> Self {
        debug_assert_eq!(data.shape(), (row_labels.len(), col_labels.len()));
        Self { row_labels, col_labels, data }
    }

    pub fn nrows(&self) -> usize { self.data.nrows() }
    pub fn ncols(&self) -> usize { self.data.ncols() }
    pub fn shape(&self) -> (usize, usize) { self.data.shape() }
    pub fn row_labels(&self) -> &Labels { &self.row_labels }
    pub fn col_labels(&self) -> &Labels { &self.col_labels }
    pub fn data(&self) -> &DMatrix<f64> { &self.data }

    #[inline]
    pub fn value(&self, row: usize, col: usize) -> f64 {
        self.data[(row, col)]
    }

    pub fn get(&self, row: &str, col: &str) -> Option<f64> {
        Some(self.data[(self.row_labels.position(row)?, self.col_labels.position(col)?)])
    }

    pub(crate) fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[(row, col)] = value;
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.data.row_iter().map(|r| r.iter().copied().collect()).collect()
    }

    /// Sum of each row, keyed by row label.
    pub fn row_sums(&self) -> LabeledVector {
        let values = self.data.row_iter().map(|r| r.sum()).collect();
        LabeledVector::from_parts(self.row_labels.clone(), values)
    }

    /// Sum of each column, keyed by column label.
    pub fn column_sums(&self) -> LabeledVector {
        let values = self.data.column_iter().map(|c| c.sum()).collect();
        LabeledVector::from_parts(self.col_labels.clone(), values)
    }

    /// Column-wise concatenation. Both matrices must share the same row labels
    /// in the same order.
    pub fn hconcat(&self, other: &LabeledMatrix) -> Result<LabeledMatrix, EngineError> {
        if self.row_labels != other.row_labels {
            return Err(EngineError::mismatch("cannot concatenate matrices with different row order"));
        }
        let col_labels = self.col_labels.concat(&other.col_labels)?;
        let (n, left) = self.shape();
        let data = DMatrix::from_fn(n, left + other.ncols(), |i, j| {
            if j < left { self.data[(i, j)] } else { other.data[(i, j - left)] }
        });
        Ok(Self::from_parts(self.row_labels.clone(), col_labels, data))
    }

    /// Appends one column.
    pub fn with_column(&self, label: &str, column: &LabeledVector) -> Result<LabeledMatrix, EngineError> {
        if column.labels() != &self.row_labels {
            return Err(EngineError::mismatch("appended column is not aligned with the matrix rows"));
        }
        let col_labels = self.col_labels.concat(&Labels::new(vec![label.to_string()])?)?;
        let (n, m) = self.shape();
        let data = DMatrix::from_fn(n, m + 1, |i, j| if j < m { self.data[(i, j)] } else { column.values()[i] });
        Ok(Self::from_parts(self.row_labels.clone(), col_labels, data))
    }

    /// A single-column matrix holding `vector`.
    pub fn from_column(label: &str, vector: &LabeledVector) -> Result<LabeledMatrix, EngineError> {
        let col_labels = Labels::new(vec![label.to_string()])?;
        let data = DMatrix::from_column_slice(vector.len(), 1, vector.values());
        Ok(Self::from_parts(vector.labels().clone(), col_labels, data))
    }

    /// Relabels the matrix into the row order of `labels`. Rows absent from
    /// `self` are filled with `fill`; rows absent from `labels` are dropped.
    pub(crate) fn reindex_rows(&self, labels: &Labels, fill: f64) -> LabeledMatrix {
        let data = DMatrix::from_fn(labels.len(), self.ncols(), |i, j| {
            let label = labels.as_slice()[i].as_str();
            self.row_labels.position(label).map_or(fill, |src| self.data[(src, j)])
        });
        Self::from_parts(labels.clone(), self.col_labels.clone(), data)
    }

    /// Keeps only the columns at `keep`, in that order.
    pub(crate) fn select_columns(&self, keep: &[usize]) -> LabeledMatrix {
        let col_labels = self.col_labels.subset(keep);
        let data = DMatrix::from_fn(self.nrows(), keep.len(), |i, k| self.data[(i, keep[k])]);
        Self::from_parts(self.row_labels.clone(), col_labels, data)
    }

    pub(crate) fn first_non_finite(&self) -> Option<(usize, usize, f64)> {
        let (n, m) = self.shape();
        (0..n)
            .flat_map(|i| (0..m).map(move |j| (i, j)))
            .map(|(i, j)| (i, j, self.data[(i, j)]))
            .find(|(_, _, v)| !v.is_finite())
    }
}

impl TryFrom<TableData> for LabeledMatrix {
    type Error = EngineError;
    fn try_from(table: TableData) -> Result<Self, Self::Error> {
        LabeledMatrix::new(table.data, table.row_labels, table.column_labels)
    }
}

impl From<LabeledMatrix> for TableData {
    fn from(m: LabeledMatrix) -> Self {
        TableData {
            data: m.to_rows(),
            row_labels: m.row_labels.into(),
            column_labels: m.col_labels.into(),
        }
    }
}

/// Serialized form of a [`LabeledVector`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorData {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

/// A vector of reals keyed by label (sector totals, demand vectors).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "VectorData", into = "VectorData")]
pub struct LabeledVector {
    labels: Labels,
    values: Vec<f64>,
}

impl LabeledVector {
    pub fn new(labels: Vec<String>, values: Vec<f64>) -> Result<Self, EngineError> {
        let labels = Labels::new(labels)?;
        if labels.len() != values.len() {
            return Err(EngineError::mismatch(format!(
                "{} labels but {} values",
                labels.len(),
                values.len()
            )));
        }
        if let Some((i, &value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(EngineError::NonNumericData { matrix: "vector".into(), row: i, col: 0, value });
        }
        Ok(Self { labels, values })
    }

    pub(crate) fn from_parts(labels: Labels, values: Vec<f64>) -> Self {
        debug_assert_eq!(labels.len(), values.len());
        Self { labels, values }
    }

    pub(crate) fn from_dvector(labels: Labels, values: &DVector<f64>) -> Self {
        Self::from_parts(labels, values.iter().copied().collect())
    }

    pub fn len(&self) -> usize { self.values.len() }
    pub fn is_empty(&self) -> bool { self.values.is_empty() }
    pub fn labels(&self) -> &Labels { &self.labels }
    pub fn values(&self) -> &[f64] { &self.values }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.labels.position(label).map(|i| self.values[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.labels.iter().zip(self.values.iter().copied())
    }

    pub(crate) fn to_dvector(&self) -> DVector<f64> {
        DVector::from_column_slice(&self.values)
    }
}

impl TryFrom<VectorData> for LabeledVector {
    type Error = EngineError;
    fn try_from(raw: VectorData) -> Result<Self, Self::Error> {
        LabeledVector::new(raw.labels, raw.values)
    }
}

impl From<LabeledVector> for VectorData {
    fn from(v: LabeledVector) -> Self {
        VectorData { labels: v.labels.into(), values: v.values }
    }
}
