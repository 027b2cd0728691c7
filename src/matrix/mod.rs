//! Labeled matrix types shared by the engine and the scenario evaluator.
pub mod align;
pub mod labeled;
pub mod labels;

pub use align::align_rows;
pub use labeled::{LabeledMatrix, LabeledVector, TableData, VectorData};
pub use labels::Labels;
