//! Row alignment of a matrix to a sector order.
use super::labeled::LabeledMatrix;
use super::labels::Labels;
use crate::config::AlignmentPolicy;
use crate::error::EngineError;
use std::borrow::Cow;
use tracing::{debug, warn};

/// Returns `matrix` with its rows in the order of `sectors`.
///
/// Under [`AlignmentPolicy::Strict`] the row labels must be the same set as
/// `sectors`. Under [`AlignmentPolicy::FillMissing`] missing sectors get zero
/// rows and rows for unknown sectors are dropped.
pub fn align_rows<'a>(
    matrix: &'a LabeledMatrix,
    sectors: &Labels,
    policy: AlignmentPolicy,
) -> Result<Cow<'a, LabeledMatrix>, EngineError> {
    if matrix.row_labels() == sectors {
        return Ok(Cow::Borrowed(matrix));
    }

    let missing = sectors.difference(matrix.row_labels());
    let unexpected = matrix.row_labels().difference(sectors);

    if missing.is_empty() && unexpected.is_empty() {
        debug!(rows = sectors.len(), "reordering rows to sector order");
        return Ok(Cow::Owned(matrix.reindex_rows(sectors, 0.0)));
    }

    match policy {
        AlignmentPolicy::Strict => Err(EngineError::LabelMismatch { missing, unexpected }),
        AlignmentPolicy::FillMissing => {
            warn!(?missing, ?unexpected, "row labels differ from sectors, reindexing with zero fill");
            Ok(Cow::Owned(matrix.reindex_rows(sectors, 0.0)))
        }
    }
}
