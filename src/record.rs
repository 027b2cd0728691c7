//! The persisted shape of a named input-output table.
//!
//! Storage itself lives outside this crate; a record only knows how to turn
//! itself into validated matrices and how to take a partial update.
use crate::error::EngineError;
use crate::matrix::{LabeledMatrix, Labels};
use crate::validation::{build_matrix, validate_inputs, FINAL_DEMAND, INTERMEDIATE_CONSUMPTION};
use serde::{Deserialize, Serialize};
use tracing::info;

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixRecord {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub sectors: Vec<String>,
    /// Column labels for the final demand. Positional `fd_0..` when absent.
    #[serde(default)]
    pub demand_categories: Option<Vec<String>>,
    pub intermediate_consumption_data: Vec<Vec<f64>>,
    pub final_demand_data: Vec<Vec<f64>>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// RFC 3339 timestamps, maintained by the store.
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Partial update of a [`MatrixRecord`]; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatrixRecordUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub sectors: Option<Vec<String>>,
    pub demand_categories: Option<Vec<String>>,
    pub intermediate_consumption_data: Option<Vec<Vec<f64>>>,
    pub final_demand_data: Option<Vec<Vec<f64>>>,
    pub is_active: Option<bool>,
}

impl MatrixRecord {
    pub fn new(
        name: &str,
        sectors: Vec<String>,
        intermediate_consumption_data: Vec<Vec<f64>>,
        final_demand_data: Vec<Vec<f64>>,
    ) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            description: None,
            sectors,
            demand_categories: None,
            intermediate_consumption_data,
            final_demand_data,
            is_active: true,
            created_at: None,
            updated_at: None,
        }
    }

    /// Stores a validated pair. Demand categories are kept unless they are the
    /// positional defaults.
    pub fn from_matrices(name: &str, ic: &LabeledMatrix, fd: &LabeledMatrix) -> Result<Self, EngineError> {
        validate_inputs(ic, fd)?;
        let categories = fd.col_labels();
        let positional = categories == &Labels::prefixed("fd_", categories.len());
        let mut record = Self::new(name, ic.row_labels().as_slice().to_vec(), ic.to_rows(), fd.to_rows());
        if !positional {
            record.demand_categories = Some(categories.as_slice().to_vec());
        }
        Ok(record)
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Builds and validates the (intermediate consumption, final demand) pair.
    pub fn to_matrices(&self) -> Result<(LabeledMatrix, LabeledMatrix), EngineError> {
        let categories: Vec<String> = match &self.demand_categories {
            Some(c) => c.clone(),
            None => Labels::prefixed("fd_", self.final_demand_data.first().map_or(0, Vec::len)).into(),
        };
        let ic = build_matrix(
            INTERMEDIATE_CONSUMPTION,
            self.intermediate_consumption_data.clone(),
            self.sectors.clone(),
            self.sectors.clone(),
        )?;
        let fd = build_matrix(FINAL_DEMAND, self.final_demand_data.clone(), self.sectors.clone(), categories)?;
        validate_inputs(&ic, &fd)?;
        Ok((ic, fd))
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        self.to_matrices().map(|_| ())
    }

    /// Applies `update` only if the resulting record is still valid. Returns
    /// the names of the fields that were set.
    pub fn apply_update(&mut self, update: MatrixRecordUpdate) -> Result<Vec<&'static str>, EngineError> {
        let mut next = self.clone();
        let mut fields = Vec::new();

        if let Some(name) = update.name {
            next.name = name;
            fields.push("name");
        }
        if let Some(description) = update.description {
            next.description = Some(description);
            fields.push("description");
        }
        if let Some(sectors) = update.sectors {
            next.sectors = sectors;
            fields.push("sectors");
        }
        if let Some(categories) = update.demand_categories {
            next.demand_categories = Some(categories);
            fields.push("demand_categories");
        }
        if let Some(data) = update.intermediate_consumption_data {
            next.intermediate_consumption_data = data;
            fields.push("intermediate_consumption_data");
        }
        if let Some(data) = update.final_demand_data {
            next.final_demand_data = data;
            fields.push("final_demand_data");
        }
        if let Some(active) = update.is_active {
            next.is_active = active;
            fields.push("is_active");
        }

        next.validate()?;
        *self = next;
        info!(matrix_id = ?self.id, updated_fields = ?fields, "matrix record updated");
        Ok(fields)
    }
}
