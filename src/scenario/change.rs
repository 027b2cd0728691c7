use serde::{Deserialize, Serialize};

/// One override of a final-demand cell: set (sector, demand) to `value`.
///
/// `demand` is either a named demand category or the total-final-use sentinel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioChange {
    pub sector: String,
    pub demand: String,
    pub value: f64,
}

impl ScenarioChange {
    pub fn new(sector: &str, demand: &str, value: f64) -> Self {
        Self { sector: sector.to_string(), demand: demand.to_string(), value }
    }
}

/// Homogeneity class of a validated change batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    #[serde(rename = "total_final_use_change")]
    TotalFinalUse,
    #[serde(rename = "component_change")]
    Component,
}
