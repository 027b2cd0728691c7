//! Small reference economies for tests and demonstrations.
use crate::error::EngineError;
use crate::matrix::LabeledMatrix;
use crate::record::MatrixRecord;

pub const THREE_SECTORS: [&str; 3] = ["Agriculture", "Manufacturing", "Services"];

pub const THREE_SECTOR_IC: [[f64; 3]; 3] = [
    [50.0, 200.0, 100.0],
    [100.0, 300.0, 150.0],
    [25.0, 150.0, 200.0],
];

pub const THREE_SECTOR_FD: [f64; 3] = [400.0, 500.0, 300.0];

pub const FIVE_SECTORS: [&str; 5] = ["Agriculture", "Mining", "Manufacturing", "Construction", "Services"];

pub const FIVE_SECTOR_IC: [[f64; 5]; 5] = [
    [20.0, 30.0, 50.0, 10.0, 40.0],
    [5.0, 100.0, 200.0, 50.0, 25.0],
    [15.0, 150.0, 300.0, 100.0, 80.0],
    [5.0, 20.0, 80.0, 50.0, 30.0],
    [10.0, 40.0, 100.0, 60.0, 150.0],
];

pub const FIVE_SECTOR_FD: [f64; 5] = [350.0, 200.0, 450.0, 400.0, 600.0];

/// Label of the single demand column in the sample economies.
pub const SAMPLE_DEMAND_CATEGORY: &str = "final_demand";

fn record<const N: usize>(name: &str, sectors: [&str; N], ic: [[f64; N]; N], fd: [f64; N]) -> MatrixRecord {
    let mut record = MatrixRecord::new(
        name,
        sectors.iter().map(|s| s.to_string()).collect(),
        ic.iter().map(|row| row.to_vec()).collect(),
        fd.iter().map(|v| vec![*v]).collect(),
    );
    record.demand_categories = Some(vec![SAMPLE_DEMAND_CATEGORY.to_string()]);
    record
}

pub fn three_sector_record() -> MatrixRecord {
    record("Sample 3-Sector Economy", THREE_SECTORS, THREE_SECTOR_IC, THREE_SECTOR_FD)
        .with_description("Agriculture, Manufacturing and Services")
}

pub fn five_sector_record() -> MatrixRecord {
    record("Sample 5-Sector Economy", FIVE_SECTORS, FIVE_SECTOR_IC, FIVE_SECTOR_FD)
        .with_description("A larger sample input-output table with five sectors")
}

/// (intermediate consumption, final demand) of the three-sector economy.
pub fn three_sector() -> Result<(LabeledMatrix, LabeledMatrix), EngineError> {
    three_sector_record().to_matrices()
}

pub fn five_sector() -> Result<(LabeledMatrix, LabeledMatrix), EngineError> {
    five_sector_record().to_matrices()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::engine::MatrixEngine;

    #[test]
    fn test_five_sector_economy_is_productive() {
        let (ic, fd) = five_sector().unwrap();
        let mut engine = MatrixEngine::new(ic, fd, EngineConfig::default()).unwrap();
        let total = engine.get_total_output().unwrap();
        assert_eq!(total.values(), &[500.0, 580.0, 1095.0, 585.0, 960.0]);
        let multipliers = engine.get_multipliers().unwrap();
        assert!(multipliers.output().iter().all(|m| *m >= 1.0));
    }
}
