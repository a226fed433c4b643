//! CSV loader for labeled supplier tables

use crate::config::DatasetConfig;
use crate::dataset::perturb::{perturb, PerturbationSummary};
use crate::error::{Result, RiskError};
use crate::types::supplier::{LabeledSupplierRecord, SupplierRecord};
use rand::Rng;
use serde::Deserialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::info;

/// Columns the table must provide; others are ignored
pub const REQUIRED_COLUMNS: [&str; 4] = [
    "Delay_Days",
    "Supplier_Reliability_Score",
    "Parameter_Change_Magnitude",
    "Supply_Risk_Flag",
];

#[derive(Debug, Deserialize)]
struct DatasetRow {
    #[serde(rename = "Delay_Days")]
    delay_days: f64,
    #[serde(rename = "Supplier_Reliability_Score")]
    reliability_score: f64,
    #[serde(rename = "Parameter_Change_Magnitude")]
    parameter_change_magnitude: f64,
    #[serde(rename = "Supply_Risk_Flag")]
    supply_risk_flag: u8,
}

/// Loaded and perturbed training table
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub records: Vec<LabeledSupplierRecord>,
    pub perturbation: PerturbationSummary,
}

/// Reads the labeled table and applies the label-noise perturbation
pub struct DataLoader {
    path: PathBuf,
    noise_std_dev: f64,
    relabel_delay_below: f64,
}

impl DataLoader {
    /// Create a loader from dataset configuration
    pub fn new(config: &DatasetConfig) -> Self {
        Self {
            path: PathBuf::from(&config.path),
            noise_std_dev: config.noise_std_dev,
            relabel_delay_below: config.relabel_delay_below,
        }
    }

    /// Read the table and perturb it with the given random source
    pub fn load<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<LoadedDataset> {
        let mut records = read_records_from_path(&self.path)?;
        let perturbation = perturb(
            &mut records,
            self.noise_std_dev,
            self.relabel_delay_below,
            rng,
        )?;

        info!(
            path = %self.path.display(),
            rows = records.len(),
            relabel_candidates = perturbation.relabel_candidates,
            flags_cleared = perturbation.flags_cleared,
            "Dataset loaded and perturbed"
        );

        Ok(LoadedDataset {
            records,
            perturbation,
        })
    }
}

/// Read labeled records from a CSV file
pub fn read_records_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<LabeledSupplierRecord>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .map_err(|e| RiskError::data_load(path, format!("cannot open file: {e}")))?;
    read_records(file, path)
}

/// Read labeled records from any CSV source; `source` names it in errors
pub fn read_records<R: Read>(reader: R, source: &Path) -> Result<Vec<LabeledSupplierRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| RiskError::data_load(source, format!("cannot read header: {e}")))?
        .clone();

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|h| h == *column))
        .collect();
    if !missing.is_empty() {
        return Err(RiskError::data_load(
            source,
            format!("missing columns: {}", missing.join(", ")),
        ));
    }

    let mut records = Vec::new();
    for (index, row) in reader.deserialize::<DatasetRow>().enumerate() {
        // header occupies line 1
        let line = index + 2;
        let row = row.map_err(|e| RiskError::data_load(source, format!("line {line}: {e}")))?;

        if row.supply_risk_flag > 1 {
            return Err(RiskError::data_load(
                source,
                format!(
                    "line {line}: Supply_Risk_Flag must be 0 or 1, got {}",
                    row.supply_risk_flag
                ),
            ));
        }

        for (column, value) in [
            ("Delay_Days", row.delay_days),
            ("Supplier_Reliability_Score", row.reliability_score),
            ("Parameter_Change_Magnitude", row.parameter_change_magnitude),
        ] {
            if !value.is_finite() {
                return Err(RiskError::data_load(
                    source,
                    format!("line {line}: {column} must be finite, got {value}"),
                ));
            }
        }

        records.push(LabeledSupplierRecord::new(
            SupplierRecord::new(
                row.delay_days,
                row.reliability_score,
                row.parameter_change_magnitude,
            ),
            row.supply_risk_flag,
        ));
    }

    if records.is_empty() {
        return Err(RiskError::data_load(source, "table has no rows"));
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const TABLE: &str = "\
Supplier_ID,Order_ID,Delay_Days,Supplier_Reliability_Score,Parameter_Change_Magnitude,Supply_Risk_Flag
SUP1,ORD1,10,50,2.5,1
SUP2,ORD2,0,96,0.02,0
SUP3,ORD3,4.5,81.5,1.25,1
";

    #[test]
    fn test_read_records_ignores_extra_columns() {
        let records = read_records(TABLE.as_bytes(), Path::new("inline.csv")).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].record, SupplierRecord::new(10.0, 50.0, 2.5));
        assert_eq!(records[0].supply_risk_flag, 1);
        assert_eq!(records[2].record.reliability_score, 81.5);
    }

    #[test]
    fn test_missing_column() {
        let table = "Delay_Days,Supplier_Reliability_Score,Supply_Risk_Flag\n1,90,0\n";
        let err = read_records(table.as_bytes(), Path::new("inline.csv")).unwrap_err();

        assert!(matches!(err, RiskError::DataLoad { .. }));
        assert!(err.to_string().contains("Parameter_Change_Magnitude"));
    }

    #[test]
    fn test_invalid_label() {
        let table = "Delay_Days,Supplier_Reliability_Score,Parameter_Change_Magnitude,Supply_Risk_Flag\n1,90,1,2\n";
        let err = read_records(table.as_bytes(), Path::new("inline.csv")).unwrap_err();

        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_unparseable_cell() {
        let table = "Delay_Days,Supplier_Reliability_Score,Parameter_Change_Magnitude,Supply_Risk_Flag\nsoon,90,1,0\n";
        let err = read_records(table.as_bytes(), Path::new("inline.csv")).unwrap_err();

        assert!(matches!(err, RiskError::DataLoad { .. }));
    }

    #[test]
    fn test_non_finite_cell() {
        let header = "Delay_Days,Supplier_Reliability_Score,Parameter_Change_Magnitude,Supply_Risk_Flag";
        for (row, column) in [
            ("10,NaN,2.5,1", "Supplier_Reliability_Score"),
            ("inf,90,1,0", "Delay_Days"),
            ("10,50,-inf,1", "Parameter_Change_Magnitude"),
        ] {
            let table = format!("{header}\n60,95,1.0,0\n{row}\n");
            let err = read_records(table.as_bytes(), Path::new("inline.csv")).unwrap_err();

            assert!(matches!(err, RiskError::DataLoad { .. }));
            let message = err.to_string();
            assert!(message.contains("line 3"), "{message}");
            assert!(message.contains(column), "{message}");
        }
    }

    #[test]
    fn test_empty_table() {
        let table = "Delay_Days,Supplier_Reliability_Score,Parameter_Change_Magnitude,Supply_Risk_Flag\n";
        let err = read_records(table.as_bytes(), Path::new("inline.csv")).unwrap_err();

        assert!(err.to_string().contains("no rows"));
    }

    #[test]
    fn test_missing_file() {
        let mut config = crate::config::AppConfig::default().dataset;
        config.path = "does/not/exist.csv".to_string();
        let loader = DataLoader::new(&config);

        let err = loader.load(&mut StdRng::seed_from_u64(1)).unwrap_err();
        assert!(matches!(err, RiskError::DataLoad { .. }));
    }
}
