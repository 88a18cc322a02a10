//! CSV-based rate table loader
//!
//! Loads the DTF monthly rate series and the IPC annual index series from
//! CSV files in a rates directory.

use std::error::Error;
use std::fs::File;
use std::path::Path;

use super::annual::AnnualIndexTable;
use super::monthly::MonthlyRateTable;
use crate::period::Period;

/// Default path to the rates directory
pub const DEFAULT_RATES_PATH: &str = "data/rates";

#[derive(Debug, serde::Deserialize)]
struct MonthlyRateRow {
    #[serde(rename = "Year")]
    year: i32,
    #[serde(rename = "Month")]
    month: u32,
    #[serde(rename = "Rate")]
    rate: f64,
}

#[derive(Debug, serde::Deserialize)]
struct AnnualIndexRow {
    #[serde(rename = "Year")]
    year: i32,
    #[serde(rename = "Factor")]
    factor: f64,
}

/// Load monthly rates from `monthly_rates.csv` in the given directory
pub fn load_monthly_rates(path: &Path) -> Result<MonthlyRateTable, Box<dyn Error>> {
    let file = File::open(path.join("monthly_rates.csv"))?;
    load_monthly_rates_from_reader(file)
}

/// Load monthly rates from any reader (e.g., string buffer)
pub fn load_monthly_rates_from_reader<R: std::io::Read>(
    reader: R,
) -> Result<MonthlyRateTable, Box<dyn Error>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut table = MonthlyRateTable::new();

    for result in csv_reader.deserialize() {
        let row: MonthlyRateRow = result?;
        let period = Period::new(row.year, row.month)?;
        table.insert(period, row.rate);
    }

    Ok(table)
}

/// Load annual indices from `annual_indices.csv` in the given directory
pub fn load_annual_indices(path: &Path) -> Result<AnnualIndexTable, Box<dyn Error>> {
    let file = File::open(path.join("annual_indices.csv"))?;
    load_annual_indices_from_reader(file)
}

/// Load annual indices from any reader
pub fn load_annual_indices_from_reader<R: std::io::Read>(
    reader: R,
) -> Result<AnnualIndexTable, Box<dyn Error>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut table = AnnualIndexTable::new();

    for result in csv_reader.deserialize() {
        let row: AnnualIndexRow = result?;
        table.insert(row.year, row.factor);
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_monthly_rates() {
        let csv = "Year,Month,Rate\n2024,1,0.1025\n2024,2,0.1010\n";
        let table = load_monthly_rates_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(&Period::new(2024, 1).unwrap()), Some(0.1025));
    }

    #[test]
    fn test_load_monthly_rates_rejects_bad_month() {
        let csv = "Year,Month,Rate\n2024,13,0.1025\n";
        assert!(load_monthly_rates_from_reader(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_load_annual_indices() {
        let csv = "Year,Factor\n2024,1.0512\n2025,1.0428\n";
        let table = load_annual_indices_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.get(2025), Some(1.0428));
    }
}
