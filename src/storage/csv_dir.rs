//! Flat-file dataset: a directory holding `summary.csv`, `revenue.csv` and
//! `expenditure.csv` with the same columns as the SQLite tables.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use super::records::{RawDetailRow, RawSummaryRow, RawTables};
use crate::error::{BudgetError, BudgetResult};

pub const SUMMARY_FILE: &str = "summary.csv";
pub const REVENUE_FILE: &str = "revenue.csv";
pub const EXPENDITURE_FILE: &str = "expenditure.csv";

const BOM: &[u8] = b"\xEF\xBB\xBF";

fn table_path(dir: &Path, file: &str) -> BudgetResult<PathBuf> {
    let path = dir.join(file);
    if !path.exists() {
        return Err(BudgetError::table_not_found(path.display().to_string()));
    }
    Ok(path)
}

/// Read one table, tolerating a leading byte-order mark
fn read_table<T: DeserializeOwned>(path: &Path) -> BudgetResult<Vec<T>> {
    let mut bytes = Vec::new();
    File::open(path)
        .and_then(|mut f| f.read_to_end(&mut bytes))
        .map_err(|e| BudgetError::Storage(format!("Failed to read {}: {}", path.display(), e)))?;

    let body = bytes.strip_prefix(BOM).unwrap_or(&bytes);
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(body);

    reader
        .deserialize()
        .enumerate()
        .map(|(i, record)| {
            record.map_err(|e| {
                BudgetError::Storage(format!("{} row {}: {}", path.display(), i + 1, e))
            })
        })
        .collect()
}

/// Read all three tables from a directory
pub fn read_tables(dir: &Path) -> BudgetResult<RawTables> {
    Ok(RawTables {
        summary: read_table::<RawSummaryRow>(&table_path(dir, SUMMARY_FILE)?)?,
        revenue: read_table::<RawDetailRow>(&table_path(dir, REVENUE_FILE)?)?,
        expenditure: read_table::<RawDetailRow>(&table_path(dir, EXPENDITURE_FILE)?)?,
    })
}
