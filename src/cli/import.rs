//! CLI command for building a dataset from CSV tables

use std::path::Path;

use crate::error::BudgetResult;
use crate::storage::{csv_dir, import_csv_dir};

/// Import `summary.csv`, `revenue.csv` and `expenditure.csv` into a new SQLite file
pub fn handle_import_command(csv_dir: &Path, db_path: &Path) -> BudgetResult<()> {
    let written = import_csv_dir(csv_dir, db_path)?;

    println!("Imported {} rows into {}", written, db_path.display());
    println!(
        "Source: {} ({}, {}, {})",
        csv_dir.display(),
        csv_dir::SUMMARY_FILE,
        csv_dir::REVENUE_FILE,
        csv_dir::EXPENDITURE_FILE
    );
    Ok(())
}
