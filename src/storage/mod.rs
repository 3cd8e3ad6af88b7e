//! Storage layer
//!
//! Reads the budget tables from SQLite or a CSV directory, validates them into
//! typed rows and memoizes the resulting snapshot.

pub mod csv_dir;
pub mod dataset;
pub mod records;
pub mod sqlite;

pub use dataset::{Dataset, DatasetLoader};
pub use records::{QuarantinedRow, RawDetailRow, RawSummaryRow, RawTables};

use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tracing::info;

use crate::error::{BudgetError, BudgetResult};

/// Build a SQLite dataset at `db_path` from a directory of CSV tables
///
/// Refuses to overwrite an existing file. The database is written next to the
/// target and renamed into place, so a failed import leaves nothing behind.
/// Rows are stored as found; validation happens when the dataset is loaded.
/// Returns the number of rows written.
pub fn import_csv_dir(csv_dir: &Path, db_path: &Path) -> BudgetResult<usize> {
    if db_path.exists() {
        return Err(BudgetError::Storage(format!(
            "Refusing to overwrite existing dataset: {}",
            db_path.display()
        )));
    }

    let tables = csv_dir::read_tables(csv_dir)?;

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            BudgetError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Create temp file in same directory so the rename stays atomic
    let mut temp_name = db_path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);
    if temp_path.exists() {
        std::fs::remove_file(&temp_path)?;
    }

    let written = write_database(&temp_path, &tables)
        .and_then(|written| {
            std::fs::rename(&temp_path, db_path).map_err(|e| {
                BudgetError::Storage(format!("Failed to rename temp file: {}", e))
            })?;
            Ok(written)
        })
        .map_err(|e| {
            let _ = std::fs::remove_file(&temp_path);
            e
        })?;

    info!(rows = written, path = %db_path.display(), "dataset imported");
    Ok(written)
}

fn write_database(path: &Path, tables: &RawTables) -> BudgetResult<usize> {
    let mut conn = Connection::open(path)?;
    sqlite::setup_database(&conn)?;
    let written = sqlite::write_tables(&mut conn, tables)?;
    conn.close().map_err(|(_, e)| BudgetError::from(e))?;
    Ok(written)
}
