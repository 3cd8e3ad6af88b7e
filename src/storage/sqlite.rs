//! SQLite dataset access
//!
//! Reads the `summary`, `revenue` and `expenditure` tables whole, and creates
//! them when importing from CSV. Numeric columns are read leniently: dataframe
//! tooling stores integer columns containing NULLs as REAL, so whole-number
//! floats and numeric text are accepted as integers.

use std::path::Path;

use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, OpenFlags, Row};

use super::records::{parse_int, RawDetailRow, RawSummaryRow, RawTables};
use crate::error::{BudgetError, BudgetResult};

pub const SUMMARY_TABLE: &str = "summary";
pub const REVENUE_TABLE: &str = "revenue";
pub const EXPENDITURE_TABLE: &str = "expenditure";

/// Open an existing dataset without write access
pub fn open_read_only(path: &Path) -> BudgetResult<Connection> {
    if !path.exists() {
        return Err(BudgetError::Storage(format!(
            "Dataset not found: {}",
            path.display()
        )));
    }
    Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY).map_err(|e| {
        BudgetError::Storage(format!("Failed to open {}: {}", path.display(), e))
    })
}

fn table_exists(conn: &Connection, table: &str) -> BudgetResult<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [table],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

fn columns(conn: &Connection, table: &str) -> BudgetResult<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names)
}

fn int_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<i64>> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i),
        ValueRef::Real(f) if f.is_finite() => Some(f.round() as i64),
        ValueRef::Real(_) => None,
        ValueRef::Text(t) => std::str::from_utf8(t).ok().and_then(parse_int),
        ValueRef::Blob(_) => None,
    })
}

fn text_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<String>> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Null => None,
        ValueRef::Text(t) => Some(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Blob(_) => None,
    })
}

/// Build a SELECT over the wanted columns, substituting NULL for absent ones
fn select_sql(table: &str, wanted: &[&str], present: &[String]) -> String {
    let cols: Vec<String> = wanted
        .iter()
        .map(|c| {
            if present.iter().any(|p| p == c) {
                format!("\"{}\"", c)
            } else {
                "NULL".to_string()
            }
        })
        .collect();
    format!("SELECT {} FROM {} ORDER BY rowid", cols.join(", "), table)
}

const SUMMARY_COLUMNS: [&str; 10] = [
    "kuan_no",
    "kuan",
    "type",
    "amount_current",
    "amount_previous",
    "diff",
    "src_national",
    "src_bond",
    "src_other",
    "src_general",
];

const DETAIL_COLUMNS: [&str; 8] = [
    "kuan",
    "kou",
    "moku",
    "amount_current",
    "setsu",
    "setsu_amount",
    "description",
    "src_general",
];

fn read_summary(conn: &Connection) -> BudgetResult<Vec<RawSummaryRow>> {
    let present = columns(conn, SUMMARY_TABLE)?;
    let mut stmt = conn.prepare(&select_sql(SUMMARY_TABLE, &SUMMARY_COLUMNS, &present))?;

    let rows = stmt
        .query_map([], |row| {
            Ok(RawSummaryRow {
                kuan_no: int_at(row, 0)?,
                kuan: text_at(row, 1)?,
                budget_type: text_at(row, 2)?,
                amount_current: int_at(row, 3)?,
                amount_previous: int_at(row, 4)?,
                diff: int_at(row, 5)?,
                src_national: int_at(row, 6)?,
                src_bond: int_at(row, 7)?,
                src_other: int_at(row, 8)?,
                src_general: int_at(row, 9)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn read_detail(conn: &Connection, table: &str) -> BudgetResult<Vec<RawDetailRow>> {
    let present = columns(conn, table)?;
    let mut stmt = conn.prepare(&select_sql(table, &DETAIL_COLUMNS, &present))?;

    let rows = stmt
        .query_map([], |row| {
            Ok(RawDetailRow {
                kuan: text_at(row, 0)?,
                kou: text_at(row, 1)?,
                moku: text_at(row, 2)?,
                amount_current: int_at(row, 3)?,
                setsu: text_at(row, 4)?,
                setsu_amount: int_at(row, 5)?,
                description: text_at(row, 6)?,
                src_general: int_at(row, 7)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Read all three tables
///
/// A missing table is an error: there is no partial dataset.
pub fn read_tables(conn: &Connection) -> BudgetResult<RawTables> {
    for table in [SUMMARY_TABLE, REVENUE_TABLE, EXPENDITURE_TABLE] {
        if !table_exists(conn, table)? {
            return Err(BudgetError::table_not_found(table));
        }
    }

    Ok(RawTables {
        summary: read_summary(conn)?,
        revenue: read_detail(conn, REVENUE_TABLE)?,
        expenditure: read_detail(conn, EXPENDITURE_TABLE)?,
    })
}

/// Create the dataset schema
///
/// Columns carry no constraints: rows are stored as found and validated when
/// the dataset is loaded.
pub fn setup_database(conn: &Connection) -> BudgetResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS summary (
            kuan_no INTEGER,
            kuan TEXT,
            type TEXT,
            amount_current INTEGER,
            amount_previous INTEGER,
            diff INTEGER,
            src_national INTEGER,
            src_bond INTEGER,
            src_other INTEGER,
            src_general INTEGER
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS revenue (
            kuan TEXT,
            kou TEXT,
            moku TEXT,
            amount_current INTEGER,
            setsu TEXT,
            setsu_amount INTEGER,
            description TEXT
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS expenditure (
            kuan TEXT,
            kou TEXT,
            moku TEXT,
            amount_current INTEGER,
            setsu TEXT,
            setsu_amount INTEGER,
            src_general INTEGER,
            description TEXT
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_summary_type ON summary(type)",
        [],
    )?;

    Ok(())
}

/// Insert raw tables into a freshly set-up database in one transaction
///
/// Returns the number of rows written.
pub fn write_tables(conn: &mut Connection, tables: &RawTables) -> BudgetResult<usize> {
    let tx = conn.transaction()?;
    let mut written = 0;

    {
        let mut stmt = tx.prepare(
            "INSERT INTO summary (
                kuan_no, kuan, type, amount_current, amount_previous, diff,
                src_national, src_bond, src_other, src_general
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )?;
        for row in &tables.summary {
            stmt.execute(params![
                row.kuan_no,
                row.kuan,
                row.budget_type,
                row.amount_current,
                row.amount_previous,
                row.diff,
                row.src_national,
                row.src_bond,
                row.src_other,
                row.src_general,
            ])?;
            written += 1;
        }

        let mut stmt = tx.prepare(
            "INSERT INTO revenue (kuan, kou, moku, amount_current, setsu, setsu_amount, description)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;
        for row in &tables.revenue {
            stmt.execute(params![
                row.kuan,
                row.kou,
                row.moku,
                row.amount_current,
                row.setsu,
                row.setsu_amount,
                row.description,
            ])?;
            written += 1;
        }

        let mut stmt = tx.prepare(
            "INSERT INTO expenditure (
                kuan, kou, moku, amount_current, setsu, setsu_amount, src_general, description
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )?;
        for row in &tables.expenditure {
            stmt.execute(params![
                row.kuan,
                row.kou,
                row.moku,
                row.amount_current,
                row.setsu,
                row.setsu_amount,
                row.src_general,
                row.description,
            ])?;
            written += 1;
        }
    }

    tx.commit()?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tables() -> RawTables {
        RawTables {
            summary: vec![RawSummaryRow {
                kuan_no: Some(2),
                kuan: Some("総務費".into()),
                budget_type: Some("歳出".into()),
                amount_current: Some(500_000),
                amount_previous: Some(480_000),
                diff: Some(20_000),
                src_national: Some(100_000),
                src_bond: Some(0),
                src_other: Some(150_000),
                src_general: Some(250_000),
            }],
            revenue: vec![],
            expenditure: vec![RawDetailRow {
                kuan: Some("総務費".into()),
                kou: Some("総務管理費".into()),
                moku: Some("一般管理費".into()),
                amount_current: Some(300_000),
                setsu: Some("報酬".into()),
                setsu_amount: Some(1_200),
                description: Some("会計年度任用職員".into()),
                src_general: Some(1_200),
            }],
        }
    }

    #[test]
    fn test_write_then_read() {
        let mut conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();

        let tables = sample_tables();
        let written = write_tables(&mut conn, &tables).unwrap();
        assert_eq!(written, 2);

        let read = read_tables(&conn).unwrap();
        assert_eq!(read.summary, tables.summary);
        assert_eq!(read.expenditure, tables.expenditure);
        assert!(read.revenue.is_empty());
    }

    #[test]
    fn test_incomplete_rows_are_stored_as_found() {
        let mut conn = Connection::open_in_memory().unwrap();
        setup_database(&conn).unwrap();

        let mut tables = sample_tables();
        tables.expenditure[0].amount_current = None;
        tables.expenditure.push(RawDetailRow {
            kuan: Some("総務費".into()),
            ..Default::default()
        });
        assert_eq!(write_tables(&mut conn, &tables).unwrap(), 3);

        let read = read_tables(&conn).unwrap();
        assert_eq!(read.expenditure, tables.expenditure);
    }

    #[test]
    fn test_numeric_text_columns() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE summary (kuan TEXT);
             CREATE TABLE revenue (kuan TEXT, amount_current TEXT, setsu_amount TEXT);
             INSERT INTO revenue VALUES ('町税', '1,234', '500.0');
             CREATE TABLE expenditure (kuan TEXT);",
        )
        .unwrap();

        let read = read_tables(&conn).unwrap();
        assert_eq!(read.revenue[0].amount_current, Some(1_234));
        assert_eq!(read.revenue[0].setsu_amount, Some(500));
    }

    #[test]
    fn test_missing_table_is_not_found() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute("CREATE TABLE summary (kuan TEXT)", []).unwrap();

        let err = read_tables(&conn).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_real_columns_and_missing_columns() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE summary (kuan_no INTEGER, kuan TEXT, type TEXT,
                amount_current REAL, amount_previous REAL, diff REAL,
                src_national REAL, src_bond REAL, src_other REAL, src_general REAL);
             INSERT INTO summary VALUES (1, '町税', '歳入', 120000.0, 118000.0, 2000.0,
                NULL, NULL, NULL, NULL);
             CREATE TABLE revenue (kuan TEXT, kou TEXT, moku TEXT, amount_current INTEGER,
                setsu TEXT, setsu_amount INTEGER, description TEXT);
             INSERT INTO revenue VALUES ('町税', '町民税', '個人', 80000, NULL, 80000, NULL);
             CREATE TABLE expenditure (kuan TEXT, kou TEXT, moku TEXT, amount_current INTEGER,
                setsu TEXT, setsu_amount INTEGER, src_general INTEGER, description TEXT);",
        )
        .unwrap();

        let read = read_tables(&conn).unwrap();
        assert_eq!(read.summary[0].amount_current, Some(120_000));
        assert_eq!(read.summary[0].src_general, None);
        assert_eq!(read.revenue[0].src_general, None);
        assert_eq!(read.revenue[0].setsu, None);
    }

    #[test]
    fn test_open_missing_file() {
        let err = open_read_only(Path::new("/nonexistent/budget.db")).unwrap_err();
        assert!(matches!(err, BudgetError::Storage(_)));
    }
}
