//! The immutable dataset snapshot
//!
//! A `Dataset` is built once from the source tables and then only ever
//! borrowed. `DatasetLoader` memoizes the load so repeated requests within a
//! process see the very same snapshot.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing::{debug, info, warn};

use super::records::{QuarantinedRow, RawDetailRow, RawTables};
use super::{csv_dir, sqlite};
use crate::error::BudgetResult;
use crate::models::{BudgetType, DetailRow, SummaryRow};

/// Validated budget tables
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    summary: Vec<SummaryRow>,
    revenue: Vec<DetailRow>,
    expenditure: Vec<DetailRow>,
    quarantined: Vec<QuarantinedRow>,
}

impl Dataset {
    /// Validate raw tables, quarantining rows that are missing required fields
    pub fn from_raw(raw: RawTables) -> Self {
        let mut quarantined = Vec::new();

        let mut summary = Vec::with_capacity(raw.summary.len());
        for (i, row) in raw.summary.into_iter().enumerate() {
            match row.into_summary(i + 1) {
                Ok(row) => summary.push(row),
                Err(reason) => quarantined.push(QuarantinedRow {
                    table: sqlite::SUMMARY_TABLE.to_string(),
                    row: i + 1,
                    reason,
                }),
            }
        }

        let mut details = |rows: Vec<RawDetailRow>, budget_type: BudgetType| {
            let mut out = Vec::with_capacity(rows.len());
            for (i, row) in rows.into_iter().enumerate() {
                match row.into_detail(budget_type) {
                    Ok(row) => out.push(row),
                    Err(reason) => quarantined.push(QuarantinedRow {
                        table: budget_type.detail_table().to_string(),
                        row: i + 1,
                        reason,
                    }),
                }
            }
            out
        };
        let revenue = details(raw.revenue, BudgetType::Revenue);
        let expenditure = details(raw.expenditure, BudgetType::Expenditure);

        for q in &quarantined {
            warn!(table = %q.table, row = q.row, reason = %q.reason, "quarantined row");
        }
        info!(
            summary = summary.len(),
            revenue = revenue.len(),
            expenditure = expenditure.len(),
            quarantined = quarantined.len(),
            "dataset loaded"
        );

        Self {
            summary,
            revenue,
            expenditure,
            quarantined,
        }
    }

    /// Build a dataset from already-typed rows (used by tests and tooling)
    pub fn from_rows(summary: Vec<SummaryRow>, details: Vec<DetailRow>) -> Self {
        let (revenue, expenditure) = details
            .into_iter()
            .partition(|d| d.budget_type == BudgetType::Revenue);
        Self {
            summary,
            revenue,
            expenditure,
            quarantined: Vec::new(),
        }
    }

    /// Load from a SQLite file or a directory of CSV files
    pub fn open(path: &Path) -> BudgetResult<Self> {
        let raw = if path.is_dir() {
            debug!(path = %path.display(), "reading CSV dataset");
            csv_dir::read_tables(path)?
        } else {
            debug!(path = %path.display(), "reading SQLite dataset");
            let conn = sqlite::open_read_only(path)?;
            sqlite::read_tables(&conn)?
        };
        Ok(Self::from_raw(raw))
    }

    /// Every summary row, in source order
    pub fn all_summaries(&self) -> &[SummaryRow] {
        &self.summary
    }

    /// Summary rows of one side, in source order
    pub fn summaries(&self, budget_type: BudgetType) -> impl Iterator<Item = &SummaryRow> {
        self.summary
            .iter()
            .filter(move |s| s.budget_type == budget_type)
    }

    /// Line items of one side, in source order
    pub fn details(&self, budget_type: BudgetType) -> &[DetailRow] {
        match budget_type {
            BudgetType::Expenditure => &self.expenditure,
            BudgetType::Revenue => &self.revenue,
        }
    }

    /// Find a category's summary row
    pub fn summary_for(&self, budget_type: BudgetType, kuan: &str) -> Option<&SummaryRow> {
        self.summaries(budget_type).find(|s| s.kuan == kuan)
    }

    /// Category names ordered by their budget-book ordinal
    pub fn kuan_names(&self, budget_type: BudgetType) -> Vec<&str> {
        let mut rows: Vec<&SummaryRow> = self.summaries(budget_type).collect();
        rows.sort_by_key(|s| s.kuan_no);
        rows.into_iter().map(|s| s.kuan.as_str()).collect()
    }

    /// Rows rejected during validation
    pub fn quarantined(&self) -> &[QuarantinedRow] {
        &self.quarantined
    }
}

/// Loads the dataset on first use and hands out the cached snapshot afterwards
#[derive(Debug)]
pub struct DatasetLoader {
    path: PathBuf,
    cell: OnceLock<Dataset>,
}

impl DatasetLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cell: OnceLock::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the snapshot, reading storage only on the first call
    pub fn get(&self) -> BudgetResult<&Dataset> {
        if let Some(dataset) = self.cell.get() {
            debug!("dataset cache hit");
            return Ok(dataset);
        }

        let dataset = Dataset::open(&self.path)?;
        Ok(self.cell.get_or_init(|| dataset))
    }
}
