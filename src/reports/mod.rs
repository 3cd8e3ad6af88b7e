//! Reports module
//!
//! Derived views over the dataset snapshot: totals, composition, year-over-year
//! comparison, funding sources, category drill-down, headline metrics and the
//! consistency check. Every report is plain data and serializable so the
//! terminal front-end and the JSON/YAML exports share it.

pub mod comparison;
pub mod composition;
pub mod consistency;
pub mod dashboard;
pub mod drilldown;
pub mod funding;
pub mod highlights;
pub mod totals;

pub use comparison::{ComparisonReport, ComparisonRow, Direction};
pub use composition::{ColorMap, CompositionReport, CompositionSlice, RankedCategory, RankedReport};
pub use consistency::{ConsistencyIssue, ConsistencyReport};
pub use dashboard::DashboardView;
pub use drilldown::{rollup, KuanDrilldown, RollupGroup, RollupPolicy};
pub use funding::{FundingReport, FundingRow};
pub use highlights::{HeroMetrics, Highlights, NamedAmount};
pub use totals::CategoryTotals;

use crate::error::UndefinedPercentage;
use crate::models::Amount;

/// `part` as a percentage of `whole`
pub fn percent_of(part: Amount, whole: Amount) -> Result<f64, UndefinedPercentage> {
    if whole.is_zero() {
        return Err(UndefinedPercentage);
    }
    Ok(part.thousands() as f64 / whole.thousands() as f64 * 100.0)
}

/// Like [`percent_of`], with an undefined percentage reported as 0
pub fn percent_or_zero(part: Amount, whole: Amount) -> f64 {
    percent_of(part, whole).unwrap_or(0.0)
}

/// Amount per resident in 万円
pub fn per_capita_man(total: Amount, population: u64) -> f64 {
    if population == 0 {
        return 0.0;
    }
    total.yen() as f64 / population as f64 / 10_000.0
}
