//! Category totals for one side of the account

use serde::Serialize;

use super::percent_or_zero;
use crate::models::{Amount, BudgetType};
use crate::storage::Dataset;

/// Sum of all categories of one budget side
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotals {
    pub budget_type: BudgetType,
    pub total_current: Amount,
    pub total_previous: Amount,
    pub total_diff: Amount,
    /// Change against the previous year in percent; 0 when there is no base
    pub diff_pct: f64,
    pub category_count: usize,
}

impl CategoryTotals {
    pub fn generate(dataset: &Dataset, budget_type: BudgetType) -> Self {
        let mut total_current = Amount::zero();
        let mut total_previous = Amount::zero();
        let mut category_count = 0;

        for row in dataset.summaries(budget_type) {
            total_current += row.amount_current;
            total_previous += row.amount_previous;
            category_count += 1;
        }

        let total_diff = total_current - total_previous;

        Self {
            budget_type,
            total_current,
            total_previous,
            total_diff,
            diff_pct: percent_or_zero(total_diff, total_previous),
            category_count,
        }
    }
}
