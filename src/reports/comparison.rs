//! Year-over-year comparison by category

use serde::Serialize;
use tabled::Tabled;

use super::percent_or_zero;
use crate::display::{self, amount_bar, paint, Tone};
use crate::format::format_percent_change;
use crate::models::{Amount, BudgetType};
use crate::storage::Dataset;

/// Whether a category grew or shrank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Increase,
    Decrease,
}

impl Direction {
    /// A zero change counts as an increase
    pub fn of(diff: Amount) -> Self {
        if diff.is_negative() {
            Self::Decrease
        } else {
            Self::Increase
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Increase => "増加",
            Self::Decrease => "減少",
        }
    }
}

/// One category's change against last year
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub kuan: String,
    pub amount_current: Amount,
    pub amount_previous: Amount,
    pub diff: Amount,
    pub diff_pct: f64,
    pub direction: Direction,
    /// Short diff label, e.g. "+1.2億"
    pub label: String,
}

/// Every category of one side ordered by change, largest decrease first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub budget_type: BudgetType,
    pub rows: Vec<ComparisonRow>,
}

#[derive(Tabled)]
struct ComparisonLine {
    #[tabled(rename = "款")]
    kuan: String,
    #[tabled(rename = "前年度")]
    previous: String,
    #[tabled(rename = "本年度")]
    current: String,
    #[tabled(rename = "増減")]
    diff: String,
    #[tabled(rename = "増減率")]
    pct: String,
    #[tabled(rename = "")]
    bar: String,
}

impl ComparisonReport {
    pub fn generate(dataset: &Dataset, budget_type: BudgetType) -> Self {
        let mut rows: Vec<ComparisonRow> = dataset
            .summaries(budget_type)
            .map(|s| ComparisonRow {
                kuan: s.kuan.clone(),
                amount_current: s.amount_current,
                amount_previous: s.amount_previous,
                diff: s.diff,
                diff_pct: percent_or_zero(s.diff, s.amount_previous),
                direction: Direction::of(s.diff),
                label: s.diff.format_diff(true),
            })
            .collect();
        rows.sort_by(|a, b| a.diff.cmp(&b.diff));

        Self { budget_type, rows }
    }

    pub fn increases(&self) -> impl Iterator<Item = &ComparisonRow> {
        self.rows
            .iter()
            .filter(|r| r.direction == Direction::Increase)
    }

    pub fn decreases(&self) -> impl Iterator<Item = &ComparisonRow> {
        self.rows
            .iter()
            .filter(|r| r.direction == Direction::Decrease)
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = display::title(&format!("{} 前年度比較", self.budget_type.label()));

        if self.rows.is_empty() {
            output.push_str("該当する款がありません（0件）\n");
            return output;
        }

        output.push_str(&format!(
            "増加 {}款 / 減少 {}款\n\n",
            self.increases().count(),
            self.decreases().count()
        ));

        let max = self
            .rows
            .iter()
            .map(|r| r.diff.abs())
            .max()
            .unwrap_or(Amount::zero());
        let width = display::report::BAR_WIDTH / 2;
        let lines = self.rows.iter().map(|r| {
            let marker = match r.direction {
                Direction::Increase => "▲",
                Direction::Decrease => "▼",
            };
            ComparisonLine {
                kuan: r.kuan.clone(),
                previous: r.amount_previous.format(true),
                current: r.amount_current.format(true),
                diff: format!("{} {}", marker, r.label),
                pct: format_percent_change(r.diff_pct),
                bar: amount_bar(r.diff.abs(), max, width),
            }
        });
        output.push_str(&display::render(lines, &[1, 2, 3, 4]));
        output.push('\n');

        let net: Amount = self.rows.iter().map(|r| r.diff).sum();
        output.push_str(&format!(
            "純増減: {}\n",
            paint(&net.format_diff(false), Tone::of(net))
        ));
        output
    }
}
