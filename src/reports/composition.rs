//! Category ranking and top-N composition
//!
//! Both views rank categories by this year's amount. Colors are handed out in
//! that order so a category keeps the same color in every chart.

use serde::Serialize;
use tabled::Tabled;

use super::percent_or_zero;
use crate::config::Settings;
use crate::display::{self, amount_bar};
use crate::format::format_share;
use crate::models::{Amount, BudgetType, SummaryRow};
use crate::storage::Dataset;

/// Palette colors keyed by category name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColorMap {
    entries: Vec<(String, String)>,
}

impl ColorMap {
    /// Assign palette colors to categories, cycling when the palette runs out
    ///
    /// `ranked` must already be in descending amount order.
    pub fn assign<'a, I>(ranked: I, palette: &[String]) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        if palette.is_empty() {
            return Self::default();
        }
        let entries = ranked
            .into_iter()
            .enumerate()
            .map(|(i, kuan)| (kuan.to_string(), palette[i % palette.len()].clone()))
            .collect();
        Self { entries }
    }

    pub fn color_of(&self, kuan: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == kuan)
            .map(|(_, c)| c.as_str())
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }
}

/// Summary rows of one side, largest first; ties keep source order
pub(crate) fn ranked_rows(dataset: &Dataset, budget_type: BudgetType) -> Vec<&SummaryRow> {
    let mut rows: Vec<&SummaryRow> = dataset.summaries(budget_type).collect();
    rows.sort_by(|a, b| b.amount_current.cmp(&a.amount_current));
    rows
}

/// A category in the ranked bar chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCategory {
    pub rank: usize,
    pub kuan: String,
    pub amount: Amount,
    pub share_pct: f64,
    pub color: String,
}

/// All categories of one side ordered by amount
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedReport {
    pub budget_type: BudgetType,
    pub total: Amount,
    pub categories: Vec<RankedCategory>,
}

#[derive(Tabled)]
struct RankedLine {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "款")]
    kuan: String,
    #[tabled(rename = "金額")]
    amount: String,
    #[tabled(rename = "構成比")]
    share: String,
    #[tabled(rename = "")]
    bar: String,
}

impl RankedReport {
    pub fn generate(dataset: &Dataset, budget_type: BudgetType, palette: &[String]) -> Self {
        let rows = ranked_rows(dataset, budget_type);
        let total: Amount = rows.iter().map(|r| r.amount_current).sum();
        let colors = ColorMap::assign(rows.iter().map(|r| r.kuan.as_str()), palette);

        let categories = rows
            .iter()
            .enumerate()
            .map(|(i, r)| RankedCategory {
                rank: i + 1,
                kuan: r.kuan.clone(),
                amount: r.amount_current,
                share_pct: percent_or_zero(r.amount_current, total),
                color: colors.color_of(&r.kuan).unwrap_or_default().to_string(),
            })
            .collect();

        Self {
            budget_type,
            total,
            categories,
        }
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = display::title(&format!("{} 款別金額", self.budget_type.label()));
        output.push_str(&format!("合計: {}\n\n", self.total));

        if self.categories.is_empty() {
            output.push_str("該当する款がありません（0件）\n");
            return output;
        }

        let max = self.categories[0].amount;
        let lines = self.categories.iter().map(|c| RankedLine {
            rank: c.rank,
            kuan: c.kuan.clone(),
            amount: c.amount.format(false),
            share: format!("{:.1}%", c.share_pct),
            bar: amount_bar(c.amount, max, display::report::BAR_WIDTH),
        });
        output.push_str(&display::render(lines, &[0, 2, 3]));
        output.push('\n');
        output
    }
}

/// One slice of the composition chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositionSlice {
    pub label: String,
    pub amount: Amount,
    pub share_pct: f64,
    pub color: String,
    pub is_other: bool,
}

/// The N largest categories plus an aggregated remainder
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositionReport {
    pub budget_type: BudgetType,
    pub top_n: usize,
    pub grand_total: Amount,
    pub slices: Vec<CompositionSlice>,
}

#[derive(Tabled)]
struct SliceLine {
    #[tabled(rename = "区分")]
    label: String,
    #[tabled(rename = "金額")]
    amount: String,
    #[tabled(rename = "構成比")]
    share: String,
    #[tabled(rename = "")]
    bar: String,
}

impl CompositionReport {
    /// Build the top-N view; the remainder slice is always present
    pub fn generate(dataset: &Dataset, budget_type: BudgetType, settings: &Settings) -> Self {
        let rows = ranked_rows(dataset, budget_type);
        let grand_total: Amount = rows.iter().map(|r| r.amount_current).sum();
        let colors = ColorMap::assign(rows.iter().map(|r| r.kuan.as_str()), &settings.palette);

        let top = &rows[..settings.composition_top_n.min(rows.len())];
        let top_total: Amount = top.iter().map(|r| r.amount_current).sum();

        let mut slices: Vec<CompositionSlice> = top
            .iter()
            .map(|r| CompositionSlice {
                label: r.kuan.clone(),
                amount: r.amount_current,
                share_pct: percent_or_zero(r.amount_current, grand_total),
                color: colors.color_of(&r.kuan).unwrap_or_default().to_string(),
                is_other: false,
            })
            .collect();

        let other = grand_total - top_total;
        slices.push(CompositionSlice {
            label: settings.other_label.clone(),
            amount: other,
            share_pct: percent_or_zero(other, grand_total),
            color: settings.other_color.clone(),
            is_other: true,
        });

        Self {
            budget_type,
            top_n: settings.composition_top_n,
            grand_total,
            slices,
        }
    }

    /// The aggregated remainder
    pub fn other(&self) -> Option<&CompositionSlice> {
        self.slices.iter().find(|s| s.is_other)
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = display::title(&format!(
            "{} 構成（上位{}款）",
            self.budget_type.label(),
            self.top_n
        ));
        output.push_str(&format!("合計: {}\n\n", self.grand_total));

        let max = self
            .slices
            .iter()
            .map(|s| s.amount)
            .max()
            .unwrap_or(Amount::zero());
        let lines = self.slices.iter().map(|s| SliceLine {
            label: s.label.clone(),
            amount: s.amount.format(false),
            share: format_share(s.share_pct),
            bar: amount_bar(s.amount, max, display::report::BAR_WIDTH),
        });
        output.push_str(&display::render(lines, &[1, 2]));
        output.push('\n');
        output
    }
}
