//! Funding sources of expenditure categories (財源内訳)

use serde::Serialize;
use tabled::Tabled;

use super::percent_or_zero;
use crate::display;
use crate::format::format_share;
use crate::models::{Amount, BudgetType, FundingSources};
use crate::storage::Dataset;

/// One expenditure category's funding breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FundingRow {
    pub kuan: String,
    pub amount_current: Amount,
    pub sources: FundingSources,
    /// Share of the category paid from the general fund
    pub general_share_pct: f64,
}

/// Funding breakdown of every expenditure category, ordered by general fund
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FundingReport {
    pub rows: Vec<FundingRow>,
    pub totals: FundingSources,
}

#[derive(Tabled)]
struct FundingLine {
    #[tabled(rename = "款")]
    kuan: String,
    #[tabled(rename = "国・県")]
    national: String,
    #[tabled(rename = "地方債")]
    bond: String,
    #[tabled(rename = "その他")]
    other: String,
    #[tabled(rename = "一般財源")]
    general: String,
    #[tabled(rename = "一般財源比")]
    share: String,
}

impl FundingReport {
    /// Only expenditure rows carry a breakdown; other rows are skipped
    pub fn generate(dataset: &Dataset) -> Self {
        let mut rows: Vec<FundingRow> = dataset
            .summaries(BudgetType::Expenditure)
            .filter_map(|s| {
                s.funding.map(|sources| FundingRow {
                    kuan: s.kuan.clone(),
                    amount_current: s.amount_current,
                    sources,
                    general_share_pct: percent_or_zero(sources.general, sources.total()),
                })
            })
            .collect();
        rows.sort_by(|a, b| a.sources.general.cmp(&b.sources.general));

        let mut totals = FundingSources::default();
        for row in &rows {
            totals.national += row.sources.national;
            totals.bond += row.sources.bond;
            totals.other += row.sources.other;
            totals.general += row.sources.general;
        }

        Self { rows, totals }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = display::title("歳出 財源内訳");

        if self.rows.is_empty() {
            output.push_str("財源内訳のある款がありません（0件）\n");
            return output;
        }

        let line = |kuan: &str, s: &FundingSources| FundingLine {
            kuan: kuan.to_string(),
            national: s.national.format(true),
            bond: s.bond.format(true),
            other: s.other.format(true),
            general: s.general.format(true),
            share: format_share(percent_or_zero(s.general, s.total())),
        };
        let lines = self
            .rows
            .iter()
            .map(|r| line(&r.kuan, &r.sources))
            .chain(std::iter::once(line("合計", &self.totals)));
        output.push_str(&display::render(lines, &[1, 2, 3, 4, 5]));
        output.push('\n');

        output.push('\n');
        for (label, amount) in self.totals.labeled() {
            output.push_str(&format!(
                "  {}: {} ({})\n",
                label,
                amount,
                format_share(percent_or_zero(amount, self.totals.total()))
            ));
        }
        output
    }
}
