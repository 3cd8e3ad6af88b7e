//! Headline figures for the overview screen

use serde::Serialize;

use super::composition::ranked_rows;
use super::{per_capita_man, percent_or_zero, CategoryTotals};
use crate::config::Settings;
use crate::display::{self, paint, Tone};
use crate::format::{format_man, format_percent_change, format_share};
use crate::models::{Amount, BudgetType};
use crate::storage::Dataset;

/// The big number at the top of the overview
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeroMetrics {
    pub budget_type: BudgetType,
    pub municipality: String,
    pub fiscal_year: String,
    pub total: Amount,
    pub previous: Amount,
    pub diff: Amount,
    pub diff_pct: f64,
    pub population: u64,
    /// Total per resident in 万円
    pub per_capita_man: f64,
}

impl HeroMetrics {
    pub fn generate(dataset: &Dataset, budget_type: BudgetType, settings: &Settings) -> Self {
        let totals = CategoryTotals::generate(dataset, budget_type);
        Self {
            budget_type,
            municipality: settings.municipality.clone(),
            fiscal_year: settings.fiscal_year.clone(),
            total: totals.total_current,
            previous: totals.total_previous,
            diff: totals.total_diff,
            diff_pct: totals.diff_pct,
            population: settings.population,
            per_capita_man: per_capita_man(totals.total_current, settings.population),
        }
    }

    /// Format the hero card for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = display::title(&format!(
            "{} {} 一般会計 {}",
            self.municipality,
            self.fiscal_year,
            self.budget_type.label()
        ));
        output.push_str(&format!("  {}\n", self.total));
        let change = format!(
            "{} 前年度比 ({})",
            format_percent_change(self.diff_pct),
            self.diff.format_diff(false)
        );
        output.push_str(&format!("  {}\n", paint(&change, Tone::of(self.diff))));
        output.push_str(&format!(
            "  町民1人あたり {}（人口 {}人）\n",
            format_man(self.per_capita_man),
            crate::format::group_thousands(self.population)
        ));
        output
    }
}

/// A category name with an amount
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedAmount {
    pub kuan: String,
    pub amount: Amount,
}

/// Highlight points under the hero card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Highlights {
    pub budget_type: BudgetType,
    /// Largest category this year
    pub largest: Option<NamedAmount>,
    pub largest_share_pct: f64,
    /// Category with the largest absolute change; the amount is the diff
    pub biggest_change: Option<NamedAmount>,
    /// Donation revenue (ふるさと納税 and other gifts)
    pub donation: Option<NamedAmount>,
    /// Donation revenue against this side's total
    pub donation_share_pct: f64,
    /// Local tax revenue
    pub local_tax: Option<NamedAmount>,
    pub local_tax_per_capita_man: f64,
}

impl Highlights {
    pub fn generate(dataset: &Dataset, budget_type: BudgetType, settings: &Settings) -> Self {
        let ranked = ranked_rows(dataset, budget_type);
        let total: Amount = ranked.iter().map(|r| r.amount_current).sum();

        let largest = ranked.first().map(|r| NamedAmount {
            kuan: r.kuan.clone(),
            amount: r.amount_current,
        });
        let largest_share_pct = largest
            .as_ref()
            .map(|l| percent_or_zero(l.amount, total))
            .unwrap_or(0.0);

        // First row wins on equal magnitude
        let mut biggest_change: Option<NamedAmount> = None;
        for row in dataset.summaries(budget_type) {
            let bigger = biggest_change
                .as_ref()
                .map(|b| row.diff.abs() > b.amount.abs())
                .unwrap_or(true);
            if bigger {
                biggest_change = Some(NamedAmount {
                    kuan: row.kuan.clone(),
                    amount: row.diff,
                });
            }
        }

        let revenue_named = |name: &str| {
            dataset
                .summary_for(BudgetType::Revenue, name)
                .map(|s| NamedAmount {
                    kuan: s.kuan.clone(),
                    amount: s.amount_current,
                })
        };
        let donation = revenue_named(&settings.donation_kuan);
        let donation_share_pct = donation
            .as_ref()
            .map(|d| percent_or_zero(d.amount, total))
            .unwrap_or(0.0);
        let local_tax = revenue_named(&settings.local_tax_kuan);
        let local_tax_per_capita_man = local_tax
            .as_ref()
            .map(|t| per_capita_man(t.amount, settings.population))
            .unwrap_or(0.0);

        Self {
            budget_type,
            largest,
            largest_share_pct,
            biggest_change,
            donation,
            donation_share_pct,
            local_tax,
            local_tax_per_capita_man,
        }
    }

    /// Human-readable highlight lines for this side
    pub fn points(&self) -> Vec<String> {
        let mut points = Vec::new();

        if let Some(largest) = &self.largest {
            points.push(format!(
                "最大の款は{}（{}、全体の{}）",
                largest.kuan,
                largest.amount,
                format_share(self.largest_share_pct)
            ));
        }

        match self.budget_type {
            BudgetType::Expenditure => {
                if let Some(change) = &self.biggest_change {
                    points.push(format!(
                        "前年度から最も大きく動いたのは{}（{}）",
                        change.kuan,
                        change.amount.format_diff(false)
                    ));
                }
                if let Some(donation) = &self.donation {
                    points.push(format!(
                        "{}収入{}は歳出全体の{}に相当",
                        donation.kuan,
                        donation.amount,
                        format_share(self.donation_share_pct)
                    ));
                }
            }
            BudgetType::Revenue => {
                if let Some(donation) = &self.donation {
                    points.push(format!(
                        "{}は{}で歳入の{}",
                        donation.kuan,
                        donation.amount,
                        format_share(self.donation_share_pct)
                    ));
                }
                if let Some(tax) = &self.local_tax {
                    points.push(format!(
                        "{}は{}、町民1人あたり{}",
                        tax.kuan,
                        tax.amount,
                        format_man(self.local_tax_per_capita_man)
                    ));
                }
            }
        }

        points
    }

    /// Format the highlight list for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::from("ポイント\n");
        output.push_str(&display::report::separator(display::report::REPORT_WIDTH));
        output.push('\n');
        let points = self.points();
        if points.is_empty() {
            output.push_str("  データがありません（0件）\n");
        }
        for point in points {
            output.push_str(&format!("  ・{}\n", point));
        }
        output
    }
}
