//! Combined view of one budget side, as exported to JSON and YAML

use serde::Serialize;

use super::{
    CategoryTotals, ComparisonReport, CompositionReport, FundingReport, HeroMetrics, Highlights,
    RankedReport,
};
use crate::config::Settings;
use crate::models::BudgetType;
use crate::storage::Dataset;

/// Every derived view for one budget side
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub municipality: String,
    pub fiscal_year: String,
    pub budget_type: BudgetType,
    pub totals: CategoryTotals,
    pub hero: HeroMetrics,
    pub highlights: Highlights,
    pub ranked: RankedReport,
    pub composition: CompositionReport,
    pub comparison: ComparisonReport,
    /// Expenditure only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub funding: Option<FundingReport>,
}

impl DashboardView {
    pub fn generate(dataset: &Dataset, budget_type: BudgetType, settings: &Settings) -> Self {
        let funding = match budget_type {
            BudgetType::Expenditure => Some(FundingReport::generate(dataset)),
            BudgetType::Revenue => None,
        };

        Self {
            municipality: settings.municipality.clone(),
            fiscal_year: settings.fiscal_year.clone(),
            budget_type,
            totals: CategoryTotals::generate(dataset, budget_type),
            hero: HeroMetrics::generate(dataset, budget_type, settings),
            highlights: Highlights::generate(dataset, budget_type, settings),
            ranked: RankedReport::generate(dataset, budget_type, &settings.palette),
            composition: CompositionReport::generate(dataset, budget_type, settings),
            comparison: ComparisonReport::generate(dataset, budget_type),
            funding,
        }
    }

    /// Overview screen: hero card, highlights and composition
    pub fn format_terminal(&self) -> String {
        let mut output = self.hero.format_terminal();
        output.push('\n');
        output.push_str(&self.highlights.format_terminal());
        output.push('\n');
        output.push_str(&self.composition.format_terminal());
        output
    }
}
