//! CLI commands for the category charts

use clap::Subcommand;

use super::ReportContext;
use crate::config::Settings;
use crate::error::BudgetResult;
use crate::reports::{ComparisonReport, CompositionReport, FundingReport, RankedReport};

/// Chart subcommands
#[derive(Subcommand, Debug)]
pub enum ChartCommands {
    /// All categories ranked by this year's amount
    #[command(alias = "bar")]
    Ranked,

    /// The largest categories plus everything else
    #[command(alias = "pie")]
    Composition {
        /// Number of categories shown before the remainder
        #[arg(short = 'n', long)]
        top: Option<usize>,
    },

    /// Change against the previous year per category
    #[command(alias = "yoy")]
    Comparison,

    /// Funding sources of expenditure categories
    Funding,
}

/// Handle chart commands
pub fn handle_chart_command(ctx: ReportContext<'_>, cmd: ChartCommands) -> BudgetResult<()> {
    let output = match cmd {
        ChartCommands::Ranked => {
            RankedReport::generate(ctx.dataset, ctx.budget_type, &ctx.settings.palette)
                .format_terminal()
        }
        ChartCommands::Composition { top } => {
            let settings = match top {
                Some(n) => {
                    let settings = Settings {
                        composition_top_n: n,
                        ..ctx.settings.clone()
                    };
                    settings.validate()?;
                    settings
                }
                None => ctx.settings.clone(),
            };
            CompositionReport::generate(ctx.dataset, ctx.budget_type, &settings).format_terminal()
        }
        ChartCommands::Comparison => {
            ComparisonReport::generate(ctx.dataset, ctx.budget_type).format_terminal()
        }
        ChartCommands::Funding => FundingReport::generate(ctx.dataset).format_terminal(),
    };

    print!("{}", output);
    Ok(())
}
