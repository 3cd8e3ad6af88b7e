//! CLI commands for data export

use std::io::Write;
use std::path::PathBuf;

use clap::Subcommand;

use super::{create_output, ReportContext};
use crate::error::{BudgetError, BudgetResult};
use crate::export::{
    export_dashboard_json, export_dashboard_yaml, export_detail_csv, DEFAULT_FILE_NAME,
};
use crate::reports::DashboardView;
use crate::search::SearchQuery;

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export every line item of the selected side to CSV
    Csv {
        /// Output file path (defaults to budget_detail.csv in the current directory)
        output: Option<PathBuf>,
    },

    /// Export the dashboard view to JSON
    Json {
        /// Output file path
        output: PathBuf,

        /// Write compact JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },

    /// Export the dashboard view to YAML
    Yaml {
        /// Output file path
        output: PathBuf,
    },
}

/// Handle export commands
pub fn handle_export_command(ctx: ReportContext<'_>, cmd: ExportCommands) -> BudgetResult<()> {
    match cmd {
        ExportCommands::Csv { output } => {
            let output = output.unwrap_or_else(|| PathBuf::from(DEFAULT_FILE_NAME));
            let rows = SearchQuery::default().filter(ctx.dataset.details(ctx.budget_type));
            let mut writer = create_output(&output)?;
            let written = export_detail_csv(&rows, &mut writer)?;
            finish(writer)?;
            println!("{}件を書き出しました: {}", written, output.display());
        }
        ExportCommands::Json { output, compact } => {
            let view = DashboardView::generate(ctx.dataset, ctx.budget_type, ctx.settings);
            let mut writer = create_output(&output)?;
            export_dashboard_json(&view, &mut writer, !compact)?;
            finish(writer)?;
            println!("JSONを書き出しました: {}", output.display());
        }
        ExportCommands::Yaml { output } => {
            let view = DashboardView::generate(ctx.dataset, ctx.budget_type, ctx.settings);
            let mut writer = create_output(&output)?;
            export_dashboard_yaml(&view, &mut writer)?;
            finish(writer)?;
            println!("YAMLを書き出しました: {}", output.display());
        }
    }
    Ok(())
}

fn finish<W: Write>(mut writer: W) -> BudgetResult<()> {
    writer
        .flush()
        .map_err(|e| BudgetError::Export(e.to_string()))
}
