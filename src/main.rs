use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use municipal_budget::cli::{
    handle_chart_command, handle_check, handle_config_command, handle_export_command,
    handle_import_command, handle_kuan, handle_overview, handle_search, init_settings,
    ChartCommands, ConfigCommands, ExportCommands, ReportContext,
};
use municipal_budget::config::{BudgetPaths, Settings};
use municipal_budget::models::BudgetType;
use municipal_budget::reports::RollupPolicy;
use municipal_budget::storage::DatasetLoader;

#[derive(Parser)]
#[command(
    name = "mbudget",
    version,
    about = "Terminal report for a municipal general-account budget",
    long_about = "mbudget reads a town's budget tables (category totals and line items \
                  for revenue and expenditure) and shows totals, rankings, year-over-year \
                  changes, funding sources and keyword search in the terminal."
)]
struct Cli {
    /// Dataset: a SQLite file or a directory of summary/revenue/expenditure CSV files
    #[arg(long, global = true, env = "MUNICIPAL_BUDGET_DATA")]
    data: Option<PathBuf>,

    /// Budget side: expenditure (歳出) or revenue (歳入)
    #[arg(short = 't', long = "type", global = true, default_value = "expenditure")]
    budget_type: BudgetType,

    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Total, change against last year, highlights and composition
    #[command(alias = "summary")]
    Overview,

    /// Category charts
    #[command(subcommand)]
    Chart(ChartCommands),

    /// Drill into a category; lists categories when no name is given
    Kuan {
        /// Category name (款)
        name: Option<String>,

        /// How item amounts of one (項, 目) group are combined: first, sum or max
        #[arg(short, long, default_value = "first")]
        policy: RollupPolicy,

        /// Number of groups in the chart
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Search line items; every keyword must match
    #[command(alias = "find")]
    Search {
        /// Keywords
        query: Vec<String>,

        /// Write the hits to a CSV file instead of the terminal
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Show at most this many rows
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Export data
    #[command(subcommand)]
    Export(ExportCommands),

    /// Build a SQLite dataset from a directory of CSV files
    Import {
        /// Directory holding summary.csv, revenue.csv and expenditure.csv
        csv_dir: PathBuf,

        /// Target database (defaults to the configured dataset)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Report figures that disagree with each other
    Check,

    /// Show current configuration and paths
    Config {
        #[command(subcommand)]
        action: Option<ConfigCommands>,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Initialize paths and settings
    let paths = BudgetPaths::new()?;
    if let Commands::Config {
        action: Some(ConfigCommands::Init { force }),
    } = &cli.command
    {
        init_settings(&paths, *force)?;
        return Ok(());
    }
    let settings = Settings::load_or_create(&paths)?;
    let dataset_path = settings.dataset_location(&paths, cli.data.as_deref());
    debug!(path = %dataset_path.display(), "dataset location resolved");

    // Commands that do not read the dataset
    let command = match cli.command {
        Commands::Import { csv_dir, output } => {
            let target = output.unwrap_or(dataset_path);
            handle_import_command(&csv_dir, &target)?;
            return Ok(());
        }
        Commands::Config { action } => {
            handle_config_command(&paths, &settings, cli.data.as_deref(), action)?;
            return Ok(());
        }
        other => other,
    };

    let loader = DatasetLoader::new(&dataset_path);
    let dataset = loader
        .get()
        .with_context(|| format!("Failed to load dataset from {}", dataset_path.display()))?;
    let ctx = ReportContext {
        dataset,
        settings: &settings,
        budget_type: cli.budget_type,
    };

    match command {
        Commands::Overview => handle_overview(ctx)?,
        Commands::Chart(cmd) => handle_chart_command(ctx, cmd)?,
        Commands::Kuan {
            name,
            policy,
            limit,
        } => handle_kuan(ctx, name, policy, limit)?,
        Commands::Search {
            query,
            output,
            limit,
        } => handle_search(ctx, query, output, limit)?,
        Commands::Export(cmd) => handle_export_command(ctx, cmd)?,
        Commands::Check => handle_check(ctx)?,
        Commands::Import { .. } | Commands::Config { .. } => {}
    }

    Ok(())
}
