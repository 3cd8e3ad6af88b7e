//! CLI commands for configuration

use std::path::Path;

use clap::Subcommand;

use crate::config::{BudgetPaths, Settings};
use crate::error::{BudgetError, BudgetResult};

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write the default settings file
    Init {
        /// Overwrite an existing settings file
        #[arg(long)]
        force: bool,
    },
}

/// Handle config commands; without a subcommand the resolved configuration is shown
pub fn handle_config_command(
    paths: &BudgetPaths,
    settings: &Settings,
    data_override: Option<&Path>,
    cmd: Option<ConfigCommands>,
) -> BudgetResult<()> {
    match cmd {
        None => {
            println!("Municipal Budget Configuration");
            println!("==============================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Settings file:  {}", paths.settings_file().display());
            println!(
                "Dataset:        {}",
                settings.dataset_location(paths, data_override).display()
            );
            println!();
            println!("Settings:");
            println!("  Municipality:    {}", settings.municipality);
            println!("  Fiscal year:     {}", settings.fiscal_year);
            println!("  Population:      {}", settings.population);
            println!("  Top categories:  {}", settings.composition_top_n);
            println!("  Rollup limit:    {}", settings.rollup_limit);
            println!("  Palette colors:  {}", settings.palette.len());
            println!("  Other label:     {} ({})", settings.other_label, settings.other_color);
            println!("  Donation kuan:   {}", settings.donation_kuan);
            println!("  Local tax kuan:  {}", settings.local_tax_kuan);
        }
        Some(ConfigCommands::Init { force }) => init_settings(paths, force)?,
    }
    Ok(())
}

/// Write the default settings file
///
/// Does not read the existing file, so `--force` can replace one that no
/// longer parses.
pub fn init_settings(paths: &BudgetPaths, force: bool) -> BudgetResult<()> {
    let target = paths.settings_file();
    if target.exists() && !force {
        return Err(BudgetError::Config(format!(
            "Settings file already exists: {} (use --force to overwrite)",
            target.display()
        )));
    }
    Settings::default().save(paths)?;
    println!("Wrote default settings to {}", target.display());
    Ok(())
}
