//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the report layer.

pub mod chart;
pub mod config;
pub mod export;
pub mod import;
pub mod report;

pub use chart::{handle_chart_command, ChartCommands};
pub use config::{handle_config_command, init_settings, ConfigCommands};
pub use export::{handle_export_command, ExportCommands};
pub use import::handle_import_command;
pub use report::{handle_check, handle_kuan, handle_overview, handle_search};

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::config::Settings;
use crate::error::{BudgetError, BudgetResult};
use crate::models::BudgetType;
use crate::storage::Dataset;

/// What the report commands work on
#[derive(Debug, Clone, Copy)]
pub struct ReportContext<'a> {
    pub dataset: &'a Dataset,
    pub settings: &'a Settings,
    pub budget_type: BudgetType,
}

/// Open an output file for writing
pub(crate) fn create_output(path: &Path) -> BudgetResult<BufWriter<File>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            BudgetError::Export(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }
    let file = File::create(path).map_err(|e| {
        BudgetError::Export(format!("Failed to create file {}: {}", path.display(), e))
    })?;
    Ok(BufWriter::new(file))
}
