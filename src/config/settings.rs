//! Report settings
//!
//! Holds everything about the municipality and the report layout that is not
//! part of the dataset itself: population for per-capita figures, chart sizes,
//! the color palette and the names of the categories the highlights refer to.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::paths::BudgetPaths;
use crate::error::BudgetError;

/// Report settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Municipality name shown in report headers
    #[serde(default = "default_municipality")]
    pub municipality: String,

    /// Fiscal year label (e.g. "令和8年度")
    #[serde(default = "default_fiscal_year")]
    pub fiscal_year: String,

    /// Resident population used for per-capita amounts
    #[serde(default = "default_population")]
    pub population: u64,

    /// Dataset location; falls back to `<base>/data/budget.db`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_path: Option<PathBuf>,

    /// Number of named slices in the composition view
    #[serde(default = "default_top_n")]
    pub composition_top_n: usize,

    /// Maximum number of groups in the drill-down rollup chart
    #[serde(default = "default_rollup_limit")]
    pub rollup_limit: usize,

    /// Category colors, assigned in descending-amount order
    #[serde(default = "default_palette")]
    pub palette: Vec<String>,

    /// Label of the synthetic remainder slice
    #[serde(default = "default_other_label")]
    pub other_label: String,

    /// Color of the synthetic remainder slice
    #[serde(default = "default_other_color")]
    pub other_color: String,

    /// Revenue category holding hometown-tax donations
    #[serde(default = "default_donation_kuan")]
    pub donation_kuan: String,

    /// Revenue category holding local taxes
    #[serde(default = "default_local_tax_kuan")]
    pub local_tax_kuan: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_municipality() -> String {
    "太良町".to_string()
}

fn default_fiscal_year() -> String {
    "令和8年度".to_string()
}

fn default_population() -> u64 {
    7_669
}

fn default_top_n() -> usize {
    5
}

fn default_rollup_limit() -> usize {
    15
}

fn default_palette() -> Vec<String> {
    [
        "#2563eb", "#f97316", "#22c55e", "#a855f7", "#06b6d4", "#f43f5e", "#eab308", "#ec4899",
        "#14b8a6", "#6366f1", "#84cc16", "#f97316", "#8b5cf6", "#94a3b8",
    ]
    .iter()
    .map(|c| c.to_string())
    .collect()
}

fn default_other_label() -> String {
    "その他".to_string()
}

fn default_other_color() -> String {
    "#94a3b8".to_string()
}

fn default_donation_kuan() -> String {
    "寄附金".to_string()
}

fn default_local_tax_kuan() -> String {
    "町税".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            municipality: default_municipality(),
            fiscal_year: default_fiscal_year(),
            population: default_population(),
            dataset_path: None,
            composition_top_n: default_top_n(),
            rollup_limit: default_rollup_limit(),
            palette: default_palette(),
            other_label: default_other_label(),
            other_color: default_other_color(),
            donation_kuan: default_donation_kuan(),
            local_tax_kuan: default_local_tax_kuan(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or use defaults if the file doesn't exist
    pub fn load_or_create(paths: &BudgetPaths) -> Result<Self, BudgetError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| BudgetError::Io(format!("Failed to read settings file: {}", e)))?;

        let settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| BudgetError::Config(format!("Failed to parse settings file: {}", e)))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &BudgetPaths) -> Result<(), BudgetError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| BudgetError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| BudgetError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Reject settings the reports cannot work with
    pub fn validate(&self) -> Result<(), BudgetError> {
        if self.palette.is_empty() {
            return Err(BudgetError::Config("palette must contain at least one color".into()));
        }
        if self.composition_top_n == 0 {
            return Err(BudgetError::Config("composition_top_n must be at least 1".into()));
        }
        Ok(())
    }

    /// Resolve the dataset location, preferring an explicit override
    pub fn dataset_location(&self, paths: &BudgetPaths, cli_override: Option<&Path>) -> PathBuf {
        cli_override
            .map(Path::to_path_buf)
            .or_else(|| self.dataset_path.clone())
            .unwrap_or_else(|| paths.default_dataset())
    }
}
