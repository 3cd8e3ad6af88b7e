//! Path management for the budget report
//!
//! ## Path Resolution Order
//!
//! 1. `MUNICIPAL_BUDGET_DIR` environment variable (if set)
//! 2. The platform configuration directory (`~/.config/municipal-budget` on Linux)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::BudgetError;

/// Environment variable that overrides the base directory
pub const BASE_DIR_ENV: &str = "MUNICIPAL_BUDGET_DIR";

/// Manages all paths used by the budget report
#[derive(Debug, Clone)]
pub struct BudgetPaths {
    /// Base directory for configuration and the default dataset
    base_dir: PathBuf,
}

impl BudgetPaths {
    /// Create a new BudgetPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined and the
    /// override variable is unset.
    pub fn new() -> Result<Self, BudgetError> {
        let base_dir = if let Ok(custom) = std::env::var(BASE_DIR_ENV) {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create BudgetPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (`<base>/data/`)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Default location of the SQLite dataset
    pub fn default_dataset(&self) -> PathBuf {
        self.data_dir().join("budget.db")
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), BudgetError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| BudgetError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| BudgetError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }
}

fn resolve_default_path() -> Result<PathBuf, BudgetError> {
    ProjectDirs::from("", "", "municipal-budget")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| BudgetError::Config("Could not determine a configuration directory".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.data_dir(), temp_dir.path().join("data"));
        assert_eq!(
            paths.default_dataset(),
            temp_dir.path().join("data").join("budget.db")
        );
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPaths::with_base_dir(temp_dir.path().join("nested"));

        paths.ensure_directories().unwrap();

        assert!(paths.data_dir().exists());
    }

    #[test]
    fn test_settings_file_path() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
    }
}
