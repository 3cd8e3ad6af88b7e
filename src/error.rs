//! Custom error types for the budget report
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for budget report operations
#[derive(Error, Debug)]
pub enum BudgetError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Dataset storage errors (SQLite or CSV source)
    #[error("Storage error: {0}")]
    Storage(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),
}

impl BudgetError {
    /// Create a "not found" error for a budget category (kuan)
    pub fn kuan_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Budget category",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for a dataset table
    pub fn table_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Table",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<std::io::Error> for BudgetError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BudgetError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<rusqlite::Error> for BudgetError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<csv::Error> for BudgetError {
    fn from(err: csv::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

/// Result type alias for budget report operations
pub type BudgetResult<T> = Result<T, BudgetError>;

/// A percentage was requested against a zero denominator
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("percentage is undefined for a zero base")]
pub struct UndefinedPercentage;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BudgetError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = BudgetError::kuan_not_found("総務費");
        assert_eq!(err.to_string(), "Budget category not found: 総務費");
        assert!(err.is_not_found());
        assert!(!BudgetError::Export("disk full".into()).is_not_found());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let budget_err: BudgetError = io_err.into();
        assert!(matches!(budget_err, BudgetError::Io(_)));
    }

    #[test]
    fn test_from_sqlite_error() {
        let err: BudgetError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, BudgetError::Storage(_)));
    }
}
