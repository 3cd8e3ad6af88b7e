//! Budget side: expenditure (歳出) or revenue (歳入)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which side of the general account a row belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BudgetType {
    /// 歳出
    #[default]
    Expenditure,
    /// 歳入
    Revenue,
}

impl BudgetType {
    /// Japanese label used in the source tables and report headers
    pub fn label(&self) -> &'static str {
        match self {
            Self::Expenditure => "歳出",
            Self::Revenue => "歳入",
        }
    }

    /// Name of the detail table holding this side's line items
    pub fn detail_table(&self) -> &'static str {
        match self {
            Self::Expenditure => "expenditure",
            Self::Revenue => "revenue",
        }
    }

    pub fn all() -> [BudgetType; 2] {
        [Self::Expenditure, Self::Revenue]
    }
}

impl fmt::Display for BudgetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error for an unrecognised budget type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetTypeParseError(pub String);

impl fmt::Display for BudgetTypeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown budget type '{}' (expected 歳出/expenditure or 歳入/revenue)",
            self.0
        )
    }
}

impl std::error::Error for BudgetTypeParseError {}

impl FromStr for BudgetType {
    type Err = BudgetTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "歳出" | "expenditure" | "exp" => Ok(Self::Expenditure),
            "歳入" | "revenue" | "rev" => Ok(Self::Revenue),
            other => Err(BudgetTypeParseError(other.to_string())),
        }
    }
}
