//! Line items (節) of the revenue and expenditure tables

use serde::{Deserialize, Serialize};

use super::amount::Amount;
use super::budget_type::BudgetType;

/// One line of the budget book: 款 > 項 > 目 > 節
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailRow {
    pub budget_type: BudgetType,
    /// Category (款)
    pub kuan: String,
    /// Sub-category (項)
    #[serde(default)]
    pub kou: Option<String>,
    /// Item (目)
    #[serde(default)]
    pub moku: Option<String>,
    /// Line (節)
    #[serde(default)]
    pub setsu: Option<String>,
    /// Item-level (目) amount, repeated on each line of the item; blank in
    /// some source rows
    #[serde(default)]
    pub amount_current: Option<Amount>,
    /// Line amount
    pub setsu_amount: Amount,
    /// Free-text explanation (説明)
    #[serde(default)]
    pub description: Option<String>,
    /// General-fund share of the line (expenditure only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src_general: Option<Amount>,
}

impl DetailRow {
    /// Create a line with the required fields; text levels start empty
    pub fn new(
        budget_type: BudgetType,
        kuan: impl Into<String>,
        amount_current: Amount,
        setsu_amount: Amount,
    ) -> Self {
        Self {
            budget_type,
            kuan: kuan.into(),
            kou: None,
            moku: None,
            setsu: None,
            amount_current: Some(amount_current),
            setsu_amount,
            description: None,
            src_general: None,
        }
    }

    /// Set the 項/目/節 names
    pub fn with_levels(
        mut self,
        kou: impl Into<String>,
        moku: impl Into<String>,
        setsu: impl Into<String>,
    ) -> Self {
        self.kou = Some(kou.into());
        self.moku = Some(moku.into());
        self.setsu = Some(setsu.into());
        self
    }

    /// Drop the item-level amount, as when the source cell is blank
    pub fn without_item_amount(mut self) -> Self {
        self.amount_current = None;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn kou_name(&self) -> &str {
        self.kou.as_deref().unwrap_or("")
    }

    pub fn moku_name(&self) -> &str {
        self.moku.as_deref().unwrap_or("")
    }

    pub fn setsu_name(&self) -> &str {
        self.setsu.as_deref().unwrap_or("")
    }

    pub fn description_text(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    /// Lower-cased "kuan kou moku setsu description" used for keyword search
    pub fn search_text(&self) -> String {
        [
            self.kuan.as_str(),
            self.kou_name(),
            self.moku_name(),
            self.setsu_name(),
            self.description_text(),
        ]
        .join(" ")
        .to_lowercase()
    }
}
