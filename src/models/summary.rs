//! Per-category summary rows (款別集計)
//!
//! One row per kuan and budget side, carrying this year's and last year's
//! totals. Expenditure rows also say where the money comes from.

use serde::{Deserialize, Serialize};

use super::amount::Amount;
use super::budget_type::BudgetType;

/// Funding-source breakdown of an expenditure category (財源内訳)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FundingSources {
    /// National and prefectural subsidies (国・県支出金)
    pub national: Amount,
    /// Local bonds (地方債)
    pub bond: Amount,
    /// Other specific revenue such as donations and fund transfers
    pub other: Amount,
    /// General fund (一般財源)
    pub general: Amount,
}

impl FundingSources {
    pub fn total(&self) -> Amount {
        self.national + self.bond + self.other + self.general
    }

    /// Sources in display order with their Japanese labels
    pub fn labeled(&self) -> [(&'static str, Amount); 4] {
        [
            ("国・県からの補助", self.national),
            ("借入（地方債）", self.bond),
            ("その他（寄附金・繰入金等）", self.other),
            ("町の一般財源", self.general),
        ]
    }
}

/// A budget category (款) total for one side of the account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRow {
    /// Ordinal of the category in the budget book
    pub kuan_no: i64,
    /// Category name
    pub kuan: String,
    /// Expenditure or revenue
    pub budget_type: BudgetType,
    /// This fiscal year
    pub amount_current: Amount,
    /// Previous fiscal year
    pub amount_previous: Amount,
    /// Stored difference (current - previous)
    pub diff: Amount,
    /// Expenditure only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funding: Option<FundingSources>,
}

impl SummaryRow {
    /// Build a row whose diff is derived from the two amounts
    pub fn new(
        kuan_no: i64,
        kuan: impl Into<String>,
        budget_type: BudgetType,
        amount_current: Amount,
        amount_previous: Amount,
    ) -> Self {
        Self {
            kuan_no,
            kuan: kuan.into(),
            budget_type,
            amount_current,
            amount_previous,
            diff: amount_current - amount_previous,
            funding: None,
        }
    }

    pub fn with_funding(mut self, funding: FundingSources) -> Self {
        self.funding = Some(funding);
        self
    }

    /// current - previous, independent of the stored diff column
    pub fn computed_diff(&self) -> Amount {
        self.amount_current - self.amount_previous
    }

    /// Whether the stored diff agrees with the two amounts
    pub fn diff_is_consistent(&self) -> bool {
        self.diff == self.computed_diff()
    }

    /// Whether the funding sources add up to the current amount
    ///
    /// Rows without a breakdown are consistent by definition.
    pub fn funding_is_consistent(&self) -> bool {
        self.funding
            .map(|f| f.total() == self.amount_current)
            .unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_derives_diff() {
        let row = SummaryRow::new(
            2,
            "総務費",
            BudgetType::Expenditure,
            Amount::from_thousands(500_000),
            Amount::from_thousands(480_000),
        );
        assert_eq!(row.diff.thousands(), 20_000);
        assert!(row.diff_is_consistent());
        assert!(row.funding_is_consistent());
    }

    #[test]
    fn test_inconsistent_stored_diff() {
        let mut row = SummaryRow::new(
            1,
            "議会費",
            BudgetType::Expenditure,
            Amount::from_thousands(100),
            Amount::from_thousands(90),
        );
        row.diff = Amount::from_thousands(5);
        assert!(!row.diff_is_consistent());
        assert_eq!(row.computed_diff().thousands(), 10);
    }

    #[test]
    fn test_funding_total() {
        let funding = FundingSources {
            national: Amount::from_thousands(10),
            bond: Amount::from_thousands(20),
            other: Amount::from_thousands(30),
            general: Amount::from_thousands(40),
        };
        let row = SummaryRow::new(
            3,
            "民生費",
            BudgetType::Expenditure,
            Amount::from_thousands(100),
            Amount::from_thousands(100),
        )
        .with_funding(funding);

        assert_eq!(funding.total().thousands(), 100);
        assert!(row.funding_is_consistent());
        assert_eq!(funding.labeled()[3].0, "町の一般財源");
    }
}
