//! Untyped rows as they come out of the source tables
//!
//! Every column is optional here. Conversion into the typed models decides
//! which gaps are tolerated and which send the row to quarantine.

use serde::{Deserialize, Deserializer, Serialize};

use crate::models::{Amount, BudgetType, DetailRow, FundingSources, SummaryRow};

/// A row that failed validation and was kept out of the dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuarantinedRow {
    /// Source table name
    pub table: String,
    /// 1-based position in the source table
    pub row: usize,
    pub reason: String,
}

/// Read a numeric cell written as text
///
/// Accepts thousands separators ("1,234") and whole-number floats ("500.0",
/// as dataframe tools write integer columns that contain gaps). Anything else
/// is treated as blank.
pub fn parse_int(text: &str) -> Option<i64> {
    let cleaned = text.trim().replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<i64>().ok().or_else(|| {
        cleaned
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(|f| f.round() as i64)
    })
}

fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let text: Option<String> = Option::deserialize(deserializer)?;
    Ok(text.as_deref().and_then(parse_int))
}

/// Row of the `summary` table
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawSummaryRow {
    #[serde(deserialize_with = "lenient_int")]
    pub kuan_no: Option<i64>,
    pub kuan: Option<String>,
    #[serde(rename = "type")]
    pub budget_type: Option<String>,
    #[serde(deserialize_with = "lenient_int")]
    pub amount_current: Option<i64>,
    #[serde(deserialize_with = "lenient_int")]
    pub amount_previous: Option<i64>,
    #[serde(deserialize_with = "lenient_int")]
    pub diff: Option<i64>,
    #[serde(deserialize_with = "lenient_int")]
    pub src_national: Option<i64>,
    #[serde(deserialize_with = "lenient_int")]
    pub src_bond: Option<i64>,
    #[serde(deserialize_with = "lenient_int")]
    pub src_other: Option<i64>,
    #[serde(deserialize_with = "lenient_int")]
    pub src_general: Option<i64>,
}

/// Row of the `revenue` or `expenditure` table
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawDetailRow {
    pub kuan: Option<String>,
    pub kou: Option<String>,
    pub moku: Option<String>,
    #[serde(deserialize_with = "lenient_int")]
    pub amount_current: Option<i64>,
    pub setsu: Option<String>,
    #[serde(deserialize_with = "lenient_int")]
    pub setsu_amount: Option<i64>,
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient_int")]
    pub src_general: Option<i64>,
}

fn required_text(value: Option<String>, column: &str) -> Result<String, String> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text.trim().to_string()),
        _ => Err(format!("missing {}", column)),
    }
}

fn required_amount(value: Option<i64>, column: &str) -> Result<Amount, String> {
    value
        .map(Amount::from_thousands)
        .ok_or_else(|| format!("missing {}", column))
}

impl RawSummaryRow {
    /// Validate into a typed row; `position` is the 1-based source row
    pub fn into_summary(self, position: usize) -> Result<SummaryRow, String> {
        let kuan = required_text(self.kuan, "kuan")?;
        let budget_type: BudgetType = required_text(self.budget_type, "type")?
            .parse()
            .map_err(|e| format!("{}", e))?;
        let amount_current = required_amount(self.amount_current, "amount_current")?;
        let amount_previous = required_amount(self.amount_previous, "amount_previous")?;

        let mut row = SummaryRow::new(
            self.kuan_no.unwrap_or(position as i64),
            kuan,
            budget_type,
            amount_current,
            amount_previous,
        );
        if let Some(stored) = self.diff {
            row.diff = Amount::from_thousands(stored);
        }

        if budget_type == BudgetType::Expenditure {
            let source = |v: Option<i64>| Amount::from_thousands(v.unwrap_or(0));
            row.funding = Some(FundingSources {
                national: source(self.src_national),
                bond: source(self.src_bond),
                other: source(self.src_other),
                general: source(self.src_general),
            });
        }

        Ok(row)
    }
}

impl RawDetailRow {
    /// Validate into a typed line item of the given side
    pub fn into_detail(self, budget_type: BudgetType) -> Result<DetailRow, String> {
        let kuan = required_text(self.kuan, "kuan")?;
        let setsu_amount = required_amount(self.setsu_amount, "setsu_amount")?;

        Ok(DetailRow {
            budget_type,
            kuan,
            kou: self.kou,
            moku: self.moku,
            setsu: self.setsu,
            amount_current: self.amount_current.map(Amount::from_thousands),
            setsu_amount,
            description: self.description,
            src_general: match budget_type {
                BudgetType::Expenditure => self.src_general.map(Amount::from_thousands),
                BudgetType::Revenue => None,
            },
        })
    }
}

/// The three tables before validation
#[derive(Debug, Clone, Default)]
pub struct RawTables {
    pub summary: Vec<RawSummaryRow>,
    pub revenue: Vec<RawDetailRow>,
    pub expenditure: Vec<RawDetailRow>,
}
