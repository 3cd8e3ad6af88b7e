//! Core data models
//!
//! Typed records for the three budget tables plus the amount and budget-side
//! value types they share.

pub mod amount;
pub mod budget_type;
pub mod detail;
pub mod summary;

pub use amount::Amount;
pub use budget_type::{BudgetType, BudgetTypeParseError};
pub use detail::DetailRow;
pub use summary::{FundingSources, SummaryRow};
