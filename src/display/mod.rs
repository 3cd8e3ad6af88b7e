//! Display formatting for terminal output
//!
//! Text bars, tables and colors used by the report views.

pub mod report;
pub mod table;

pub use report::{amount_bar, format_bar, paint, title, truncate, Tone};
pub use table::render;
