//! Export module
//!
//! - CSV: line items for spreadsheets
//! - JSON: the dashboard view for machines
//! - YAML: the dashboard view for people

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::{export_detail_csv, DEFAULT_FILE_NAME, DETAIL_HEADERS, UTF8_BOM};
pub use json::{export_dashboard_json, DashboardExport, EXPORT_SCHEMA_VERSION};
pub use yaml::export_dashboard_yaml;
