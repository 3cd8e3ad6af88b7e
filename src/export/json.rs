//! JSON export of the dashboard view

use std::io::Write;

use serde::Serialize;
use tracing::info;

use crate::error::{BudgetError, BudgetResult};
use crate::reports::DashboardView;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Export wrapper: metadata plus the flattened view
#[derive(Debug, Serialize)]
pub struct DashboardExport<'a> {
    pub schema_version: &'static str,
    pub app_version: &'static str,
    #[serde(flatten)]
    pub view: &'a DashboardView,
}

impl<'a> DashboardExport<'a> {
    pub fn new(view: &'a DashboardView) -> Self {
        Self {
            schema_version: EXPORT_SCHEMA_VERSION,
            app_version: env!("CARGO_PKG_VERSION"),
            view,
        }
    }
}

/// Export the dashboard view to JSON
pub fn export_dashboard_json<W: Write>(
    view: &DashboardView,
    writer: &mut W,
    pretty: bool,
) -> BudgetResult<()> {
    let export = DashboardExport::new(view);

    if pretty {
        serde_json::to_writer_pretty(&mut *writer, &export)
    } else {
        serde_json::to_writer(&mut *writer, &export)
    }
    .map_err(|e| BudgetError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| BudgetError::Export(e.to_string()))?;

    info!(budget_type = %view.budget_type, "dashboard JSON written");
    Ok(())
}
