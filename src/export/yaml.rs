//! YAML export of the dashboard view

use std::io::Write;

use tracing::info;

use super::json::DashboardExport;
use crate::error::{BudgetError, BudgetResult};
use crate::reports::DashboardView;

/// Export the dashboard view to YAML with a short comment header
pub fn export_dashboard_yaml<W: Write>(view: &DashboardView, writer: &mut W) -> BudgetResult<()> {
    let export = DashboardExport::new(view);

    writeln!(
        writer,
        "# {} {} {}",
        view.municipality,
        view.fiscal_year,
        view.budget_type.label()
    )
    .map_err(|e| BudgetError::Export(e.to_string()))?;
    writeln!(writer, "# Amounts are in thousand yen").map_err(|e| BudgetError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| BudgetError::Export(e.to_string()))?;

    serde_yaml::to_writer(&mut *writer, &export).map_err(|e| BudgetError::Export(e.to_string()))?;

    info!(budget_type = %view.budget_type, "dashboard YAML written");
    Ok(())
}
