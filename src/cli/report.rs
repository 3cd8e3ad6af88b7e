//! CLI commands for the overview, drill-down, search and check screens

use std::io::Write;
use std::path::PathBuf;

use tabled::Tabled;

use super::{create_output, ReportContext};
use crate::display;
use crate::error::{BudgetError, BudgetResult};
use crate::export::export_detail_csv;
use crate::format::format_thousands;
use crate::models::SummaryRow;
use crate::reports::{ConsistencyReport, DashboardView, KuanDrilldown, RollupPolicy};
use crate::search::SearchQuery;

/// Show the overview screen
pub fn handle_overview(ctx: ReportContext<'_>) -> BudgetResult<()> {
    let view = DashboardView::generate(ctx.dataset, ctx.budget_type, ctx.settings);
    print!("{}", view.format_terminal());
    Ok(())
}

#[derive(Tabled)]
struct KuanIndexLine {
    #[tabled(rename = "No.")]
    kuan_no: i64,
    #[tabled(rename = "款")]
    kuan: String,
    #[tabled(rename = "本年度")]
    current: String,
    #[tabled(rename = "増減")]
    diff: String,
}

/// Drill into one category, or list the categories when no name is given
pub fn handle_kuan(
    ctx: ReportContext<'_>,
    name: Option<String>,
    policy: RollupPolicy,
    limit: Option<usize>,
) -> BudgetResult<()> {
    let Some(name) = name else {
        let mut rows: Vec<&SummaryRow> = ctx.dataset.summaries(ctx.budget_type).collect();
        rows.sort_by_key(|s| s.kuan_no);

        print!(
            "{}",
            display::title(&format!("{} 款一覧", ctx.budget_type.label()))
        );
        if rows.is_empty() {
            println!("該当する款がありません（0件）");
            return Ok(());
        }
        let lines = rows.iter().map(|s| KuanIndexLine {
            kuan_no: s.kuan_no,
            kuan: s.kuan.clone(),
            current: s.amount_current.format(false),
            diff: s.diff.format_diff(false),
        });
        println!("{}", display::render(lines, &[0, 2, 3]));
        return Ok(());
    };

    let limit = limit.unwrap_or(ctx.settings.rollup_limit);
    let drill = KuanDrilldown::generate(ctx.dataset, ctx.budget_type, name.trim(), policy, limit)?;
    print!("{}", drill.format_terminal());
    Ok(())
}

#[derive(Tabled)]
struct SearchLine {
    #[tabled(rename = "款")]
    kuan: String,
    #[tabled(rename = "項")]
    kou: String,
    #[tabled(rename = "目")]
    moku: String,
    #[tabled(rename = "節")]
    setsu: String,
    #[tabled(rename = "金額(千円)")]
    amount: String,
    #[tabled(rename = "説明")]
    description: String,
}

/// Search line items and show or export the hits
pub fn handle_search(
    ctx: ReportContext<'_>,
    query: Vec<String>,
    output: Option<PathBuf>,
    limit: Option<usize>,
) -> BudgetResult<()> {
    let query = SearchQuery::parse(&query.join(" "));
    let hits = query.filter(ctx.dataset.details(ctx.budget_type));

    if let Some(path) = output {
        let mut writer = create_output(&path)?;
        let written = export_detail_csv(&hits, &mut writer)?;
        writer
            .flush()
            .map_err(|e| BudgetError::Export(e.to_string()))?;
        println!("{}件を書き出しました: {}", written, path.display());
        return Ok(());
    }

    let heading = if query.is_empty() {
        format!("{} 明細一覧", ctx.budget_type.label())
    } else {
        format!("{} 明細検索: {}", ctx.budget_type.label(), query.raw().trim())
    };
    print!("{}", display::title(&heading));
    println!("該当 {}件", hits.len());
    if hits.is_empty() {
        return Ok(());
    }

    let shown = limit.unwrap_or(hits.len()).min(hits.len());
    let lines = hits[..shown].iter().map(|d| SearchLine {
        kuan: d.kuan.clone(),
        kou: d.kou_name().to_string(),
        moku: d.moku_name().to_string(),
        setsu: d.setsu_name().to_string(),
        amount: format_thousands(d.setsu_amount.thousands()),
        description: display::truncate(d.description_text(), 40),
    });
    println!("{}", display::render(lines, &[4]));
    if shown < hits.len() {
        println!("（上位{}件を表示）", shown);
    }
    Ok(())
}

/// Run the consistency check
pub fn handle_check(ctx: ReportContext<'_>) -> BudgetResult<()> {
    let report = ConsistencyReport::generate(ctx.dataset);
    print!("{}", report.format_terminal());
    Ok(())
}
