//! CSV export of line items
//!
//! Writes the search result table the way spreadsheet users expect it:
//! Japanese column headers, UTF-8 with a byte-order mark so Excel picks the
//! right encoding, comma separated.

use std::io::Write;

use tracing::info;

use crate::error::{BudgetError, BudgetResult};
use crate::models::DetailRow;

/// UTF-8 byte-order mark
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// File name used when no output path is given
pub const DEFAULT_FILE_NAME: &str = "budget_detail.csv";

/// Column headers, in order
pub const DETAIL_HEADERS: [&str; 6] = ["款", "項", "目", "節", "金額(千円)", "説明"];

/// Export line items to CSV, returning the number of data rows written
pub fn export_detail_csv<W: Write>(rows: &[&DetailRow], writer: &mut W) -> BudgetResult<usize> {
    writer
        .write_all(UTF8_BOM)
        .map_err(|e| BudgetError::Export(e.to_string()))?;

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer
        .write_record(DETAIL_HEADERS)
        .map_err(|e| BudgetError::Export(e.to_string()))?;

    for row in rows {
        let amount = row.setsu_amount.thousands().to_string();
        csv_writer
            .write_record([
                row.kuan.as_str(),
                row.kou_name(),
                row.moku_name(),
                row.setsu_name(),
                amount.as_str(),
                row.description_text(),
            ])
            .map_err(|e| BudgetError::Export(e.to_string()))?;
    }

    csv_writer
        .flush()
        .map_err(|e| BudgetError::Export(e.to_string()))?;

    info!(rows = rows.len(), "detail CSV written");
    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Amount, BudgetType};

    fn row(moku: &str, amount: i64, description: Option<&str>) -> DetailRow {
        let row = DetailRow::new(
            BudgetType::Expenditure,
            "教育費",
            Amount::from_thousands(amount),
            Amount::from_thousands(amount),
        )
        .with_levels("中学校費", moku, "工事請負費");
        match description {
            Some(d) => row.with_description(d),
            None => row,
        }
    }

    #[test]
    fn test_export_has_bom_and_headers() {
        let rows = [row("学校管理費", 300_000, Some("体育館, 屋根改修"))];
        let refs: Vec<&DetailRow> = rows.iter().collect();
        let mut out = Vec::new();

        let written = export_detail_csv(&refs, &mut out).unwrap();
        assert_eq!(written, 1);
        assert!(out.starts_with(UTF8_BOM));

        let text = String::from_utf8(out[UTF8_BOM.len()..].to_vec()).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("款,項,目,節,金額(千円),説明"));
        assert_eq!(
            lines.next(),
            Some("教育費,中学校費,学校管理費,工事請負費,300000,\"体育館, 屋根改修\"")
        );
    }

    #[test]
    fn test_missing_description_is_empty_field() {
        let rows = [row("教育振興費", 12, None)];
        let refs: Vec<&DetailRow> = rows.iter().collect();
        let mut out = Vec::new();
        export_detail_csv(&refs, &mut out).unwrap();

        let text = String::from_utf8(out[UTF8_BOM.len()..].to_vec()).unwrap();
        assert!(text.lines().any(|l| l == "教育費,中学校費,教育振興費,工事請負費,12,"));
    }

    #[test]
    fn test_empty_export_still_has_header() {
        let mut out = Vec::new();
        assert_eq!(export_detail_csv(&[], &mut out).unwrap(), 0);
        let text = String::from_utf8(out[UTF8_BOM.len()..].to_vec()).unwrap();
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn test_export_reads_back_with_csv_reader() {
        let rows = [row("学校管理費", 5, Some("改行\nを含む説明"))];
        let refs: Vec<&DetailRow> = rows.iter().collect();
        let mut out = Vec::new();
        export_detail_csv(&refs, &mut out).unwrap();

        let mut reader = ::csv::Reader::from_reader(&out[UTF8_BOM.len()..]);
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[5], "改行\nを含む説明");
    }
}
