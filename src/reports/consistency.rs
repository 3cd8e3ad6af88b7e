//! Consistency check of the loaded tables
//!
//! Reports figures that disagree with each other. Nothing here is fatal: the
//! other reports still work on an inconsistent dataset.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use tracing::{debug, info};

use crate::display;
use crate::models::{Amount, BudgetType, DetailRow};
use crate::storage::{Dataset, QuarantinedRow};

/// One disagreement found in the dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConsistencyIssue {
    /// Stored diff is not current - previous
    DiffMismatch {
        budget_type: BudgetType,
        kuan: String,
        stored: Amount,
        computed: Amount,
    },
    /// Funding sources do not add up to the current amount
    FundingMismatch {
        kuan: String,
        funding_total: Amount,
        amount_current: Amount,
    },
    /// Lines under a category that has no summary row
    OrphanLines {
        budget_type: BudgetType,
        kuan: String,
        lines: usize,
    },
    /// Line amounts of a category do not add up to its summary total
    LineTotalMismatch {
        budget_type: BudgetType,
        kuan: String,
        line_total: Amount,
        summary_total: Amount,
    },
    /// Lines of one (項, 目) group carry different item amounts
    UnevenGroup {
        budget_type: BudgetType,
        kuan: String,
        kou: String,
        moku: String,
        distinct_amounts: Vec<Amount>,
    },
    /// A row rejected at load time
    Quarantined(QuarantinedRow),
}

impl fmt::Display for ConsistencyIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DiffMismatch {
                budget_type,
                kuan,
                stored,
                computed,
            } => write!(
                f,
                "[{}] {}: stored diff {} but current - previous is {}",
                budget_type,
                kuan,
                stored.thousands(),
                computed.thousands()
            ),
            Self::FundingMismatch {
                kuan,
                funding_total,
                amount_current,
            } => write!(
                f,
                "[歳出] {}: funding sources total {} but amount is {}",
                kuan,
                funding_total.thousands(),
                amount_current.thousands()
            ),
            Self::OrphanLines {
                budget_type,
                kuan,
                lines,
            } => write!(
                f,
                "[{}] {}: {} lines without a summary row",
                budget_type, kuan, lines
            ),
            Self::LineTotalMismatch {
                budget_type,
                kuan,
                line_total,
                summary_total,
            } => write!(
                f,
                "[{}] {}: lines total {} but summary says {}",
                budget_type,
                kuan,
                line_total.thousands(),
                summary_total.thousands()
            ),
            Self::UnevenGroup {
                budget_type,
                kuan,
                kou,
                moku,
                distinct_amounts,
            } => {
                let amounts: Vec<String> = distinct_amounts
                    .iter()
                    .map(|a| a.thousands().to_string())
                    .collect();
                write!(
                    f,
                    "[{}] {} / {} / {}: item amount differs between lines ({})",
                    budget_type,
                    kuan,
                    kou,
                    moku,
                    amounts.join(", ")
                )
            }
            Self::Quarantined(q) => {
                write!(f, "[{}] row {} skipped: {}", q.table, q.row, q.reason)
            }
        }
    }
}

/// All issues found in one dataset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConsistencyReport {
    pub issues: Vec<ConsistencyIssue>,
}

impl ConsistencyReport {
    pub fn generate(dataset: &Dataset) -> Self {
        let mut issues = Vec::new();

        for row in dataset.all_summaries() {
            if !row.diff_is_consistent() {
                issues.push(ConsistencyIssue::DiffMismatch {
                    budget_type: row.budget_type,
                    kuan: row.kuan.clone(),
                    stored: row.diff,
                    computed: row.computed_diff(),
                });
            }
            if let Some(funding) = row.funding.filter(|_| !row.funding_is_consistent()) {
                issues.push(ConsistencyIssue::FundingMismatch {
                    kuan: row.kuan.clone(),
                    funding_total: funding.total(),
                    amount_current: row.amount_current,
                });
            }
        }

        for budget_type in BudgetType::all() {
            check_lines(dataset, budget_type, &mut issues);
        }

        issues.extend(
            dataset
                .quarantined()
                .iter()
                .cloned()
                .map(ConsistencyIssue::Quarantined),
        );

        info!(issues = issues.len(), "consistency check finished");
        Self { issues }
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = display::title("データ整合性チェック");
        if self.is_clean() {
            output.push_str("問題は見つかりませんでした（0件）\n");
            return output;
        }
        output.push_str(&format!("{}件の不整合\n\n", self.issues.len()));
        for issue in &self.issues {
            output.push_str(&format!("  - {}\n", issue));
        }
        output
    }
}

/// Per-category line checks for one side, in source order of first appearance
fn check_lines(dataset: &Dataset, budget_type: BudgetType, issues: &mut Vec<ConsistencyIssue>) {
    let mut by_kuan: Vec<(&str, Vec<&DetailRow>)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for line in dataset.details(budget_type) {
        let i = *index.entry(line.kuan.as_str()).or_insert_with(|| {
            by_kuan.push((line.kuan.as_str(), Vec::new()));
            by_kuan.len() - 1
        });
        by_kuan[i].1.push(line);
    }

    for (kuan, lines) in &by_kuan {
        let Some(summary) = dataset.summary_for(budget_type, kuan) else {
            issues.push(ConsistencyIssue::OrphanLines {
                budget_type,
                kuan: kuan.to_string(),
                lines: lines.len(),
            });
            continue;
        };

        let line_total: Amount = lines.iter().map(|l| l.setsu_amount).sum();
        if line_total != summary.amount_current {
            debug!(%budget_type, kuan, "line total differs from summary");
            issues.push(ConsistencyIssue::LineTotalMismatch {
                budget_type,
                kuan: kuan.to_string(),
                line_total,
                summary_total: summary.amount_current,
            });
        }

        let mut groups: Vec<((&str, &str), Vec<Amount>)> = Vec::new();
        for line in lines {
            let Some(amount) = line.amount_current else {
                continue;
            };
            let key = (line.kou_name(), line.moku_name());
            match groups.iter_mut().find(|(k, _)| *k == key) {
                Some((_, amounts)) => {
                    if !amounts.contains(&amount) {
                        amounts.push(amount);
                    }
                }
                None => groups.push((key, vec![amount])),
            }
        }
        for ((kou, moku), amounts) in groups {
            if amounts.len() > 1 {
                issues.push(ConsistencyIssue::UnevenGroup {
                    budget_type,
                    kuan: kuan.to_string(),
                    kou: kou.to_string(),
                    moku: moku.to_string(),
                    distinct_amounts: amounts,
                });
            }
        }
    }
}
