//! Category drill-down: cards, item rollup and line table
//!
//! Line items repeat their item-level (目) amount on every line, so grouping by
//! (項, 目) has to pick one value per group rather than add them up. The
//! reduction is chosen with [`RollupPolicy`].

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tabled::Tabled;

use super::percent_or_zero;
use crate::display::{self, amount_bar, paint, truncate, Tone};
use crate::error::{BudgetError, BudgetResult};
use crate::format::{format_percent_change, format_thousands};
use crate::models::{Amount, BudgetType, DetailRow};
use crate::storage::Dataset;

/// How the amounts of one (項, 目) group are reduced to a single figure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RollupPolicy {
    /// Take the first line's amount
    #[default]
    FirstSeen,
    /// Add every line's amount
    Sum,
    /// Take the largest amount
    Max,
}

impl RollupPolicy {
    fn combine(&self, acc: Amount, next: Amount) -> Amount {
        match self {
            Self::FirstSeen => acc,
            Self::Sum => acc + next,
            Self::Max => acc.max(next),
        }
    }
}

impl fmt::Display for RollupPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::FirstSeen => "first",
            Self::Sum => "sum",
            Self::Max => "max",
        })
    }
}

/// Error for an unrecognised rollup policy name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown rollup policy '{0}' (expected first, sum or max)")]
pub struct RollupPolicyParseError(pub String);

impl FromStr for RollupPolicy {
    type Err = RollupPolicyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "first" | "first-seen" => Ok(Self::FirstSeen),
            "sum" => Ok(Self::Sum),
            "max" => Ok(Self::Max),
            other => Err(RollupPolicyParseError(other.to_string())),
        }
    }
}

/// One (項, 目) group of a category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RollupGroup {
    pub kou: String,
    pub moku: String,
    pub amount: Amount,
    /// Number of lines folded into the group
    pub line_count: usize,
}

/// Group lines by (項, 目) and order the groups by amount, largest first
///
/// Groups are created in first-seen order and the sort is stable, so equal
/// amounts keep that order. Missing names group under "". Lines with a blank
/// item amount are skipped by the policy; a group where every line is blank
/// falls back to the sum of its line amounts.
pub fn rollup<'a, I>(rows: I, policy: RollupPolicy) -> Vec<RollupGroup>
where
    I: IntoIterator<Item = &'a DetailRow>,
{
    let mut groups: Vec<RollupGroup> = Vec::new();
    let mut item_amounts: Vec<Option<Amount>> = Vec::new();
    let mut index: HashMap<(&str, &str), usize> = HashMap::new();

    for row in rows {
        let key = (row.kou_name(), row.moku_name());
        let i = *index.entry(key).or_insert_with(|| {
            groups.push(RollupGroup {
                kou: key.0.to_string(),
                moku: key.1.to_string(),
                amount: Amount::zero(),
                line_count: 0,
            });
            item_amounts.push(None);
            groups.len() - 1
        });

        let group = &mut groups[i];
        group.amount += row.setsu_amount;
        group.line_count += 1;
        if let Some(next) = row.amount_current {
            item_amounts[i] = Some(match item_amounts[i] {
                Some(acc) => policy.combine(acc, next),
                None => next,
            });
        }
    }

    for (group, item) in groups.iter_mut().zip(item_amounts) {
        if let Some(amount) = item {
            group.amount = amount;
        }
    }

    groups.sort_by(|a, b| b.amount.cmp(&a.amount));
    groups
}

/// Everything shown for one selected category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KuanDrilldown {
    pub budget_type: BudgetType,
    pub kuan: String,
    pub amount_current: Amount,
    pub amount_previous: Amount,
    pub diff: Amount,
    pub diff_pct: f64,
    pub policy: RollupPolicy,
    /// Maximum number of groups in the chart
    pub limit: usize,
    /// All groups, largest first
    pub groups: Vec<RollupGroup>,
    /// Lines of the category in source order
    pub lines: Vec<DetailRow>,
}

#[derive(Tabled)]
struct GroupLine {
    #[tabled(rename = "項")]
    kou: String,
    #[tabled(rename = "目")]
    moku: String,
    #[tabled(rename = "金額")]
    amount: String,
    #[tabled(rename = "")]
    bar: String,
}

#[derive(Tabled)]
struct DetailLine {
    #[tabled(rename = "項")]
    kou: String,
    #[tabled(rename = "目")]
    moku: String,
    #[tabled(rename = "節")]
    setsu: String,
    #[tabled(rename = "金額(千円)")]
    amount: String,
    #[tabled(rename = "一般財源")]
    general: String,
    #[tabled(rename = "説明")]
    description: String,
}

#[derive(Tabled)]
struct RevenueLine {
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

const DESCRIPTION_WIDTH: usize = 40;

impl KuanDrilldown {
    /// Build the drill-down for `kuan`
    ///
    /// A category missing from the summary is a NotFound error. A category
    /// with no lines is returned with empty groups and lines.
    pub fn generate(
        dataset: &Dataset,
        budget_type: BudgetType,
        kuan: &str,
        policy: RollupPolicy,
        limit: usize,
    ) -> BudgetResult<Self> {
        let summary = dataset
            .summary_for(budget_type, kuan)
            .ok_or_else(|| BudgetError::kuan_not_found(kuan))?;

        let lines: Vec<DetailRow> = dataset
            .details(budget_type)
            .iter()
            .filter(|d| d.kuan == kuan)
            .cloned()
            .collect();
        let groups = rollup(&lines, policy);

        Ok(Self {
            budget_type,
            kuan: summary.kuan.clone(),
            amount_current: summary.amount_current,
            amount_previous: summary.amount_previous,
            diff: summary.diff,
            diff_pct: percent_or_zero(summary.diff, summary.amount_previous),
            policy,
            limit,
            groups,
            lines,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The largest `limit` groups, smallest first for horizontal bars
    pub fn chart_groups(&self) -> Vec<&RollupGroup> {
        let mut top: Vec<&RollupGroup> = self.groups.iter().take(self.limit).collect();
        top.reverse();
        top
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = display::title(&format!(
            "{} {} の内訳",
            self.budget_type.label(),
            self.kuan
        ));
        output.push_str(&format!(
            "本年度: {}  前年度: {}  増減: {} ({})\n\n",
            self.amount_current,
            self.amount_previous,
            paint(&self.diff.format_diff(false), Tone::of(self.diff)),
            format_percent_change(self.diff_pct)
        ));

        if self.is_empty() {
            output.push_str("明細データがありません（0件）\n");
            return output;
        }

        let chart = self.chart_groups();
        output.push_str(&format!("目別の金額（上位{}件）\n", chart.len()));
        let max = chart.iter().map(|g| g.amount).max().unwrap_or(Amount::zero());
        let groups = chart.iter().map(|g| GroupLine {
            kou: g.kou.clone(),
            moku: g.moku.clone(),
            amount: g.amount.format(false),
            bar: amount_bar(g.amount, max, display::report::BAR_WIDTH),
        });
        output.push_str(&display::render(groups, &[2]));
        output.push_str("\n\n");

        output.push_str(&format!("明細 {}件\n", self.lines.len()));
        match self.budget_type {
            BudgetType::Expenditure => {
                let rows = self.lines.iter().map(|d| DetailLine {
                    kou: d.kou_name().to_string(),
                    moku: d.moku_name().to_string(),
                    setsu: d.setsu_name().to_string(),
                    amount: format_thousands(d.setsu_amount.thousands()),
                    general: d
                        .src_general
                        .map(|g| format_thousands(g.thousands()))
                        .unwrap_or_default(),
                    description: truncate(d.description_text(), DESCRIPTION_WIDTH),
                });
                output.push_str(&display::render(rows, &[3, 4]));
            }
            BudgetType::Revenue => {
                let rows = self.lines.iter().map(|d| RevenueLine {
                    kou: d.kou_name().to_string(),
                    moku: d.moku_name().to_string(),
                    setsu: d.setsu_name().to_string(),
                    amount: format_thousands(d.setsu_amount.thousands()),
                    description: truncate(d.description_text(), DESCRIPTION_WIDTH),
                });
                output.push_str(&display::render(rows, &[3]));
            }
        }
        output.push('\n');
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SummaryRow;

    fn line(kuan: &str, kou: &str, moku: &str, amount: i64) -> DetailRow {
        DetailRow::new(
            BudgetType::Expenditure,
            kuan,
            Amount::from_thousands(amount),
            Amount::from_thousands(amount),
        )
        .with_levels(kou, moku, "節")
    }

    fn amounts(groups: &[RollupGroup]) -> Vec<(&str, i64)> {
        groups
            .iter()
            .map(|g| (g.moku.as_str(), g.amount.thousands()))
            .collect()
    }

    #[test]
    fn test_first_seen_rollup_scenario() {
        let rows = vec![
            line("総務費", "総務管理費", "A", 100),
            line("総務費", "総務管理費", "A", 100),
            line("総務費", "総務管理費", "B", 50),
        ];
        let groups = rollup(&rows, RollupPolicy::FirstSeen);
        assert_eq!(amounts(&groups), vec![("A", 100), ("B", 50)]);
        assert_eq!(groups[0].line_count, 2);
    }

    #[test]
    fn test_policies_differ_on_uneven_groups() {
        let rows = vec![
            line("総務費", "項", "A", 30),
            line("総務費", "項", "A", 70),
            line("総務費", "項", "B", 50),
        ];
        assert_eq!(
            amounts(&rollup(&rows, RollupPolicy::FirstSeen)),
            vec![("B", 50), ("A", 30)]
        );
        assert_eq!(
            amounts(&rollup(&rows, RollupPolicy::Sum)),
            vec![("A", 100), ("B", 50)]
        );
        assert_eq!(
            amounts(&rollup(&rows, RollupPolicy::Max)),
            vec![("A", 70), ("B", 50)]
        );
    }

    #[test]
    fn test_blank_item_amounts_are_skipped() {
        let rows = vec![
            line("総務費", "項", "A", 40).without_item_amount(),
            line("総務費", "項", "A", 90),
            line("総務費", "項", "B", 25).without_item_amount(),
            line("総務費", "項", "B", 35).without_item_amount(),
        ];
        let groups = rollup(&rows, RollupPolicy::FirstSeen);
        assert_eq!(amounts(&groups), vec![("A", 90), ("B", 60)]);
        assert_eq!(groups[0].line_count, 2);
        assert_eq!(
            amounts(&rollup(&rows, RollupPolicy::Sum)),
            vec![("A", 90), ("B", 60)]
        );
    }

    #[test]
    fn test_same_moku_under_different_kou_are_separate() {
        let rows = vec![
            line("教育費", "小学校費", "学校管理費", 80),
            line("教育費", "中学校費", "学校管理費", 120),
        ];
        let groups = rollup(&rows, RollupPolicy::FirstSeen);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].kou, "中学校費");
    }

    #[test]
    fn test_equal_amounts_keep_first_seen_order() {
        let rows = vec![
            line("総務費", "項", "C", 10),
            line("総務費", "項", "D", 10),
            line("総務費", "項", "E", 20),
        ];
        assert_eq!(
            amounts(&rollup(&rows, RollupPolicy::FirstSeen)),
            vec![("E", 20), ("C", 10), ("D", 10)]
        );
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!("first".parse::<RollupPolicy>().unwrap(), RollupPolicy::FirstSeen);
        assert_eq!("SUM".parse::<RollupPolicy>().unwrap(), RollupPolicy::Sum);
        assert_eq!("max".parse::<RollupPolicy>().unwrap(), RollupPolicy::Max);
        assert!("median".parse::<RollupPolicy>().is_err());
        assert_eq!(RollupPolicy::default().to_string(), "first");
    }

    fn dataset(lines: Vec<DetailRow>) -> Dataset {
        Dataset::from_rows(
            vec![
                SummaryRow::new(
                    2,
                    "総務費",
                    BudgetType::Expenditure,
                    Amount::from_thousands(500_000),
                    Amount::from_thousands(480_000),
                ),
                SummaryRow::new(
                    9,
                    "消防費",
                    BudgetType::Expenditure,
                    Amount::from_thousands(1_000),
                    Amount::from_thousands(1_000),
                ),
            ],
            lines,
        )
    }

    #[test]
    fn test_chart_groups_capped_and_ascending() {
        let lines: Vec<DetailRow> = (1..=20)
            .map(|i| line("総務費", "項", &format!("目{:02}", i), i * 10))
            .collect();
        let drill = KuanDrilldown::generate(
            &dataset(lines),
            BudgetType::Expenditure,
            "総務費",
            RollupPolicy::FirstSeen,
            15,
        )
        .unwrap();

        assert_eq!(drill.groups.len(), 20);
        let chart = drill.chart_groups();
        assert_eq!(chart.len(), 15);
        assert_eq!(chart[0].amount.thousands(), 60);
        assert_eq!(chart[14].amount.thousands(), 200);
        assert_eq!(drill.diff.thousands(), 20_000);
    }

    #[test]
    fn test_kuan_without_lines_is_empty_state() {
        let drill = KuanDrilldown::generate(
            &dataset(vec![]),
            BudgetType::Expenditure,
            "消防費",
            RollupPolicy::FirstSeen,
            15,
        )
        .unwrap();
        assert!(drill.is_empty());
        assert!(drill.chart_groups().is_empty());
        assert!(drill.format_terminal().contains("0件"));
    }

    #[test]
    fn test_unknown_kuan_is_not_found() {
        let err = KuanDrilldown::generate(
            &dataset(vec![]),
            BudgetType::Expenditure,
            "宇宙開発費",
            RollupPolicy::FirstSeen,
            15,
        )
        .unwrap_err();
        assert!(err.is_not_found());

        let err = KuanDrilldown::generate(
            &dataset(vec![]),
            BudgetType::Revenue,
            "総務費",
            RollupPolicy::FirstSeen,
            15,
        )
        .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_terminal_lists_lines() {
        let lines = vec![line("総務費", "総務管理費", "一般管理費", 500_000)
            .with_description("職員給与")];
        let drill = KuanDrilldown::generate(
            &dataset(lines),
            BudgetType::Expenditure,
            "総務費",
            RollupPolicy::FirstSeen,
            15,
        )
        .unwrap();
        let out = drill.format_terminal();
        assert!(out.contains("明細 1件"));
        assert!(out.contains("一般管理費"));
        assert!(out.contains("500,000"));
        assert!(out.contains("職員給与"));
    }
}
