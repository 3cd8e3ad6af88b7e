//! Keyword search over line items
//!
//! A query is split on whitespace; a line matches when every keyword occurs
//! somewhere in its lower-cased "kuan kou moku setsu description" text.
//! Matching runs over that joined text, not field by field.

use crate::models::DetailRow;

/// A parsed keyword query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    raw: String,
    keywords: Vec<String>,
}

impl SearchQuery {
    pub fn parse(query: &str) -> Self {
        Self {
            raw: query.to_string(),
            keywords: query.split_whitespace().map(str::to_lowercase).collect(),
        }
    }

    /// The query as typed
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// A query without keywords passes every row
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Check whether a precomputed search text satisfies every keyword
    pub fn matches_text(&self, search_text: &str) -> bool {
        self.keywords.iter().all(|kw| search_text.contains(kw.as_str()))
    }

    pub fn matches(&self, row: &DetailRow) -> bool {
        self.is_empty() || self.matches_text(&row.search_text())
    }

    /// Filter rows, then order them by line amount, largest first
    ///
    /// The sort is stable, so equal amounts keep their source order.
    pub fn filter<'a>(&self, rows: &'a [DetailRow]) -> Vec<&'a DetailRow> {
        let mut hits: Vec<&DetailRow> = rows.iter().filter(|r| self.matches(r)).collect();
        hits.sort_by(|a, b| b.setsu_amount.cmp(&a.setsu_amount));
        hits
    }
}
