//! Report formatting utilities for terminal output
//!
//! Text bars, separators and diff coloring shared by the report views.

use std::io::IsTerminal;

use crate::models::Amount;

/// Width of the text bars in charts
pub const BAR_WIDTH: usize = 30;

/// Width of separator lines under report titles
pub const REPORT_WIDTH: usize = 72;

/// Direction of a change, used to pick a color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Increase,
    Decrease,
    Neutral,
}

impl Tone {
    pub fn of(diff: Amount) -> Self {
        if diff.is_negative() {
            Self::Decrease
        } else if diff.is_zero() {
            Self::Neutral
        } else {
            Self::Increase
        }
    }
}

/// Whether ANSI colors should be written to stdout
pub fn color_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
}

/// Wrap text in the color for its tone, when stdout is a terminal
pub fn paint(text: &str, tone: Tone) -> String {
    if !color_enabled() {
        return text.to_string();
    }
    match tone {
        Tone::Increase => format!("\x1b[32m{}\x1b[0m", text), // green
        Tone::Decrease => format!("\x1b[31m{}\x1b[0m", text), // red
        Tone::Neutral => text.to_string(),
    }
}

/// Create a simple bar chart representation
pub fn format_bar(value: f64, max_value: f64, width: usize) -> String {
    if max_value <= 0.0 || value <= 0.0 {
        return " ".repeat(width);
    }

    let filled = ((value / max_value) * width as f64).round() as usize;
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Bar for an amount relative to the largest amount in the chart
pub fn amount_bar(amount: Amount, max: Amount, width: usize) -> String {
    format_bar(amount.thousands() as f64, max.thousands() as f64, width)
}

/// Report title with a double rule underneath
pub fn title(text: &str) -> String {
    format!("{}\n{}\n", text, double_separator(REPORT_WIDTH))
}

/// Format a separator line
pub fn separator(width: usize) -> String {
    "─".repeat(width)
}

/// Format a double separator line
pub fn double_separator(width: usize) -> String {
    "═".repeat(width)
}

/// Truncate to at most `max_chars` characters, ending in an ellipsis when cut
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else if max_chars == 0 {
        String::new()
    } else {
        let mut out: String = s.chars().take(max_chars - 1).collect();
        out.push('…');
        out
    }
}
