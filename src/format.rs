//! Readable amount formatting
//!
//! Every amount in the dataset is stored in thousand-yen units. Large amounts
//! read best in 億 (one hundred million yen, 100,000 stored units) and smaller
//! ones in 万 (ten thousand yen, 10 stored units).
//!
//! Rounding is done on the integer input (half away from zero), so the output
//! never depends on floating-point representation.

/// Stored units per 億
pub const OKU: u64 = 100_000;

/// Stored units per 万
pub const MAN: u64 = 10;

const ZERO_DIFF: &str = "±0";

fn units(short: bool) -> (&'static str, &'static str) {
    if short {
        ("億", "万")
    } else {
        ("億円", "万円")
    }
}

fn round_div(value: u64, divisor: u64) -> u64 {
    (value + divisor / 2) / divisor
}

/// Insert comma separators every three digits
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format a signed integer with comma separators (used for raw 千円 columns)
pub fn format_thousands(value: i64) -> String {
    if value < 0 {
        format!("-{}", group_thousands(value.unsigned_abs()))
    } else {
        group_thousands(value as u64)
    }
}

fn oku_text(magnitude: u64, unit: &str) -> String {
    let tenths = round_div(magnitude, OKU / 10);
    format!("{}.{}{}", group_thousands(tenths / 10), tenths % 10, unit)
}

/// Format an amount in thousand-yen as 億円 or 万円
///
/// Amounts of at least one 億 get one decimal place; smaller amounts are
/// whole 万. `short` drops the trailing 円 for chart labels. Negative input
/// keeps its sign in front of the magnitude.
pub fn format_amount(value: i64, short: bool) -> String {
    let (unit_oku, unit_man) = units(short);
    let magnitude = value.unsigned_abs();
    let sign = if value < 0 { "-" } else { "" };

    if magnitude >= OKU {
        format!("{}{}", sign, oku_text(magnitude, unit_oku))
    } else {
        format!("{}{}{}", sign, group_thousands(round_div(magnitude, MAN)), unit_man)
    }
}

/// Format a year-over-year difference with an explicit sign
///
/// Zero, and any nonzero difference that rounds to zero 万, renders as "±0"
/// so a tiny change never shows up as "+0万円".
pub fn format_diff(value: i64, short: bool) -> String {
    if value == 0 {
        return ZERO_DIFF.to_string();
    }

    let (unit_oku, unit_man) = units(short);
    let sign = if value > 0 { "+" } else { "-" };
    let magnitude = value.unsigned_abs();

    if magnitude >= OKU {
        return format!("{}{}", sign, oku_text(magnitude, unit_oku));
    }

    let man = round_div(magnitude, MAN);
    if man == 0 {
        return ZERO_DIFF.to_string();
    }
    format!("{}{}{}", sign, group_thousands(man), unit_man)
}

/// Format a percentage change with a leading "+" for non-negative values
pub fn format_percent_change(pct: f64) -> String {
    if pct >= 0.0 {
        format!("+{:.1}%", pct)
    } else {
        format!("{:.1}%", pct)
    }
}

/// Format a share of a whole as a whole-number percentage
pub fn format_share(pct: f64) -> String {
    format!("{:.0}%", pct)
}

/// Format a floating 万 amount (per-capita figures) as whole 万円
pub fn format_man(man: f64) -> String {
    let rounded = man.round();
    if rounded < 0.0 {
        format!("-{}万円", group_thousands((-rounded) as u64))
    } else {
        format!("{}万円", group_thousands(rounded as u64))
    }
}
