//! Table rendering with `tabled`

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Style};
use tabled::{Table, Tabled};

/// Render rows as a rounded table, right-aligning the given columns
pub fn render<T, I>(rows: I, right_aligned: &[usize]) -> String
where
    T: Tabled,
    I: IntoIterator<Item = T>,
{
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    for &column in right_aligned {
        table.modify(Columns::single(column), Alignment::right());
    }
    table.to_string()
}
