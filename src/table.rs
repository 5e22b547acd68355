//! Elastic ASCII rendering of tables for terminal output.

use std::borrow::Cow;
use std::fmt::Write as _;

use crate::data::Table;

const COLUMN_GAP: &str = "  ";

pub fn render_table(table: &Table) -> String {
    render_rows(&table.headers, &table.display_rows())
}

pub fn print_table(table: &Table) {
    print!("{}", render_table(table));
}

/// Renders pre-formatted cells under `headers`. Cells past the header
/// width are ignored.
pub fn render_rows(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths = headers
        .iter()
        .map(|h| display_width(h).max(1))
        .collect::<Vec<_>>();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(display_width(cell));
        }
    }

    let mut output = String::new();
    let _ = writeln!(output, "{}", format_row(headers, &widths));

    let rule_widths = widths.iter().map(|w| (*w).max(3)).collect::<Vec<_>>();
    let rule = rule_widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_row(&rule, &rule_widths));

    for row in rows {
        let _ = writeln!(output, "{}", format_row(row, &widths));
    }
    output
}

fn format_row(values: &[String], widths: &[usize]) -> String {
    let line = values
        .iter()
        .zip(widths)
        .map(|(value, width)| {
            let cell = sanitize_cell(value);
            let padding = width.saturating_sub(display_width(&cell));
            format!("{cell}{}", " ".repeat(padding))
        })
        .collect::<Vec<_>>()
        .join(COLUMN_GAP);
    line.trim_end_matches(' ').to_string()
}

fn display_width(value: &str) -> usize {
    let mut width = 0usize;
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch == '\u{1b}' {
            // ANSI escape, e.g. \x1b[31m
            for next in chars.by_ref() {
                if next == 'm' {
                    break;
                }
            }
        } else {
            width += 1;
        }
    }
    width
}

fn sanitize_cell(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    }
}
