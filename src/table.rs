use std::fmt::Write as _;

use crate::report::{ReportDataset, ReportRow};

pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let column_count = headers.len();
    let mut widths = headers.iter().map(|h| h.chars().count()).collect::<Vec<_>>();

    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(column_count) {
            widths[idx] = widths[idx].max(cell.chars().count());
        }
    }

    let mut output = String::new();
    let _ = writeln!(output, "{}", format_row(headers, &widths));

    let separator_widths = widths.iter().map(|w| (*w).max(3)).collect::<Vec<usize>>();
    let separator_cells = separator_widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_row(&separator_cells, &separator_widths));

    for row in rows {
        let _ = writeln!(output, "{}", format_row(row, &widths));
    }
    output
}

pub fn print_table(headers: &[String], rows: &[Vec<String>]) {
    print!("{}", render_table(headers, rows));
}

/// Text cells for one dataset row: period, revenue, expenses, profit, status.
pub fn dataset_cells(row: &ReportRow, status: &str) -> Vec<String> {
    let money = |value: Option<f64>| value.map(|v| format!("{v:.2}")).unwrap_or_default();
    vec![
        format_period(row.index),
        money(Some(row.revenue)),
        money(row.expenses),
        money(row.profit),
        status.to_string(),
    ]
}

pub fn dataset_rows(dataset: &ReportDataset) -> Vec<Vec<String>> {
    dataset
        .rows()
        .iter()
        .map(|row| dataset_cells(row, row.kind.label()))
        .collect()
}

fn format_period(index: f64) -> String {
    if index.fract() == 0.0 {
        (index as i64).to_string()
    } else {
        index.to_string()
    }
}

fn format_row(values: &[String], widths: &[usize]) -> String {
    let mut cells = Vec::with_capacity(values.len());
    for (idx, value) in values.iter().enumerate() {
        if idx >= widths.len() {
            break;
        }
        let sanitized = value.replace(['\n', '\r', '\t'], " ");
        let padding = widths[idx].saturating_sub(sanitized.chars().count());
        cells.push(format!("{sanitized}{}", " ".repeat(padding)));
    }
    cells.join("  ").trim_end().to_string()
}
