//! Spreadsheet rendering of a finished [`ReportDataset`].
//!
//! The renderer only lays out values it is given: a styled header row, one
//! row per dataset entry, money formats, three conditional highlighting rules
//! and two charts bound to the written cell ranges.

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use log::{debug, info};
use rust_xlsxwriter::{
    Chart, ChartFormat, ChartLine, ChartSolidFill, ChartType, ConditionalFormatCell,
    ConditionalFormatCellRule, ConditionalFormatFormula, Format, Workbook, Worksheet,
};
use tempfile::NamedTempFile;

use crate::{
    error::RenderError,
    report::{ReportDataset, ReportRow, RowKind},
    style::{ReportLabels, ReportStyle, parse_hex_color},
};

pub const PERIOD_COL: u16 = 0;
pub const REVENUE_COL: u16 = 1;
pub const EXPENSES_COL: u16 = 2;
pub const PROFIT_COL: u16 = 3;
pub const STATUS_COL: u16 = 4;

/// Top-left cells of the two charts (G2 and G21).
pub const COLUMN_CHART_ANCHOR: (u32, u16) = (1, 6);
pub const LINE_CHART_ANCHOR: (u32, u16) = (20, 6);

/// Zero-based cell coordinates of the written table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetLayout {
    pub first_data_row: u32,
    pub last_data_row: u32,
}

impl SheetLayout {
    pub fn for_rows(row_count: usize) -> Self {
        SheetLayout {
            first_data_row: 1,
            last_data_row: row_count as u32,
        }
    }

    /// A1 reference such as `A2:E7` for the whole data block.
    pub fn data_range(&self) -> String {
        format!(
            "{}{}:{}{}",
            column_letter(PERIOD_COL),
            self.first_data_row + 1,
            column_letter(STATUS_COL),
            self.last_data_row + 1
        )
    }

    pub fn profit_range(&self) -> String {
        format!(
            "{col}{}:{col}{}",
            self.first_data_row + 1,
            self.last_data_row + 1,
            col = column_letter(PROFIT_COL)
        )
    }

    /// Row-relative rule matching rows whose status equals `label`.
    pub fn forecast_rule(&self, label: &str) -> String {
        format!(
            "=${}{}=\"{}\"",
            column_letter(STATUS_COL),
            self.first_data_row + 1,
            label.replace('"', "\"\"")
        )
    }
}

fn column_letter(col: u16) -> char {
    (b'A' + col as u8) as char
}

struct Formats {
    header: Format,
    currency: Format,
    forecast_row: Format,
    positive_profit: Format,
    negative_profit: Format,
}

impl Formats {
    fn build(style: &ReportStyle) -> Result<Self, RenderError> {
        Ok(Formats {
            header: style.header.to_format()?,
            currency: style.currency.to_format()?,
            forecast_row: style.forecast_row.to_format()?,
            positive_profit: style.positive_profit.to_format()?,
            negative_profit: style.negative_profit.to_format()?,
        })
    }
}

/// Lays the dataset out into an in-memory workbook.
pub fn build_workbook(dataset: &ReportDataset, style: &ReportStyle) -> Result<Workbook, RenderError> {
    if dataset.is_empty() {
        return Err(RenderError::EmptyDataset);
    }
    let formats = Formats::build(style)?;
    let labels = &style.labels;
    let layout = SheetLayout::for_rows(dataset.len());

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(&labels.sheet_name)?;

    for (col, title) in labels.titles().iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *title, &formats.header)?;
    }
    for (offset, row) in dataset.rows().iter().enumerate() {
        write_row(worksheet, layout.first_data_row + offset as u32, row, labels, &formats)?;
    }
    for col in [REVENUE_COL, EXPENSES_COL, PROFIT_COL] {
        worksheet.set_column_width(col, style.money_column_width)?;
        worksheet.set_column_format(col, &formats.currency)?;
    }

    add_highlight_rules(worksheet, &layout, labels, &formats)?;
    add_charts(worksheet, &layout, style)?;
    debug!(
        "Laid out {} row(s) in {} on sheet '{}'",
        dataset.len(),
        layout.data_range(),
        labels.sheet_name
    );
    Ok(workbook)
}

fn write_row(
    worksheet: &mut Worksheet,
    row_num: u32,
    row: &ReportRow,
    labels: &ReportLabels,
    formats: &Formats,
) -> Result<(), RenderError> {
    worksheet.write_number(row_num, PERIOD_COL, row.index)?;
    worksheet.write_number_with_format(row_num, REVENUE_COL, row.revenue, &formats.currency)?;
    write_money(worksheet, row_num, EXPENSES_COL, row.expenses, &formats.currency)?;
    write_money(worksheet, row_num, PROFIT_COL, row.profit, &formats.currency)?;
    let status = match row.kind {
        RowKind::History => &labels.history,
        RowKind::Forecast => &labels.forecast,
    };
    worksheet.write_string(row_num, STATUS_COL, status)?;
    Ok(())
}

fn write_money(
    worksheet: &mut Worksheet,
    row_num: u32,
    col: u16,
    value: Option<f64>,
    currency: &Format,
) -> Result<(), RenderError> {
    match value {
        Some(amount) => worksheet.write_number_with_format(row_num, col, amount, currency)?,
        None => worksheet.write_blank(row_num, col, currency)?,
    };
    Ok(())
}

/// The forecast rule and both profit rules are independent; none of them
/// stops evaluation of the others.
fn add_highlight_rules(
    worksheet: &mut Worksheet,
    layout: &SheetLayout,
    labels: &ReportLabels,
    formats: &Formats,
) -> Result<(), RenderError> {
    let first = layout.first_data_row;
    let last = layout.last_data_row;

    let forecast_rows = ConditionalFormatFormula::new()
        .set_rule(layout.forecast_rule(&labels.forecast).as_str())
        .set_format(&formats.forecast_row);
    worksheet.add_conditional_format(first, PERIOD_COL, last, STATUS_COL, &forecast_rows)?;

    let positive = ConditionalFormatCell::new()
        .set_rule(ConditionalFormatCellRule::GreaterThan(0))
        .set_format(&formats.positive_profit);
    worksheet.add_conditional_format(first, PROFIT_COL, last, PROFIT_COL, &positive)?;

    let negative = ConditionalFormatCell::new()
        .set_rule(ConditionalFormatCellRule::LessThan(0))
        .set_format(&formats.negative_profit);
    worksheet.add_conditional_format(first, PROFIT_COL, last, PROFIT_COL, &negative)?;
    Ok(())
}

fn add_charts(
    worksheet: &mut Worksheet,
    layout: &SheetLayout,
    style: &ReportStyle,
) -> Result<(), RenderError> {
    let labels = &style.labels;
    let sheet = labels.sheet_name.as_str();
    let first = layout.first_data_row;
    let last = layout.last_data_row;
    let categories = (sheet, first, PERIOD_COL, last, PERIOD_COL);

    let mut columns = Chart::new(ChartType::Column);
    columns
        .add_series()
        .set_name(labels.revenue.as_str())
        .set_categories(categories)
        .set_values((sheet, first, REVENUE_COL, last, REVENUE_COL))
        .set_format(ChartFormat::new().set_solid_fill(
            ChartSolidFill::new().set_color(parse_hex_color(&style.revenue_series_color)?),
        ));
    columns
        .add_series()
        .set_name(labels.expenses.as_str())
        .set_categories(categories)
        .set_values((sheet, first, EXPENSES_COL, last, EXPENSES_COL))
        .set_format(ChartFormat::new().set_solid_fill(
            ChartSolidFill::new().set_color(parse_hex_color(&style.expense_series_color)?),
        ));
    columns.title().set_name(labels.column_chart_title.as_str());
    worksheet.insert_chart(COLUMN_CHART_ANCHOR.0, COLUMN_CHART_ANCHOR.1, &columns)?;

    let mut line = Chart::new(ChartType::Line);
    line.add_series()
        .set_name(labels.profit.as_str())
        .set_categories(categories)
        .set_values((sheet, first, PROFIT_COL, last, PROFIT_COL))
        .set_format(
            ChartFormat::new().set_line(
                ChartLine::new()
                    .set_color(parse_hex_color(&style.profit_series_color)?)
                    .set_width(style.profit_line_width),
            ),
        );
    line.title().set_name(labels.line_chart_title.as_str());
    worksheet.insert_chart(LINE_CHART_ANCHOR.0, LINE_CHART_ANCHOR.1, &line)?;
    Ok(())
}

/// Renders `dataset` to `output_path`.
///
/// The workbook is written to a temporary file beside the destination and
/// moved into place only once complete, so a failure never leaves a partial
/// file at `output_path`.
pub fn render(
    dataset: &ReportDataset,
    output_path: &Path,
    style: &ReportStyle,
) -> Result<(), RenderError> {
    let mut workbook = build_workbook(dataset, style)?;
    let bytes = workbook.save_to_buffer()?;

    let dir = match output_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let mut staged = NamedTempFile::new_in(&dir)?;
    staged.write_all(&bytes)?;
    staged.flush()?;
    staged.persist(output_path).map_err(|err| err.error)?;
    info!("Report written to {:?} ({} bytes)", output_path, bytes.len());
    Ok(())
}
