//! Named style configuration for the rendered report.
//!
//! [`ReportStyle`] holds every colour, number format and label the renderer
//! uses. The defaults reproduce the standard report; a YAML file can override
//! any subset of fields.

use std::{fs, path::Path};

use anyhow::Context;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder};
use serde::{Deserialize, Serialize};

use crate::error::RenderError;

const MONEY_FORMAT: &str = "R$ #,##0.00";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CellStyle {
    pub bold: bool,
    pub italic: bool,
    pub font_color: Option<String>,
    pub background: Option<String>,
    pub num_format: Option<String>,
    pub centered: bool,
    pub border: bool,
}

impl CellStyle {
    pub fn to_format(&self) -> Result<Format, RenderError> {
        let mut format = Format::new();
        if self.bold {
            format = format.set_bold();
        }
        if self.italic {
            format = format.set_italic();
        }
        if let Some(color) = &self.font_color {
            format = format.set_font_color(parse_hex_color(color)?);
        }
        if let Some(color) = &self.background {
            format = format.set_background_color(parse_hex_color(color)?);
        }
        if let Some(num_format) = &self.num_format {
            format = format.set_num_format(num_format);
        }
        if self.centered {
            format = format.set_align(FormatAlign::Center);
        }
        if self.border {
            format = format.set_border(FormatBorder::Thin);
        }
        Ok(format)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportLabels {
    pub sheet_name: String,
    pub period: String,
    pub revenue: String,
    pub expenses: String,
    pub profit: String,
    pub status: String,
    pub history: String,
    pub forecast: String,
    pub column_chart_title: String,
    pub line_chart_title: String,
}

impl Default for ReportLabels {
    fn default() -> Self {
        ReportLabels {
            sheet_name: "Forecast Report".to_string(),
            period: "Period".to_string(),
            revenue: "Revenue".to_string(),
            expenses: "Expenses".to_string(),
            profit: "Profit".to_string(),
            status: "Status".to_string(),
            history: "History".to_string(),
            forecast: "Forecast".to_string(),
            column_chart_title: "Revenue vs Expenses".to_string(),
            line_chart_title: "Profit Trend".to_string(),
        }
    }
}

impl ReportLabels {
    pub fn titles(&self) -> [&str; 5] {
        [
            &self.period,
            &self.revenue,
            &self.expenses,
            &self.profit,
            &self.status,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportStyle {
    pub header: CellStyle,
    pub currency: CellStyle,
    pub forecast_row: CellStyle,
    pub positive_profit: CellStyle,
    pub negative_profit: CellStyle,
    pub revenue_series_color: String,
    pub expense_series_color: String,
    pub profit_series_color: String,
    pub profit_line_width: f64,
    pub money_column_width: f64,
    pub labels: ReportLabels,
}

impl Default for ReportStyle {
    fn default() -> Self {
        ReportStyle {
            header: CellStyle {
                bold: true,
                font_color: Some("#FFFFFF".to_string()),
                background: Some("#4A235A".to_string()),
                centered: true,
                border: true,
                ..CellStyle::default()
            },
            currency: CellStyle {
                num_format: Some(MONEY_FORMAT.to_string()),
                ..CellStyle::default()
            },
            forecast_row: CellStyle {
                italic: true,
                background: Some("#D7BDE2".to_string()),
                ..CellStyle::default()
            },
            positive_profit: CellStyle {
                bold: true,
                font_color: Some("#008000".to_string()),
                num_format: Some(MONEY_FORMAT.to_string()),
                ..CellStyle::default()
            },
            negative_profit: CellStyle {
                bold: true,
                font_color: Some("#FF0000".to_string()),
                num_format: Some(MONEY_FORMAT.to_string()),
                ..CellStyle::default()
            },
            revenue_series_color: "#5DADE2".to_string(),
            expense_series_color: "#E74C3C".to_string(),
            profit_series_color: "#229954".to_string(),
            profit_line_width: 3.0,
            money_column_width: 18.0,
            labels: ReportLabels::default(),
        }
    }
}

impl ReportStyle {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path).with_context(|| format!("Opening style file {path:?}"))?;
        let style = serde_yaml::from_str(&raw)
            .with_context(|| format!("Parsing style file {path:?}"))?;
        Ok(style)
    }
}

/// Parses `#RRGGBB` (the leading `#` is optional).
pub fn parse_hex_color(raw: &str) -> Result<Color, RenderError> {
    let digits = raw.trim().trim_start_matches('#');
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(RenderError::Style(format!(
            "colour '{raw}' is not in #RRGGBB form"
        )));
    }
    u32::from_str_radix(digits, 16)
        .map(Color::RGB)
        .map_err(|err| RenderError::Style(format!("colour '{raw}': {err}")))
}
