//! Assembly of the dataset handed to the renderer.

use serde::Serialize;

use crate::{forecast::ForecastRow, ingest::CleanRow};

pub const HISTORY_TAIL: usize = 48;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RowKind {
    History,
    Forecast,
}

impl RowKind {
    pub fn label(self) -> &'static str {
        match self {
            RowKind::History => "History",
            RowKind::Forecast => "Forecast",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReportRow {
    pub index: f64,
    pub revenue: f64,
    pub expenses: Option<f64>,
    pub profit: Option<f64>,
    pub kind: RowKind,
}

impl ReportRow {
    fn from_history(row: &CleanRow) -> Self {
        ReportRow {
            index: row.index,
            revenue: row.revenue,
            expenses: row.expenses,
            profit: row.expenses.map(|expenses| row.revenue - expenses),
            kind: RowKind::History,
        }
    }

    fn from_forecast(row: &ForecastRow) -> Self {
        ReportRow {
            index: row.index as f64,
            revenue: row.revenue,
            expenses: Some(row.expenses),
            profit: Some(row.profit),
            kind: RowKind::Forecast,
        }
    }
}

/// History tail followed by the forecast rows, in that order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportDataset {
    rows: Vec<ReportRow>,
}

impl ReportDataset {
    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn history(&self) -> impl Iterator<Item = &ReportRow> {
        self.rows.iter().filter(|row| row.kind == RowKind::History)
    }

    pub fn forecast(&self) -> impl Iterator<Item = &ReportRow> {
        self.rows.iter().filter(|row| row.kind == RowKind::Forecast)
    }
}

pub fn assemble(clean_rows: &[CleanRow], forecast_rows: &[ForecastRow]) -> ReportDataset {
    let tail_start = clean_rows.len().saturating_sub(HISTORY_TAIL);
    let rows = clean_rows[tail_start..]
        .iter()
        .map(ReportRow::from_history)
        .chain(forecast_rows.iter().map(ReportRow::from_forecast))
        .collect();
    ReportDataset { rows }
}
