//! Linear trend fitting and the three-period projection.
//!
//! Revenue and expenses are each fitted with an ordinary-least-squares line
//! over the sequential index. Projections are floored at zero before profit is
//! derived, so profit may still come out negative.

use log::{debug, info, warn};
use serde::Serialize;

use crate::{
    error::{ReportError, Result},
    ingest::CleanRow,
};

pub const FORECAST_HORIZON: usize = 3;

/// `y = intercept + slope * x`, fitted by ordinary least squares.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearTrend {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearTrend {
    pub fn fit(points: &[(f64, f64)]) -> std::result::Result<Self, String> {
        if points.len() < 2 {
            return Err(format!(
                "{} point(s) available, at least 2 required",
                points.len()
            ));
        }
        let n = points.len() as f64;
        let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
        let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;

        let mut sxx = 0.0;
        let mut sxy = 0.0;
        for (x, y) in points {
            let dx = x - mean_x;
            sxx += dx * dx;
            sxy += dx * (y - mean_y);
        }
        if sxx == 0.0 {
            return Err("sequential index has zero variance".to_string());
        }

        let slope = sxy / sxx;
        let intercept = mean_y - slope * mean_x;
        if !slope.is_finite() || !intercept.is_finite() {
            return Err("coefficients are not finite".to_string());
        }
        Ok(LinearTrend { slope, intercept })
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// One fitted line per financial series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendModel {
    pub revenue: LinearTrend,
    pub expenses: LinearTrend,
}

impl TrendModel {
    /// Fits both series over `rows`.
    ///
    /// Rows without an expense value take part in the revenue fit only.
    pub fn fit(rows: &[CleanRow]) -> Result<Self> {
        let revenue_points = rows
            .iter()
            .map(|row| (row.index, row.revenue))
            .collect::<Vec<_>>();
        let expense_points = rows
            .iter()
            .filter_map(|row| row.expenses.map(|expenses| (row.index, expenses)))
            .collect::<Vec<_>>();

        let excluded = rows.len() - expense_points.len();
        if excluded > 0 {
            warn!("{excluded} row(s) without expenses excluded from the expense trend");
        }

        let revenue = LinearTrend::fit(&revenue_points).map_err(|reason| ReportError::Forecast {
            series: "revenue",
            reason,
        })?;
        let expenses =
            LinearTrend::fit(&expense_points).map_err(|reason| ReportError::Forecast {
                series: "expenses",
                reason,
            })?;
        Ok(TrendModel { revenue, expenses })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastRow {
    pub index: i64,
    pub revenue: f64,
    pub expenses: f64,
    pub profit: f64,
}

impl ForecastRow {
    fn project(model: &TrendModel, index: i64) -> Self {
        let x = index as f64;
        let revenue = model.revenue.predict(x).max(0.0);
        let expenses = model.expenses.predict(x).max(0.0);
        ForecastRow {
            index,
            revenue,
            expenses,
            profit: revenue - expenses,
        }
    }
}

/// 2^63: the first float past the top of the `i64` range.
const INDEX_BOUND: f64 = 9_223_372_036_854_775_808.0;

fn index_error(reason: String) -> ReportError {
    ReportError::Forecast {
        series: "revenue",
        reason,
    }
}

/// Integer part of the largest observed sequential index.
pub fn last_index(rows: &[CleanRow]) -> Result<i64> {
    let max = rows
        .iter()
        .map(|row| row.index)
        .reduce(f64::max)
        .ok_or_else(|| index_error("no rows to fit".to_string()))?;
    let truncated = max.trunc();
    if !(-INDEX_BOUND..INDEX_BOUND).contains(&truncated) {
        return Err(index_error(format!(
            "sequential index {max} is outside the supported period range"
        )));
    }
    Ok(truncated as i64)
}

pub fn forecast(model: &TrendModel, last_index: i64) -> Result<[ForecastRow; FORECAST_HORIZON]> {
    let mut indices = [0i64; FORECAST_HORIZON];
    for (step, slot) in (1..).zip(indices.iter_mut()) {
        *slot = last_index.checked_add(step).ok_or_else(|| {
            index_error(format!(
                "period {last_index} + {step} overflows the supported period range"
            ))
        })?;
    }
    Ok(indices.map(|index| ForecastRow::project(model, index)))
}

pub fn fit_and_forecast(rows: &[CleanRow]) -> Result<[ForecastRow; FORECAST_HORIZON]> {
    let model = TrendModel::fit(rows)?;
    let last = last_index(rows)?;
    info!(
        "Revenue trend {:+.2}/period, expense trend {:+.2}/period",
        model.revenue.slope, model.expenses.slope
    );
    let rows = forecast(&model, last)?;
    debug!(
        "Projected periods {}..={}",
        rows[0].index,
        rows[FORECAST_HORIZON - 1].index
    );
    Ok(rows)
}
