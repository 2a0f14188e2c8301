//! Reads the period export into validated, typed rows.
//!
//! The first two physical rows of every export are decorative and are skipped;
//! the third row is the authoritative header. Headers are normalised, checked
//! against the [`ColumnContract`], and only then are cells coerced to numbers.
//! Cells that fail coercion become missing values; rows missing the sequential
//! index or revenue are dropped.

use std::path::Path;

use encoding_rs::{Encoding, UTF_8};
use log::{debug, info, warn};
use serde::Serialize;

use crate::{
    columns::{CanonicalField, ColumnContract, normalize_header},
    data::CellValue,
    error::{ReportError, Result},
    io_utils::{self, InputFormat},
};

pub const HEADER_ROWS_TO_SKIP: usize = 2;
pub const MIN_VALID_ROWS: usize = 2;

/// The file's rows after the decorative block, keyed by normalised header.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl RawTable {
    /// Builds a table from a physical grid: rows `0..2` are skipped and row 2
    /// becomes the header.
    pub fn from_grid(grid: Vec<Vec<CellValue>>) -> Self {
        let mut rows = grid.into_iter().skip(HEADER_ROWS_TO_SKIP);
        let headers = rows
            .next()
            .unwrap_or_default()
            .iter()
            .map(|cell| normalize_header(&cell.as_display()))
            .collect();
        RawTable {
            headers,
            rows: rows.collect(),
        }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }
}

/// One observed period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CleanRow {
    pub index: f64,
    pub revenue: f64,
    pub expenses: Option<f64>,
    pub sales_count: Option<f64>,
}

pub fn ingest(path: &Path) -> Result<Vec<CleanRow>> {
    ingest_with_encoding(path, UTF_8)
}

pub fn ingest_with_encoding(path: &Path, encoding: &'static Encoding) -> Result<Vec<CleanRow>> {
    let format = InputFormat::from_path(path)?;
    debug!("Reading {:?} as {:?}", path, format);
    let grid = io_utils::read_grid(path, format, encoding)?;
    let table = RawTable::from_grid(grid);
    let rows = clean_rows(&table, &ColumnContract::new())?;
    info!("{} valid row(s) read from {:?}", rows.len(), path);
    Ok(rows)
}

/// Applies the column contract, coerces the four fields and filters rows.
pub fn clean_rows(table: &RawTable, contract: &ColumnContract) -> Result<Vec<CleanRow>> {
    let map = contract.resolve(&table.headers)?;
    let mut coercion_failures = [0usize; 4];
    let mut rows = Vec::with_capacity(table.rows.len());

    for raw in &table.rows {
        let mut values = [None; 4];
        for (slot, field) in CanonicalField::ALL.iter().enumerate() {
            let cell = raw.get(map.position(*field)).unwrap_or(&CellValue::Empty);
            values[slot] = cell.to_numeric();
            if values[slot].is_none() && !cell.is_empty() {
                coercion_failures[slot] += 1;
            }
        }
        let [index, revenue, expenses, sales_count] = values;
        let (Some(index), Some(revenue)) = (index, revenue) else {
            continue;
        };
        rows.push(CleanRow {
            index,
            revenue,
            expenses,
            sales_count,
        });
    }

    for (field, failures) in CanonicalField::ALL.iter().zip(coercion_failures) {
        if failures > 0 {
            warn!(
                "{} non-numeric value(s) in '{}' treated as missing",
                failures,
                field.alias()
            );
        }
    }
    let dropped = table.rows.len() - rows.len();
    if dropped > 0 {
        debug!("Dropped {dropped} row(s) without a sequential index or revenue");
    }

    if rows.len() < MIN_VALID_ROWS {
        return Err(ReportError::InsufficientData {
            found: rows.len(),
            required: MIN_VALID_ROWS,
        });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_row(cells: &[&str]) -> Vec<CellValue> {
        cells.iter().map(|cell| CellValue::from_text(cell)).collect()
    }

    fn grid(body: &[&[&str]]) -> Vec<Vec<CellValue>> {
        let mut grid = vec![
            text_row(&["MES", "faturamento", "despesas", "qtd_vendas"]),
            text_row(&["Obrigatório", "Obrigatório", "Obrigatório", "Obrigatório"]),
            text_row(&[" Mes_Sequencial", "FATURAMENTO ", "custos_totais", "total_vendas"]),
        ];
        grid.extend(body.iter().map(|row| text_row(row)));
        grid
    }

    #[test]
    fn from_grid_skips_decorative_rows() {
        let table = RawTable::from_grid(grid(&[&["1", "10", "5", "2"]]));
        assert_eq!(
            table.headers,
            vec!["mes_sequencial", "faturamento", "custos_totais", "total_vendas"]
        );
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.column_index("custos_totais"), Some(2));
    }

    #[test]
    fn from_grid_with_short_file_has_no_headers() {
        let table = RawTable::from_grid(vec![text_row(&["only", "decor"])]);
        assert!(table.headers.is_empty());
        assert!(table.rows.is_empty());
    }

    #[test]
    fn rows_without_index_or_revenue_are_dropped() {
        let table = RawTable::from_grid(grid(&[
            &["1", "1000", "600", "10"],
            &["", "1100", "650", "11"],
            &["3", "n/a", "700", "12"],
            &["4", "1300", "", "abc"],
            &["5", "1400", "750", "14"],
        ]));
        let rows = clean_rows(&table, &ColumnContract::new()).expect("clean rows");
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].index, 1.0);
        assert_eq!(rows[1].index, 4.0);
        assert_eq!(rows[1].expenses, None);
        assert_eq!(rows[1].sales_count, None);
        assert_eq!(rows[2].revenue, 1400.0);
    }

    #[test]
    fn short_records_yield_missing_cells() {
        let table = RawTable::from_grid(grid(&[&["1", "1000"], &["2", "1100", "650", "9"]]));
        let rows = clean_rows(&table, &ColumnContract::new()).expect("clean rows");
        assert_eq!(rows[0].expenses, None);
        assert_eq!(rows[1].expenses, Some(650.0));
    }

    #[test]
    fn fewer_than_two_valid_rows_is_insufficient() {
        let table = RawTable::from_grid(grid(&[&["1", "1000", "600", "10"], &["x", "y", "z", "w"]]));
        let err = clean_rows(&table, &ColumnContract::new()).unwrap_err();
        assert!(matches!(
            err,
            ReportError::InsufficientData {
                found: 1,
                required: 2
            }
        ));
    }

    #[test]
    fn missing_columns_are_checked_before_rows() {
        let mut g = grid(&[&["garbage"]]);
        g[2] = text_row(&["mes_sequencial", "faturamento"]);
        let err = clean_rows(&RawTable::from_grid(g), &ColumnContract::new()).unwrap_err();
        match err {
            ReportError::MissingColumns { missing } => {
                assert_eq!(missing, vec!["custos_totais", "total_vendas"]);
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }
}
