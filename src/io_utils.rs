//! I/O utilities for reading the raw input grid and writing CSV templates.
//!
//! All file reads in the pipeline flow through this module. It provides:
//!
//! - **Format resolution**: extension-based detection of CSV versus
//!   spreadsheet input.
//! - **Encoding**: CSV input decoding via `encoding_rs`, defaulting to UTF-8.
//! - **Grid reading**: every physical row of the file as [`CellValue`]s, from
//!   either a CSV reader or the first worksheet of a workbook (`calamine`).
//! - **Writer construction**: `open_csv_writer` for the input template.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use anyhow::{Context, anyhow};
use calamine::{Reader, open_workbook_auto};
use encoding_rs::{Encoding, UTF_8};

use crate::{
    data::CellValue,
    error::{ReportError, Result},
};

const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Spreadsheet,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        if extension.eq_ignore_ascii_case("csv") {
            Ok(InputFormat::Csv)
        } else if SPREADSHEET_EXTENSIONS
            .iter()
            .any(|known| extension.eq_ignore_ascii_case(known))
        {
            Ok(InputFormat::Spreadsheet)
        } else {
            Err(ReportError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension: extension.to_string(),
            })
        }
    }
}

pub fn resolve_encoding(label: Option<&str>) -> anyhow::Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))
    } else {
        Ok(UTF_8)
    }
}

pub fn open_csv_reader<R>(reader: R) -> csv::Reader<R>
where
    R: Read,
{
    // The decorative rows rarely share the header's width.
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(false)
        .delimiter(b',')
        .double_quote(true)
        .flexible(true);
    builder.from_reader(reader)
}

pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Option<String> {
    let (text, _, had_errors) = encoding.decode(bytes);
    (!had_errors).then(|| text.into_owned())
}

/// Reads every physical row of `path` as cells.
pub fn read_grid(
    path: &Path,
    format: InputFormat,
    encoding: &'static Encoding,
) -> Result<Vec<Vec<CellValue>>> {
    match format {
        InputFormat::Csv => read_csv_grid(path, encoding),
        InputFormat::Spreadsheet => read_spreadsheet_grid(path),
    }
}

fn read_csv_grid(path: &Path, encoding: &'static Encoding) -> Result<Vec<Vec<CellValue>>> {
    let file = File::open(path).map_err(|err| ReportError::ingestion(path, err))?;
    let mut reader = open_csv_reader(BufReader::new(file));
    let mut grid = Vec::new();
    for (row_idx, record) in reader.byte_records().enumerate() {
        let record = record.map_err(|err| {
            ReportError::ingestion(path, format!("row {}: {err}", row_idx + 1))
        })?;
        let row = record
            .iter()
            .map(|field| {
                decode_bytes(field, encoding)
                    .map(|text| CellValue::from_text(&text))
                    .ok_or_else(|| {
                        ReportError::ingestion(
                            path,
                            format!(
                                "row {}: text is not valid {}",
                                row_idx + 1,
                                encoding.name()
                            ),
                        )
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        grid.push(row);
    }
    Ok(grid)
}

fn read_spreadsheet_grid(path: &Path) -> Result<Vec<Vec<CellValue>>> {
    let mut workbook = open_workbook_auto(path).map_err(|err| ReportError::ingestion(path, err))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ReportError::ingestion(path, "workbook contains no worksheets"))?
        .map_err(|err| ReportError::ingestion(path, err))?;

    // calamine trims leading blank rows/columns; put them back so row
    // positions stay physical.
    let (start_row, start_col) = range.start().unwrap_or((0, 0));
    let mut grid: Vec<Vec<CellValue>> = (0..start_row).map(|_| Vec::new()).collect();
    for row in range.rows() {
        let mut cells = vec![CellValue::Empty; start_col as usize];
        cells.extend(row.iter().map(CellValue::from));
        grid.push(cells);
    }
    Ok(grid)
}

pub fn open_csv_writer(path: &Path) -> anyhow::Result<csv::Writer<Box<dyn Write>>> {
    let file = File::create(path).with_context(|| format!("Creating output file {path:?}"))?;
    let writer: Box<dyn Write> = Box::new(BufWriter::new(file));
    let mut builder = csv::WriterBuilder::new();
    builder.flexible(true).double_quote(true);
    Ok(builder.from_writer(writer))
}
