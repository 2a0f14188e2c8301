//! Orchestrates ingest, forecast, assembly and rendering for one input file.

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{Local, NaiveDateTime};
use encoding_rs::{Encoding, UTF_8};
use log::info;

use crate::{
    error::{RenderError, ReportError, Result},
    forecast, ingest,
    render,
    report::{self, ReportDataset},
    style::ReportStyle,
};

pub const DEFAULT_OUTPUT_DIR: &str = "temp";
const OUTPUT_PREFIX: &str = "Forecast_Report";
const TIMESTAMP_FORMAT: &str = "%d-%m-%Y_%H-%M-%S";

#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub style: ReportStyle,
    pub input_encoding: &'static Encoding,
}

impl Default for ReportOptions {
    fn default() -> Self {
        ReportOptions {
            style: ReportStyle::default(),
            input_encoding: UTF_8,
        }
    }
}

/// `<input dir>/temp/Forecast_Report_<stem>_<dd-mm-YYYY_HH-MM-SS>.xlsx`
pub fn default_output_path(input: &Path, now: NaiveDateTime) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "input".to_string());
    let dir = input
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(DEFAULT_OUTPUT_DIR);
    dir.join(format!(
        "{OUTPUT_PREFIX}_{stem}_{}.xlsx",
        now.format(TIMESTAMP_FORMAT)
    ))
}

fn ensure_input_exists(input: &Path) -> Result<()> {
    if input.exists() {
        Ok(())
    } else {
        Err(ReportError::InputNotFound {
            path: input.to_path_buf(),
        })
    }
}

/// Runs every stage up to, but not including, rendering.
pub fn build_dataset(input: &Path, options: &ReportOptions) -> Result<ReportDataset> {
    ensure_input_exists(input)?;
    let rows = ingest::ingest_with_encoding(input, options.input_encoding)?;
    let projected = forecast::fit_and_forecast(&rows)?;
    Ok(report::assemble(&rows, &projected))
}

pub fn generate_report(input: &Path, output: Option<&Path>) -> Result<PathBuf> {
    generate_report_with(input, output, &ReportOptions::default())
}

pub fn generate_report_with(
    input: &Path,
    output: Option<&Path>,
    options: &ReportOptions,
) -> Result<PathBuf> {
    info!(
        "Processing {:?}",
        input.file_name().unwrap_or(input.as_os_str())
    );
    let dataset = build_dataset(input, options)?;

    let output_path = match output {
        Some(path) => path.to_path_buf(),
        None => {
            let path = default_output_path(input, Local::now().naive_local());
            if let Some(dir) = path.parent() {
                fs::create_dir_all(dir).map_err(RenderError::from)?;
            }
            path
        }
    };

    render::render(&dataset, &output_path, &options.style)?;
    info!(
        "Report with {} history and {} forecast row(s) saved to {:?}",
        dataset.history().count(),
        dataset.forecast().count(),
        output_path
    );
    Ok(output_path)
}
