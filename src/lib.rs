pub mod cli;
pub mod columns;
pub mod data;
pub mod error;
pub mod forecast;
pub mod ingest;
pub mod io_utils;
pub mod pipeline;
pub mod render;
pub mod report;
pub mod style;
pub mod table;
pub mod template;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info};

use crate::cli::{Cli, Commands};

pub use crate::error::{FaultKind, RenderError, ReportError};
pub use crate::pipeline::{ReportOptions, generate_report, generate_report_with};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("revenue_forecast", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Generate(args) => handle_generate(&args),
        Commands::Preview(args) => handle_preview(&args),
        Commands::Template(args) => template::execute(&args),
    }
}

fn handle_generate(args: &cli::GenerateArgs) -> Result<()> {
    let mut options = ReportOptions {
        input_encoding: io_utils::resolve_encoding(args.input_encoding.as_deref())?,
        ..ReportOptions::default()
    };
    if let Some(path) = &args.style {
        options.style = style::ReportStyle::load(path)?;
    }
    let output = generate_report_with(&args.input, args.output.as_deref(), &options)
        .with_context(|| format!("Generating report for {:?}", args.input))?;
    println!("{}", output.display());
    Ok(())
}

fn handle_preview(args: &cli::PreviewArgs) -> Result<()> {
    let options = ReportOptions {
        input_encoding: io_utils::resolve_encoding(args.input_encoding.as_deref())?,
        ..ReportOptions::default()
    };
    let dataset = pipeline::build_dataset(&args.input, &options)
        .with_context(|| format!("Building forecast for {:?}", args.input))?;
    if args.json {
        let json = serde_json::to_string_pretty(&dataset).context("Serialising dataset")?;
        println!("{json}");
    } else {
        let labels = style::ReportLabels::default();
        let headers = labels
            .titles()
            .iter()
            .map(|title| title.to_string())
            .collect::<Vec<_>>();
        table::print_table(&headers, &table::dataset_rows(&dataset));
    }
    info!(
        "Previewed {} history and {} forecast row(s)",
        dataset.history().count(),
        dataset.forecast().count()
    );
    Ok(())
}
