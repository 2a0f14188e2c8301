use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about = "Forecast revenue and expenses from a period export", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build the forecast spreadsheet report for an export file
    Generate(GenerateArgs),
    /// Print the history tail and forecast rows without writing a report
    Preview(PreviewArgs),
    /// Write a blank export template with the expected header rows
    Template(TemplateArgs),
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Input export (.csv, .xlsx or .xls)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Output .xlsx path (defaults to a timestamped file under temp/ beside the input)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// YAML file overriding report colours, formats and labels
    #[arg(long = "style")]
    pub style: Option<PathBuf>,
    /// Character encoding of a CSV input (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Input export (.csv, .xlsx or .xls)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Emit the dataset as JSON instead of a table
    #[arg(long = "json")]
    pub json: bool,
    /// Character encoding of a CSV input (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct TemplateArgs {
    /// Destination CSV file
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,
}
