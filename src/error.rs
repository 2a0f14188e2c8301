//! Error taxonomy for the report pipeline.
//!
//! Every stage fails fast with one of the [`ReportError`] variants and the
//! orchestrator hands that error upward unchanged, so callers can always tell
//! which stage failed. [`ReportError::fault`] classifies an error as a client
//! fault (bad input) or a server fault (internal failure).

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Input file not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    #[error("Unsupported input format '{extension}' for {}: use .csv, .xlsx or .xls", path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error("Failed to read {}: {message}", path.display())]
    Ingestion { path: PathBuf, message: String },

    #[error("Required columns not found on row 3: {}", missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    #[error("Not enough data to analyse: {found} valid row(s), at least {required} required")]
    InsufficientData { found: usize, required: usize },

    #[error("Failed to fit {series} trend: {reason}")]
    Forecast { series: &'static str, reason: String },

    #[error("Failed to render report: {0}")]
    Render(#[from] RenderError),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("spreadsheet writer error: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid style configuration: {0}")]
    Style(String),

    #[error("report dataset has no rows")]
    EmptyDataset,
}

/// Which side of a request boundary an error should be blamed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    Client,
    Server,
}

impl ReportError {
    pub(crate) fn ingestion(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        ReportError::Ingestion {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub fn fault(&self) -> FaultKind {
        match self {
            ReportError::InputNotFound { .. }
            | ReportError::UnsupportedFormat { .. }
            | ReportError::Ingestion { .. }
            | ReportError::MissingColumns { .. }
            | ReportError::InsufficientData { .. } => FaultKind::Client,
            ReportError::Forecast { .. } | ReportError::Render(_) => FaultKind::Server,
        }
    }

    pub fn is_client_fault(&self) -> bool {
        self.fault() == FaultKind::Client
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
