use std::path::PathBuf;

use crate::normalize::DropReport;

#[derive(Debug, thiserror::Error)]
pub enum LicitaError {
    #[error("input file does not exist: {}", path.display())]
    InputNotFound { path: PathBuf },

    #[error("PDF extraction failed: {0}")]
    Extraction(String),

    #[error("pdftotext not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PdftotextNotFound,

    #[error("pdftotext failed with exit code {code}: {stderr}")]
    PdftotextFailed { code: i32, stderr: String },

    #[error("no tabular data found in document (no table row with at least 4 cells)")]
    NoTabularData,

    #[error("no valid rows left after cleaning ({dropped})")]
    NoValidRecords { dropped: DropReport },

    #[error("total quantity of {0} exceeds the representable range")]
    QuantityOverflow(String),

    #[error("spreadsheet error: {0}")]
    Sheet(String),

    #[error("required column '{0}' not found")]
    MissingColumn(String),

    #[error("failed to load ruleset from {path}: {reason}")]
    RulesetLoad { path: PathBuf, reason: String },

    #[error("invalid ruleset: {0}")]
    RulesetInvalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<rust_xlsxwriter::XlsxError> for LicitaError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        LicitaError::Sheet(e.to_string())
    }
}
