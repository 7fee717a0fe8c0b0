//! Output (JSON/text report) errors.

use std::path::PathBuf;

use super::error_code::{self, HdkbErrorCode};

/// Errors that can occur while writing generated tables and reports.
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize {path}: {message}")]
    Serialize { path: PathBuf, message: String },
}

impl HdkbErrorCode for OutputError {
    fn error_code(&self) -> &'static str {
        error_code::OUTPUT_ERROR
    }
}
