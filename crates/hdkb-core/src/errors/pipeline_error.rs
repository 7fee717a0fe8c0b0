//! Pipeline errors and non-fatal error collection.

use std::path::PathBuf;

use super::error_code::{self, HdkbErrorCode};
use super::{ArticleError, ConfigError, OutputError, ReferenceError};

/// Errors that can occur during a pipeline run.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Reference error: {0}")]
    Reference(#[from] ReferenceError),

    #[error("Article error: {0}")]
    Article(#[from] ArticleError),

    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    #[error("Input not found: {path}")]
    InputMissing { path: PathBuf },

    #[error("Cannot read input {path}: {source}")]
    InputRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid input {path}: {message}")]
    InputInvalid { path: PathBuf, message: String },
}

impl PipelineError {
    /// Map an IO failure on a top-level input to the matching variant.
    pub fn input(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::InputMissing { path }
        } else {
            Self::InputRead { path, source }
        }
    }
}

impl HdkbErrorCode for PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Reference(e) => e.error_code(),
            Self::Article(e) => e.error_code(),
            Self::Output(e) => e.error_code(),
            Self::InputMissing { .. } | Self::InputRead { .. } => error_code::INPUT_MISSING,
            Self::InputInvalid { .. } => error_code::INPUT_INVALID,
        }
    }
}

/// Result of a pipeline run that accumulates non-fatal errors.
/// Allows partial results to be returned even when some files fail.
#[derive(Debug, Default)]
pub struct PipelineResult<T: Default = ()> {
    /// The successful result data.
    pub data: T,
    /// Non-fatal errors collected during the run.
    pub errors: Vec<PipelineError>,
}

impl<T: Default> PipelineResult<T> {
    /// Create a new pipeline result with no errors.
    pub fn new(data: T) -> Self {
        Self {
            data,
            errors: Vec::new(),
        }
    }

    /// Add a non-fatal error to the result.
    pub fn add_error(&mut self, error: impl Into<PipelineError>) {
        self.errors.push(error.into());
    }

    /// Returns true if there are no non-fatal errors.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of non-fatal errors.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}
