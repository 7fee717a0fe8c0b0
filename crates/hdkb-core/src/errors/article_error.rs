//! Article housekeeping errors.

use std::path::PathBuf;

use super::error_code::{self, HdkbErrorCode};

/// Errors that can occur while reading, copying, moving or deleting articles,
/// or while compiling a keyword policy.
#[derive(Debug, thiserror::Error)]
pub enum ArticleError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to {action} {from} -> {to}: {source}")]
    Transfer {
        action: &'static str,
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },

    #[error("Unknown keyword policy '{name}'")]
    UnknownPolicy { name: String },

    #[error("Invalid pattern in policy '{policy}': {message}")]
    InvalidPolicy { policy: String, message: String },
}

impl HdkbErrorCode for ArticleError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Io { .. } | Self::Transfer { .. } => error_code::ARTICLE_IO,
            Self::UnknownPolicy { .. } | Self::InvalidPolicy { .. } => error_code::POLICY_ERROR,
        }
    }
}
