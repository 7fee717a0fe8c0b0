//! Input and output locations.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_OUTPUT_DIR;
use crate::errors::ConfigError;

/// Every path a pipeline reads from or writes to.
///
/// Relative paths are resolved by the caller against the working directory.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PathsConfig {
    /// Root of the knowledge-base tree (census).
    pub knowledge_base: Option<PathBuf>,
    /// Incarnation-cross reference text.
    pub crosses_source: Option<PathBuf>,
    /// Channel listing text (`<g>-<g> <name>` lines with descriptions).
    pub channel_listing: Option<PathBuf>,
    /// Book text containing the channel chapter.
    pub channel_chapter: Option<PathBuf>,
    /// Folder of downloaded articles to de-duplicate.
    pub articles_source: Option<PathBuf>,
    /// Destination of the de-duplicated articles.
    pub articles_output: Option<PathBuf>,
    /// Paid-article folder.
    pub paid_dir: Option<PathBuf>,
    /// Free-article folder.
    pub free_dir: Option<PathBuf>,
    /// Previous article folder, compared against the paid/free split.
    pub old_articles_dir: Option<PathBuf>,
    /// Folder scanned for `副本` copies.
    pub copies_dir: Option<PathBuf>,
    /// Where generated JSON tables and reports go. Default: `data`.
    pub output_dir: Option<PathBuf>,
}

impl PathsConfig {
    /// Returns the effective output directory, defaulting to `data`.
    pub fn effective_output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
    }

    /// Returns a configured path or a `MissingValue` error naming the field.
    pub fn require<'a>(value: &'a Option<PathBuf>, field: &str) -> Result<&'a Path, ConfigError> {
        value.as_deref().ok_or_else(|| ConfigError::MissingValue {
            field: format!("paths.{field}"),
        })
    }
}
