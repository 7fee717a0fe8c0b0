//! Article housekeeping configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_COLLECTION_PREFIX, DEFAULT_SKIP_FILES};

/// Configuration for article de-duplication and cleanup.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ArticlesConfig {
    /// Only collections whose folder name starts with this prefix are scanned.
    /// Default: `王骁老师`. An empty string keeps every collection.
    pub collection_prefix: Option<String>,
    /// File names never treated as articles. Default: `README.md`.
    #[serde(default)]
    pub skip_files: Vec<String>,
    /// Report what would be copied, moved or deleted without touching files.
    pub dry_run: Option<bool>,
}

impl ArticlesConfig {
    pub fn effective_collection_prefix(&self) -> &str {
        self.collection_prefix
            .as_deref()
            .unwrap_or(DEFAULT_COLLECTION_PREFIX)
    }

    pub fn effective_skip_files(&self) -> Vec<String> {
        if self.skip_files.is_empty() {
            DEFAULT_SKIP_FILES.iter().map(|s| s.to_string()).collect()
        } else {
            self.skip_files.clone()
        }
    }

    pub fn effective_dry_run(&self) -> bool {
        self.dry_run.unwrap_or(false)
    }
}
