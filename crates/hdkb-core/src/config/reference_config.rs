//! Gate reference data configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration for the gate reference tables.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ReferenceConfig {
    /// Replacement reference data file. Default: the built-in table.
    pub gate_table: Option<PathBuf>,
}
