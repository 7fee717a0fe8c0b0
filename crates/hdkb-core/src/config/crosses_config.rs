//! Incarnation-cross extraction configuration.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which key identifies a duplicate cross.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CrossDedupKey {
    /// Cross type plus the 4-gate tuple. The same gates may form crosses of
    /// different types, so this keeps them apart.
    #[default]
    Typed,
    /// The 4-gate tuple alone.
    Gates,
}

impl CrossDedupKey {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Typed => "typed",
            Self::Gates => "gates",
        }
    }
}

impl FromStr for CrossDedupKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "typed" => Ok(Self::Typed),
            "gates" => Ok(Self::Gates),
            other => Err(format!("unknown dedup key '{other}' (expected 'typed' or 'gates')")),
        }
    }
}

/// Configuration for the cross extractor.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CrossesConfig {
    /// Dedup key. Default: `typed`.
    pub dedup_key: Option<CrossDedupKey>,
}

impl CrossesConfig {
    pub fn effective_dedup_key(&self) -> CrossDedupKey {
        self.dedup_key.unwrap_or_default()
    }
}
