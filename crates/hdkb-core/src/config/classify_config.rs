//! Paid/free classification configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CLASSIFY_POLICY, DEFAULT_CONTEXT_CHARS, DEFAULT_RECHECK_POLICY};

/// Configuration for the keyword classifier.
///
/// Keyword lists are data, not code: the built-in policies can be replaced
/// by pointing `policy_file` at a TOML file with `[[policies]]` tables.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ClassifyConfig {
    /// Policy used by the first classification pass. Default: `loose`.
    pub policy: Option<String>,
    /// Policy used by the recheck pass. Default: `strict`.
    pub recheck_policy: Option<String>,
    /// Replacement policy file.
    pub policy_file: Option<PathBuf>,
    /// Characters of context captured around a paid marker. Default: 20.
    pub context_chars: Option<usize>,
}

impl ClassifyConfig {
    pub fn effective_policy(&self) -> &str {
        self.policy.as_deref().unwrap_or(DEFAULT_CLASSIFY_POLICY)
    }

    pub fn effective_recheck_policy(&self) -> &str {
        self.recheck_policy.as_deref().unwrap_or(DEFAULT_RECHECK_POLICY)
    }

    pub fn effective_context_chars(&self) -> usize {
        self.context_chars.unwrap_or(DEFAULT_CONTEXT_CHARS)
    }
}
