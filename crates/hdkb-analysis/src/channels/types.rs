//! Channel record types.

use hdkb_core::constants::MISSING_CHANNEL_NAME;
use hdkb_core::types::{FxHashMap, Gate};
use serde::{Deserialize, Serialize};

use crate::reference::{ChannelKey, GateReference};

/// One channel as read from a single source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelRecord {
    pub gates: [Gate; 2],
    pub chinese_name: String,
    #[serde(default)]
    pub english_name: String,
    #[serde(default)]
    pub description: String,
    pub key: String,
}

impl ChannelRecord {
    pub fn new(key: ChannelKey, chinese_name: impl Into<String>) -> Self {
        Self {
            gates: key.gates(),
            chinese_name: chinese_name.into(),
            english_name: String::new(),
            description: String::new(),
            key: key.to_string(),
        }
    }

    pub fn channel_key(&self) -> Option<ChannelKey> {
        ChannelKey::new(self.gates[0], self.gates[1])
    }
}

/// Counters from one extraction run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChannelStats {
    /// Lines in the scanned text (or section).
    pub lines_scanned: usize,
    /// Header lines the pattern recognized.
    pub headers_matched: usize,
    /// Headers dropped because a channel with the same key came first.
    pub duplicates_skipped: usize,
    /// Headers dropped because a gate was out of range or both gates were equal.
    pub invalid_skipped: usize,
}

/// Output of a channel extractor: unique channels in order of discovery.
#[derive(Debug, Clone, Default)]
pub struct ChannelExtraction {
    pub records: Vec<ChannelRecord>,
    pub stats: ChannelStats,
}

impl ChannelExtraction {
    /// Records keyed by canonical `low-high` key.
    pub fn by_key(&self) -> FxHashMap<&str, &ChannelRecord> {
        self.records.iter().map(|r| (r.key.as_str(), r)).collect()
    }

    /// Canonical channels this source does not mention, as `low-high` keys.
    pub fn missing_canonical(&self, reference: &GateReference) -> Vec<String> {
        let found = self.by_key();
        reference
            .canonical_channels()
            .iter()
            .map(ChannelKey::to_string)
            .filter(|key| !found.contains_key(key.as_str()))
            .collect()
    }

    /// Extracted channels outside the canonical 36.
    pub fn non_canonical(&self, reference: &GateReference) -> Vec<&ChannelRecord> {
        self.records
            .iter()
            .filter(|r| r.channel_key().is_some_and(|k| !reference.is_canonical(k)))
            .collect()
    }
}

/// Which sources contributed a merged channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelSource {
    /// Both sources had it; names from the primary, description from the secondary.
    Combined,
    Primary,
    Secondary,
    /// Neither source had it; placeholder row.
    Missing,
}

/// One of the 36 canonical channels after merging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedChannel {
    pub gates: [Gate; 2],
    pub chinese_name: String,
    pub english_name: String,
    pub description: String,
    pub key: String,
    pub source: ChannelSource,
}

impl MergedChannel {
    pub(crate) fn placeholder(key: ChannelKey) -> Self {
        Self {
            gates: key.gates(),
            chinese_name: MISSING_CHANNEL_NAME.to_string(),
            english_name: String::new(),
            description: String::new(),
            key: key.to_string(),
            source: ChannelSource::Missing,
        }
    }
}

/// Per-source tallies of a merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeSummary {
    pub combined: usize,
    pub primary_only: usize,
    pub secondary_only: usize,
    pub missing: Vec<String>,
}

impl MergeSummary {
    pub fn from_channels(channels: &[MergedChannel]) -> Self {
        let mut summary = Self::default();
        for ch in channels {
            match ch.source {
                ChannelSource::Combined => summary.combined += 1,
                ChannelSource::Primary => summary.primary_only += 1,
                ChannelSource::Secondary => summary.secondary_only += 1,
                ChannelSource::Missing => summary.missing.push(ch.key.clone()),
            }
        }
        summary
    }

    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Read access shared by single-source and merged channel rows.
pub trait ChannelLike {
    fn gates(&self) -> [Gate; 2];
    fn key(&self) -> &str;
    fn chinese_name(&self) -> &str;
    fn english_name(&self) -> &str;
    fn description(&self) -> &str;
}

impl ChannelLike for ChannelRecord {
    fn gates(&self) -> [Gate; 2] {
        self.gates
    }
    fn key(&self) -> &str {
        &self.key
    }
    fn chinese_name(&self) -> &str {
        &self.chinese_name
    }
    fn english_name(&self) -> &str {
        &self.english_name
    }
    fn description(&self) -> &str {
        &self.description
    }
}

impl ChannelLike for MergedChannel {
    fn gates(&self) -> [Gate; 2] {
        self.gates
    }
    fn key(&self) -> &str {
        &self.key
    }
    fn chinese_name(&self) -> &str {
        &self.chinese_name
    }
    fn english_name(&self) -> &str {
        &self.english_name
    }
    fn description(&self) -> &str {
        &self.description
    }
}
