//! Incarnation cross types.

use std::fmt;

use hdkb_core::config::CrossDedupKey;
use hdkb_core::types::Gate;
use serde::{Deserialize, Serialize};

/// The three cross families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CrossType {
    RightAngle,
    LeftAngle,
    Juxtaposition,
}

impl CrossType {
    pub const ALL: [CrossType; 3] = [Self::RightAngle, Self::LeftAngle, Self::Juxtaposition];

    /// Header marker preceding `交叉之`.
    pub fn marker(&self) -> &'static str {
        match self {
            Self::RightAngle => "右角度",
            Self::LeftAngle => "左角度",
            Self::Juxtaposition => "并列",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::RightAngle => "right-angle",
            Self::LeftAngle => "left-angle",
            Self::Juxtaposition => "juxtaposition",
        }
    }

    /// Distinct cross names of this type.
    pub fn expected_names(&self) -> usize {
        match self {
            Self::RightAngle => 16,
            Self::LeftAngle => 32,
            Self::Juxtaposition => 64,
        }
    }

    /// Gate tuples listed under each name.
    pub fn variants_per_name(&self) -> usize {
        match self {
            Self::RightAngle => 4,
            Self::LeftAngle => 2,
            Self::Juxtaposition => 1,
        }
    }

    pub fn expected_records(&self) -> usize {
        self.expected_names() * self.variants_per_name()
    }

    /// Classify a header line by its leading marker.
    pub fn from_header(header: &str) -> Option<Self> {
        let header = header.trim_start();
        Self::ALL
            .into_iter()
            .find(|t| header.starts_with(t.marker()))
    }
}

impl fmt::Display for CrossType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Personality sun/earth then design sun/earth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CrossGates {
    pub black_sun: Gate,
    pub black_earth: Gate,
    pub red_sun: Gate,
    pub red_earth: Gate,
}

impl CrossGates {
    pub fn as_array(&self) -> [Gate; 4] {
        [self.black_sun, self.black_earth, self.red_sun, self.red_earth]
    }

    /// `g1-g2-g3-g4`.
    pub fn key(&self) -> String {
        let [a, b, c, d] = self.as_array();
        format!("{a}-{b}-{c}-{d}")
    }
}

/// One extracted cross.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossRecord {
    pub chinese_name: String,
    pub english_name: String,
    #[serde(rename = "type")]
    pub cross_type: CrossType,
    pub gates: CrossGates,
    pub key: String,
}

/// Counters from one extraction run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CrossStats {
    /// Header lines starting with a cross marker.
    pub headers_seen: usize,
    /// Headers followed by a well-formed English/gates line.
    pub matched: usize,
    /// Matches dropped because a gate number was outside 1..=64.
    pub rejected_gates: usize,
    /// Matches dropped by the configured dedup key.
    pub duplicates_dropped: usize,
    /// Survivors when deduplicating by type plus gates.
    pub unique_typed: usize,
    /// Survivors when deduplicating by gates alone.
    pub unique_gates: usize,
    pub dedup_key: CrossDedupKey,
}

impl CrossStats {
    /// Headers that never produced a match.
    pub fn skipped_headers(&self) -> usize {
        self.headers_seen.saturating_sub(self.matched)
    }
}

/// Unique crosses in order of discovery.
#[derive(Debug, Clone, Default)]
pub struct CrossExtraction {
    pub records: Vec<CrossRecord>,
    pub stats: CrossStats,
}
