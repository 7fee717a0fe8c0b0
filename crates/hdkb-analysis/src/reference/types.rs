//! Reference table types and lookups.

use std::fmt;

use hdkb_core::types::{Center, Gate};
use serde::Serialize;

/// Fixed note attached to every opposite-gate record.
pub const OPPOSITE_NOTE: &str = "南北交点（Nodes）的闸门对宫关系，爻线必须一致";

/// One row of the gate table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateInfo {
    pub gate: Gate,
    pub name: String,
    pub center: Center,
    pub opposite: Gate,
}

/// An unordered pair of distinct gates, stored low-high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelKey {
    low: Gate,
    high: Gate,
}

impl ChannelKey {
    /// `None` when both gates are the same.
    pub fn new(a: Gate, b: Gate) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { low: a, high: b }),
            std::cmp::Ordering::Greater => Some(Self { low: b, high: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Build from raw numbers; `None` if either is out of range or they are equal.
    pub fn from_numbers(a: u32, b: u32) -> Option<Self> {
        Self::new(Gate::new(a)?, Gate::new(b)?)
    }

    pub fn low(&self) -> Gate {
        self.low
    }

    pub fn high(&self) -> Gate {
        self.high
    }

    pub fn gates(&self) -> [Gate; 2] {
        [self.low, self.high]
    }
}

impl fmt::Display for ChannelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.low, self.high)
    }
}

/// Output row of the gate → center table.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GateCenterRecord {
    pub gate: Gate,
    pub gate_name: String,
    pub center: Center,
    pub center_chinese: &'static str,
    pub center_english: &'static str,
}

/// Output row of the gate → opposite table.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GateOppositeRecord {
    pub gate: Gate,
    pub gate_name: String,
    pub opposite_gate: Gate,
    pub opposite_name: String,
    pub note: &'static str,
}

/// Validated gate reference data. Construct with [`GateReference::builtin`]
/// or [`GateReference::from_toml_str`].
#[derive(Debug, Clone)]
pub struct GateReference {
    pub(super) version: u32,
    /// Indexed by `gate - 1`.
    pub(super) gates: Vec<GateInfo>,
    pub(super) channels: Vec<ChannelKey>,
}

impl GateReference {
    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn info(&self, gate: Gate) -> &GateInfo {
        &self.gates[gate.number() as usize - 1]
    }

    pub fn center(&self, gate: Gate) -> Center {
        self.info(gate).center
    }

    pub fn opposite(&self, gate: Gate) -> Gate {
        self.info(gate).opposite
    }

    pub fn name(&self, gate: Gate) -> &str {
        &self.info(gate).name
    }

    /// Gates of a center, ascending.
    pub fn gates_in(&self, center: Center) -> Vec<Gate> {
        self.gates
            .iter()
            .filter(|g| g.center == center)
            .map(|g| g.gate)
            .collect()
    }

    /// Gate count per center, in [`Center::ALL`] order.
    pub fn center_sizes(&self) -> Vec<(Center, usize)> {
        Center::ALL
            .iter()
            .map(|&c| (c, self.gates.iter().filter(|g| g.center == c).count()))
            .collect()
    }

    /// The 36 canonical channels in reference order.
    pub fn canonical_channels(&self) -> &[ChannelKey] {
        &self.channels
    }

    pub fn is_canonical(&self, key: ChannelKey) -> bool {
        self.channels.contains(&key)
    }

    /// The centers a channel joins, in the channel's low-high gate order.
    pub fn channel_centers(&self, key: ChannelKey) -> [Center; 2] {
        [self.center(key.low()), self.center(key.high())]
    }

    pub fn gates(&self) -> impl Iterator<Item = &GateInfo> {
        self.gates.iter()
    }

    /// The 64-row gate → center table.
    pub fn gate_center_records(&self) -> Vec<GateCenterRecord> {
        self.gates
            .iter()
            .map(|g| GateCenterRecord {
                gate: g.gate,
                gate_name: g.name.clone(),
                center: g.center,
                center_chinese: g.center.chinese(),
                center_english: g.center.english(),
            })
            .collect()
    }

    /// The 64-row gate → opposite table.
    pub fn gate_opposite_records(&self) -> Vec<GateOppositeRecord> {
        self.gates
            .iter()
            .map(|g| GateOppositeRecord {
                gate: g.gate,
                gate_name: g.name.clone(),
                opposite_gate: g.opposite,
                opposite_name: self.name(g.opposite).to_string(),
                note: OPPOSITE_NOTE,
            })
            .collect()
    }
}
