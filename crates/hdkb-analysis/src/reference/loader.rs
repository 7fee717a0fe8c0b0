//! Loading and validating the gate reference TOML.

use std::path::Path;

use hdkb_core::constants::{CANONICAL_CHANNEL_COUNT, GATE_COUNT};
use hdkb_core::errors::ReferenceError;
use hdkb_core::types::{Center, FxHashSet, Gate};
use serde::Deserialize;

use super::types::{ChannelKey, GateInfo, GateReference};

static BUILTIN_REFERENCE: &str = include_str!("../../data/gate_reference.toml");

#[derive(Debug, Deserialize)]
struct RawReference {
    version: u32,
    gates: Vec<RawGate>,
    #[serde(default)]
    channels: Vec<RawChannel>,
}

#[derive(Debug, Deserialize)]
struct RawGate {
    gate: u32,
    name: String,
    center: String,
    opposite: u32,
}

#[derive(Debug, Deserialize)]
struct RawChannel {
    gates: [u32; 2],
}

impl GateReference {
    /// The reference tables compiled into the binary.
    pub fn builtin() -> Result<Self, ReferenceError> {
        Self::from_toml_str(BUILTIN_REFERENCE)
    }

    /// Load a replacement reference file.
    pub fn from_file(path: &Path) -> Result<Self, ReferenceError> {
        let content = std::fs::read_to_string(path).map_err(|e| ReferenceError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate. Any inconsistency fails the whole load.
    pub fn from_toml_str(content: &str) -> Result<Self, ReferenceError> {
        let raw: RawReference =
            toml::from_str(content).map_err(|e| ReferenceError::Parse(e.to_string()))?;

        let gates = validate_gates(&raw.gates)?;
        let channels = validate_channels(&raw.channels)?;

        let reference = GateReference {
            version: raw.version,
            gates,
            channels,
        };
        tracing::debug!(
            version = reference.version,
            gates = reference.gates.len(),
            channels = reference.channels.len(),
            "gate reference loaded"
        );
        Ok(reference)
    }
}

fn validate_gates(raw: &[RawGate]) -> Result<Vec<GateInfo>, ReferenceError> {
    let mut slots: Vec<Option<GateInfo>> = vec![None; GATE_COUNT];

    for row in raw {
        let gate = Gate::new(row.gate).ok_or(ReferenceError::GateOutOfRange { gate: row.gate })?;
        let opposite = Gate::new(row.opposite).ok_or(ReferenceError::GateOutOfRange {
            gate: row.opposite,
        })?;
        let center = row
            .center
            .parse::<Center>()
            .map_err(|_| ReferenceError::UnknownCenter {
                gate: row.gate,
                center: row.center.clone(),
            })?;
        if gate == opposite {
            return Err(ReferenceError::SelfOpposite { gate: row.gate });
        }

        let slot = &mut slots[gate.number() as usize - 1];
        if slot.is_some() {
            return Err(ReferenceError::DuplicateGate { gate: row.gate });
        }
        *slot = Some(GateInfo {
            gate,
            name: row.name.clone(),
            center,
            opposite,
        });
    }

    let mut gates = Vec::with_capacity(GATE_COUNT);
    for (idx, slot) in slots.into_iter().enumerate() {
        match slot {
            Some(info) => gates.push(info),
            None => {
                return Err(ReferenceError::MissingGate {
                    gate: idx as u32 + 1,
                })
            }
        }
    }

    for info in &gates {
        let back = gates[info.opposite.number() as usize - 1].opposite;
        if back != info.gate {
            return Err(ReferenceError::AsymmetricOpposite {
                gate: info.gate.number() as u32,
                opposite: info.opposite.number() as u32,
                back: back.number() as u32,
            });
        }
    }

    for center in Center::ALL {
        let actual = gates.iter().filter(|g| g.center == center).count();
        let expected = center.expected_gate_count();
        if actual != expected {
            return Err(ReferenceError::CenterSizeMismatch {
                center: center.id().to_string(),
                expected,
                actual,
            });
        }
    }

    Ok(gates)
}

fn validate_channels(raw: &[RawChannel]) -> Result<Vec<ChannelKey>, ReferenceError> {
    let mut seen = FxHashSet::default();
    let mut channels = Vec::with_capacity(raw.len());

    for row in raw {
        let [a, b] = row.gates;
        let key = ChannelKey::from_numbers(a, b).ok_or_else(|| ReferenceError::InvalidChannel {
            a,
            b,
            message: "gates must be two distinct numbers in 1..=64".to_string(),
        })?;
        if !seen.insert(key) {
            return Err(ReferenceError::DuplicateChannel {
                key: key.to_string(),
            });
        }
        channels.push(key);
    }

    if channels.len() != CANONICAL_CHANNEL_COUNT {
        return Err(ReferenceError::ChannelCount {
            expected: CANONICAL_CHANNEL_COUNT,
            actual: channels.len(),
        });
    }
    Ok(channels)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate(n: u32) -> Gate {
        Gate::new(n).unwrap()
    }

    #[test]
    fn test_builtin_loads() {
        let reference = GateReference::builtin().unwrap();
        assert_eq!(reference.version(), 1);
        assert_eq!(reference.gates().count(), 64);
        assert_eq!(reference.canonical_channels().len(), 36);
    }

    #[test]
    fn test_builtin_center_sizes_match_domain() {
        let reference = GateReference::builtin().unwrap();
        for (center, size) in reference.center_sizes() {
            assert_eq!(size, center.expected_gate_count(), "center {center}");
        }
        assert_eq!(reference.gates_in(Center::Head).len(), 3);
        assert_eq!(reference.gates_in(Center::Throat).len(), 11);
    }

    #[test]
    fn test_builtin_opposites_are_an_involution() {
        let reference = GateReference::builtin().unwrap();
        for g in Gate::all() {
            let opp = reference.opposite(g);
            assert_ne!(opp, g);
            assert_eq!(reference.opposite(opp), g);
        }
    }

    #[test]
    fn test_builtin_lookups() {
        let reference = GateReference::builtin().unwrap();
        assert_eq!(reference.center(gate(1)), Center::G);
        assert_eq!(reference.center(gate(64)), Center::Head);
        assert_eq!(reference.opposite(gate(1)), gate(2));
        assert!(reference.is_canonical(ChannelKey::from_numbers(8, 1).unwrap()));
        assert!(!reference.is_canonical(ChannelKey::from_numbers(1, 2).unwrap()));
    }

    #[test]
    fn test_parse_error() {
        let err = GateReference::from_toml_str("version = ").unwrap_err();
        assert!(matches!(err, ReferenceError::Parse(_)));
    }

    #[test]
    fn test_missing_gate_is_rejected() {
        let mut raw: RawReference = toml::from_str(BUILTIN_REFERENCE).unwrap();
        raw.gates.retain(|g| g.gate != 64);
        let err = validate_gates(&raw.gates).unwrap_err();
        assert!(matches!(err, ReferenceError::MissingGate { gate: 64 }), "got {err}");
    }

    #[test]
    fn test_duplicate_gate_is_rejected() {
        let mut raw: RawReference = toml::from_str(BUILTIN_REFERENCE).unwrap();
        let dup = RawGate {
            gate: 5,
            name: "需".to_string(),
            center: "sacral".to_string(),
            opposite: 35,
        };
        raw.gates.push(dup);
        let err = validate_gates(&raw.gates).unwrap_err();
        assert!(matches!(err, ReferenceError::DuplicateGate { gate: 5 }), "got {err}");
    }

    #[test]
    fn test_channel_count_is_checked() {
        let mut raw: RawReference = toml::from_str(BUILTIN_REFERENCE).unwrap();
        raw.channels.pop();
        let err = validate_channels(&raw.channels).unwrap_err();
        assert!(matches!(
            err,
            ReferenceError::ChannelCount {
                expected: 36,
                actual: 35
            }
        ));
    }

    #[test]
    fn test_duplicate_channel_is_rejected() {
        let rows = vec![RawChannel { gates: [1, 8] }, RawChannel { gates: [8, 1] }];
        let err = validate_channels(&rows).unwrap_err();
        assert!(matches!(err, ReferenceError::DuplicateChannel { ref key } if key == "1-8"));
    }

    #[test]
    fn test_self_channel_is_rejected() {
        let rows = vec![RawChannel { gates: [5, 5] }];
        assert!(matches!(
            validate_channels(&rows).unwrap_err(),
            ReferenceError::InvalidChannel { a: 5, b: 5, .. }
        ));
    }

    #[test]
    fn test_asymmetric_opposite_is_rejected() {
        let mut raw: RawReference = toml::from_str(BUILTIN_REFERENCE).unwrap();
        // 1 <-> 2 becomes 1 -> 3 while 3 still points at 50.
        raw.gates.iter_mut().find(|g| g.gate == 1).unwrap().opposite = 3;
        let err = validate_gates(&raw.gates).unwrap_err();
        assert!(matches!(err, ReferenceError::AsymmetricOpposite { .. }), "got {err}");
    }

    #[test]
    fn test_unknown_center_is_rejected() {
        let mut raw: RawReference = toml::from_str(BUILTIN_REFERENCE).unwrap();
        raw.gates[0].center = "crown".to_string();
        assert!(matches!(
            validate_gates(&raw.gates).unwrap_err(),
            ReferenceError::UnknownCenter { .. }
        ));
    }

    #[test]
    fn test_center_size_mismatch_is_rejected() {
        let mut raw: RawReference = toml::from_str(BUILTIN_REFERENCE).unwrap();
        let row = raw.gates.iter_mut().find(|g| g.center == "throat").unwrap();
        row.center = "ajna".to_string();
        assert!(matches!(
            validate_gates(&raw.gates).unwrap_err(),
            ReferenceError::CenterSizeMismatch { .. }
        ));
    }

    #[test]
    fn test_records_shapes() {
        let reference = GateReference::builtin().unwrap();
        let centers = reference.gate_center_records();
        assert_eq!(centers.len(), 64);
        let first = serde_json::to_value(&centers[0]).unwrap();
        assert_eq!(first["gate"], 1);
        assert_eq!(first["center"], "g");
        assert_eq!(first["center_chinese"], "G中心");

        let opposites = reference.gate_opposite_records();
        let first = serde_json::to_value(&opposites[0]).unwrap();
        assert_eq!(first["opposite_gate"], 2);
        assert_eq!(first["note"], super::super::types::OPPOSITE_NOTE);
    }
}
