//! Gate identifier: a number in 1..=64, validated at construction.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A number that is not a valid gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("gate {0} is outside 1..=64")]
pub struct InvalidGate(pub u32);

/// One of the 64 gates. Serializes as a bare integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Gate(u8);

impl Gate {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 64;

    /// Returns `None` unless `n` is in 1..=64.
    pub fn new(n: u32) -> Option<Self> {
        if (Self::MIN as u32..=Self::MAX as u32).contains(&n) {
            Some(Self(n as u8))
        } else {
            None
        }
    }

    /// Parse a run of ASCII digits. Anything else, or an out-of-range value, is `None`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        s.parse::<u32>().ok().and_then(Self::new)
    }

    pub fn number(self) -> u8 {
        self.0
    }

    /// All 64 gates in ascending order.
    pub fn all() -> impl Iterator<Item = Gate> {
        (Self::MIN..=Self::MAX).map(Gate)
    }
}

impl TryFrom<u32> for Gate {
    type Error = InvalidGate;

    fn try_from(n: u32) -> Result<Self, Self::Error> {
        Self::new(n).ok_or(InvalidGate(n))
    }
}

impl From<Gate> for u32 {
    fn from(g: Gate) -> Self {
        g.0 as u32
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
