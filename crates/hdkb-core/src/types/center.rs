//! The nine energy centers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::CENTER_COUNT;

/// An energy center. Serializes as its snake_case id (`solar_plexus`, `g`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Center {
    Head,
    Ajna,
    Throat,
    G,
    Heart,
    Sacral,
    Spleen,
    SolarPlexus,
    Root,
}

impl Center {
    /// All centers, top of the bodygraph first.
    pub const ALL: [Center; CENTER_COUNT] = [
        Self::Head,
        Self::Ajna,
        Self::Throat,
        Self::G,
        Self::Heart,
        Self::Sacral,
        Self::Spleen,
        Self::SolarPlexus,
        Self::Root,
    ];

    /// The four motor centers.
    pub const MOTORS: [Center; 4] = [Self::Sacral, Self::Heart, Self::SolarPlexus, Self::Root];

    pub fn id(&self) -> &'static str {
        match self {
            Self::Head => "head",
            Self::Ajna => "ajna",
            Self::Throat => "throat",
            Self::G => "g",
            Self::Heart => "heart",
            Self::Sacral => "sacral",
            Self::Spleen => "spleen",
            Self::SolarPlexus => "solar_plexus",
            Self::Root => "root",
        }
    }

    pub fn chinese(&self) -> &'static str {
        match self {
            Self::Head => "头部中心",
            Self::Ajna => "逻辑中心",
            Self::Throat => "喉咙中心",
            Self::G => "G中心",
            Self::Heart => "意志力中心",
            Self::Sacral => "荐骨中心",
            Self::Spleen => "直觉中心",
            Self::SolarPlexus => "情绪中心",
            Self::Root => "根部中心",
        }
    }

    pub fn english(&self) -> &'static str {
        match self {
            Self::Head => "Head Center",
            Self::Ajna => "Ajna Center",
            Self::Throat => "Throat Center",
            Self::G => "G Center",
            Self::Heart => "Heart/Ego Center",
            Self::Sacral => "Sacral Center",
            Self::Spleen => "Spleen Center",
            Self::SolarPlexus => "Solar Plexus/Emotional Center",
            Self::Root => "Root Center",
        }
    }

    pub fn is_motor(&self) -> bool {
        Self::MOTORS.contains(self)
    }

    /// Number of gates the domain assigns to this center. Sums to 64.
    pub fn expected_gate_count(&self) -> usize {
        match self {
            Self::Head => 3,
            Self::Ajna => 6,
            Self::Throat => 11,
            Self::G => 8,
            Self::Heart => 4,
            Self::Sacral => 9,
            Self::Spleen => 7,
            Self::SolarPlexus => 7,
            Self::Root => 9,
        }
    }

    /// Canonical ordering of a center pair: ids compared as strings.
    pub fn sorted_pair(a: Center, b: Center) -> [Center; 2] {
        if a.id() <= b.id() {
            [a, b]
        } else {
            [b, a]
        }
    }
}

impl fmt::Display for Center {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Center {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.id() == s)
            .ok_or_else(|| format!("unknown center '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_counts_sum_to_64() {
        let total: usize = Center::ALL.iter().map(Center::expected_gate_count).sum();
        assert_eq!(total, 64);
    }

    #[test]
    fn test_id_round_trip() {
        for c in Center::ALL {
            assert_eq!(c.id().parse::<Center>(), Ok(c));
        }
        assert!("spleen_center".parse::<Center>().is_err());
    }

    #[test]
    fn test_sorted_pair_uses_id_order() {
        assert_eq!(
            Center::sorted_pair(Center::Throat, Center::Heart),
            [Center::Heart, Center::Throat]
        );
        assert_eq!(
            Center::sorted_pair(Center::SolarPlexus, Center::Root),
            [Center::Root, Center::SolarPlexus]
        );
    }
}
