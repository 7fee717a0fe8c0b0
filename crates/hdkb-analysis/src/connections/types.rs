//! Center-connection types.

use std::collections::BTreeMap;

use hdkb_core::types::{Center, Gate};
use serde::Serialize;

/// A channel as listed under a connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectedChannel {
    pub channel_key: String,
    pub gates: [Gate; 2],
    pub chinese_name: String,
    pub english_name: String,
    pub description: String,
}

/// All channels joining one unordered pair of centers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CenterConnection {
    /// Sorted by center id.
    pub centers: [Center; 2],
    pub chinese: String,
    pub english: String,
    pub channels: Vec<ConnectedChannel>,
}

impl CenterConnection {
    /// Key form: the two center ids joined with `-`.
    pub fn key_for(a: Center, b: Center) -> String {
        let [x, y] = Center::sorted_pair(a, b);
        format!("{}-{}", x.id(), y.id())
    }

    pub fn key(&self) -> String {
        Self::key_for(self.centers[0], self.centers[1])
    }

    pub fn includes(&self, center: Center) -> bool {
        self.centers.contains(&center)
    }
}

/// Flattened channel row carrying both centers and its connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelWithCenters {
    pub channel_key: String,
    pub gates: [Gate; 2],
    pub chinese_name: String,
    pub english_name: String,
    pub description: String,
    pub center1: Center,
    pub center1_chinese: &'static str,
    pub center1_english: &'static str,
    pub center2: Center,
    pub center2_chinese: &'static str,
    pub center2_english: &'static str,
    pub connection_key: String,
    pub connection_chinese: String,
    pub connection_english: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CenterConnectionIndex {
    pub connections: BTreeMap<String, CenterConnection>,
    pub channels_with_centers: Vec<ChannelWithCenters>,
}

impl CenterConnectionIndex {
    pub fn channel_count(&self) -> usize {
        self.channels_with_centers.len()
    }

    pub fn get(&self, a: Center, b: Center) -> Option<&CenterConnection> {
        self.connections.get(&CenterConnection::key_for(a, b))
    }

    /// Connections pairing the throat with a motor center, in key order.
    pub fn motor_to_throat(&self) -> Vec<&CenterConnection> {
        self.connections
            .values()
            .filter(|c| c.includes(Center::Throat) && c.centers.iter().any(Center::is_motor))
            .collect()
    }

    /// Summary: connections by channel count, then the motor-to-throat links.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str("中心连接关系分析\n");
        out.push_str(&format!("{}\n", "=".repeat(60)));
        out.push_str(&format!(
            "共有 {} 种中心连接组合, {} 条通道\n\n",
            self.connections.len(),
            self.channel_count()
        ));

        let mut ranked: Vec<&CenterConnection> = self.connections.values().collect();
        ranked.sort_by(|a, b| b.channels.len().cmp(&a.channels.len()));
        for conn in ranked {
            out.push_str(&format!("{}: {}条通道\n", conn.chinese, conn.channels.len()));
            for ch in &conn.channels {
                out.push_str(&format!("  - {}: {}\n", ch.channel_key, ch.chinese_name));
            }
        }

        out.push_str("\n动力中心到喉咙中心的连接:\n");
        for conn in self.motor_to_throat() {
            let keys: Vec<&str> = conn.channels.iter().map(|c| c.channel_key.as_str()).collect();
            out.push_str(&format!("  {} ({})\n", conn.chinese, keys.join(", ")));
        }
        out
    }
}
