//! Projects channels onto the centers of their gates.

use hdkb_core::types::Center;

use super::types::{CenterConnection, CenterConnectionIndex, ChannelWithCenters, ConnectedChannel};
use crate::channels::ChannelLike;
use crate::reference::GateReference;

fn pair_labels(pair: [Center; 2]) -> (String, String) {
    (
        format!("{}-{}", pair[0].chinese(), pair[1].chinese()),
        format!("{}-{}", pair[0].english(), pair[1].english()),
    )
}

/// Group channels by the sorted pair of centers their gates belong to.
///
/// Every gate maps to a center by construction of the reference, so this
/// never misses. The flattened view keeps the channel's own gate order for
/// `center1`/`center2`; connection labels use the sorted pair.
pub fn build<C: ChannelLike>(channels: &[C], reference: &GateReference) -> CenterConnectionIndex {
    let mut index = CenterConnectionIndex::default();

    for channel in channels {
        let [g1, g2] = channel.gates();
        let c1 = reference.center(g1);
        let c2 = reference.center(g2);
        let pair = Center::sorted_pair(c1, c2);
        let key = CenterConnection::key_for(c1, c2);
        let (chinese, english) = pair_labels(pair);

        index.channels_with_centers.push(ChannelWithCenters {
            channel_key: channel.key().to_string(),
            gates: [g1, g2],
            chinese_name: channel.chinese_name().to_string(),
            english_name: channel.english_name().to_string(),
            description: channel.description().to_string(),
            center1: c1,
            center1_chinese: c1.chinese(),
            center1_english: c1.english(),
            center2: c2,
            center2_chinese: c2.chinese(),
            center2_english: c2.english(),
            connection_key: key.clone(),
            connection_chinese: chinese.clone(),
            connection_english: english.clone(),
        });

        index
            .connections
            .entry(key)
            .or_insert_with(|| CenterConnection {
                centers: pair,
                chinese,
                english,
                channels: Vec::new(),
            })
            .channels
            .push(ConnectedChannel {
                channel_key: channel.key().to_string(),
                gates: [g1, g2],
                chinese_name: channel.chinese_name().to_string(),
                english_name: channel.english_name().to_string(),
                description: channel.description().to_string(),
            });
    }

    tracing::debug!(
        connections = index.connections.len(),
        channels = index.channel_count(),
        "center connections built"
    );
    index
}
