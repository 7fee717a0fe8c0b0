//! Left-biased merge of two channel sources over the canonical list.

use super::types::{ChannelExtraction, ChannelSource, MergedChannel};
use crate::reference::ChannelKey;

/// Merge two extractions into exactly one row per canonical channel.
///
/// The primary supplies names when present; an empty primary name is
/// filled from the secondary. The description comes from the secondary
/// whenever it has one. Channels neither source has become placeholders.
/// Non-canonical extracted channels are dropped.
pub fn merge(
    primary: &ChannelExtraction,
    secondary: &ChannelExtraction,
    canonical: &[ChannelKey],
) -> Vec<MergedChannel> {
    let primary_by_key = primary.by_key();
    let secondary_by_key = secondary.by_key();

    canonical
        .iter()
        .map(|key| {
            let key_str = key.to_string();
            let p = primary_by_key.get(key_str.as_str()).copied();
            let s = secondary_by_key.get(key_str.as_str()).copied();

            match (p, s) {
                (Some(p), s) => {
                    let pick = |first: &str, second: &str| -> String {
                        if first.is_empty() {
                            second.to_string()
                        } else {
                            first.to_string()
                        }
                    };
                    MergedChannel {
                        gates: key.gates(),
                        chinese_name: pick(&p.chinese_name, s.map_or("", |s| s.chinese_name.as_str())),
                        english_name: pick(&p.english_name, s.map_or("", |s| s.english_name.as_str())),
                        description: pick(s.map_or("", |s| s.description.as_str()), &p.description),
                        key: key_str,
                        source: if s.is_some() {
                            ChannelSource::Combined
                        } else {
                            ChannelSource::Primary
                        },
                    }
                }
                (None, Some(s)) => MergedChannel {
                    gates: key.gates(),
                    chinese_name: s.chinese_name.clone(),
                    english_name: s.english_name.clone(),
                    description: s.description.clone(),
                    key: key_str,
                    source: ChannelSource::Secondary,
                },
                (None, None) => {
                    tracing::warn!(channel = %key, "canonical channel missing from both sources");
                    MergedChannel::placeholder(*key)
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::types::{ChannelRecord, MergeSummary};
    use hdkb_core::constants::MISSING_CHANNEL_NAME;

    fn key(a: u32, b: u32) -> ChannelKey {
        ChannelKey::from_numbers(a, b).unwrap()
    }

    fn extraction(records: Vec<ChannelRecord>) -> ChannelExtraction {
        ChannelExtraction {
            records,
            ..Default::default()
        }
    }

    #[test]
    fn test_primary_wins_and_secondary_fills_gaps() {
        let mut p = ChannelRecord::new(key(1, 8), "灵感的通道");
        p.english_name = "The Channel of Inspiration".to_string();
        let mut s = ChannelRecord::new(key(1, 8), "启发");
        s.description = "创意的角色模型".to_string();

        let merged = merge(&extraction(vec![p]), &extraction(vec![s]), &[key(1, 8)]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].chinese_name, "灵感的通道");
        assert_eq!(merged[0].english_name, "The Channel of Inspiration");
        assert_eq!(merged[0].description, "创意的角色模型");
        assert_eq!(merged[0].source, ChannelSource::Combined);
    }

    #[test]
    fn test_description_prefers_secondary() {
        let mut p = ChannelRecord::new(key(1, 8), "灵感的通道");
        p.description = "书中的描述".to_string();
        let mut s = ChannelRecord::new(key(1, 8), "启发");
        s.description = "创意的角色模型".to_string();
        let merged = merge(&extraction(vec![p.clone()]), &extraction(vec![s]), &[key(1, 8)]);
        assert_eq!(merged[0].chinese_name, "灵感的通道");
        assert_eq!(merged[0].description, "创意的角色模型");

        // Without a secondary description the primary's is kept.
        let bare = ChannelRecord::new(key(1, 8), "启发");
        let merged = merge(&extraction(vec![p]), &extraction(vec![bare]), &[key(1, 8)]);
        assert_eq!(merged[0].description, "书中的描述");
    }

    #[test]
    fn test_every_canonical_key_exactly_once() {
        let canonical = [key(1, 8), key(2, 14), key(3, 60)];
        let p = extraction(vec![
            ChannelRecord::new(key(2, 14), "脉动"),
            ChannelRecord::new(key(5, 6), "非标准"),
        ]);
        let s = extraction(vec![ChannelRecord::new(key(1, 8), "灵感")]);
        let merged = merge(&p, &s, &canonical);

        let keys: Vec<&str> = merged.iter().map(|m| m.key.as_str()).collect();
        assert_eq!(keys, vec!["1-8", "2-14", "3-60"]);
        assert_eq!(merged[0].source, ChannelSource::Secondary);
        assert_eq!(merged[1].source, ChannelSource::Primary);
        assert_eq!(merged[2].source, ChannelSource::Missing);
        assert_eq!(merged[2].chinese_name, MISSING_CHANNEL_NAME);

        let summary = MergeSummary::from_channels(&merged);
        assert_eq!(summary.primary_only, 1);
        assert_eq!(summary.secondary_only, 1);
        assert_eq!(summary.missing, vec!["3-60".to_string()]);
        assert!(!summary.is_complete());
    }

    #[test]
    fn test_source_serializes_snake_case() {
        let merged = merge(&extraction(vec![]), &extraction(vec![]), &[key(1, 8)]);
        let json = serde_json::to_value(&merged[0]).unwrap();
        assert_eq!(json["source"], "missing");
        assert_eq!(json["gates"], serde_json::json!([1, 8]));
    }
}
