//! Integration tests for channel extraction, merge and the connection index.

use hdkb_analysis::channels::{extract_chapter, extract_listing, merge, ChannelSource, MergeSummary};
use hdkb_analysis::connections::build;
use hdkb_analysis::reference::GateReference;
use hdkb_core::types::Center;
use proptest::prelude::*;

fn reference() -> GateReference {
    GateReference::builtin().unwrap()
}

fn listing_text(reference: &GateReference, skip: usize) -> String {
    let mut text = String::from("36条通道\n\n");
    for (i, key) in reference.canonical_channels().iter().enumerate().skip(skip) {
        // Written high-low to exercise key normalization.
        text.push_str(&format!("{}-{} 通道{i}\n  描述{i}\n", key.high(), key.low()));
    }
    text
}

fn chapter_text(reference: &GateReference, take: usize) -> String {
    let mut text = String::from("前言\n第五章 闸门\n第六章 通道\n");
    for (i, key) in reference.canonical_channels().iter().take(take).enumerate() {
        text.push_str(&format!(
            "{key}\n书中名{i} The Channel of Book{i}\nA Design of Book{i}\n\n"
        ));
    }
    text.push_str("第七章 轮回交叉\n99-1\n不应出现 The Channel of Nothing\n…\n");
    text
}

#[test]
fn test_two_full_sources_merge_completely() {
    let reference = reference();
    let listing = extract_listing(&listing_text(&reference, 0));
    let chapter = extract_chapter(&chapter_text(&reference, 36));
    assert_eq!(listing.records.len(), 36);
    assert_eq!(chapter.records.len(), 36);
    assert!(listing.missing_canonical(&reference).is_empty());

    let merged = merge(&chapter, &listing, reference.canonical_channels());
    assert_eq!(merged.len(), 36);
    assert!(merged.iter().all(|m| m.source == ChannelSource::Combined));
    assert_eq!(merged[0].chinese_name, "书中名0");
    assert_eq!(merged[0].english_name, "A Design of Book0");
    assert_eq!(merged[0].description, "描述0");
    assert!(MergeSummary::from_channels(&merged).is_complete());
}

#[test]
fn test_listing_description_survives_merge() {
    let chapter = extract_chapter(
        "第六章\n1-8\n灵感的通道 The Channel of Inspiration\nA Design of a Creative Role Model\n",
    );
    let listing = extract_listing("1-8 灵感的通道\n创意的角色模型\n");
    let merged = merge(&chapter, &listing, reference().canonical_channels());

    let row = merged.iter().find(|m| m.key == "1-8").unwrap();
    assert_eq!(row.source, ChannelSource::Combined);
    assert_eq!(row.chinese_name, "灵感的通道");
    assert_eq!(row.english_name, "A Design of a Creative Role Model");
    assert_eq!(row.description, "创意的角色模型");

    let index = build(&merged, &reference());
    let row = index
        .channels_with_centers
        .iter()
        .find(|c| c.channel_key == "1-8")
        .unwrap();
    assert_eq!(row.description, "创意的角色模型");
}

#[test]
fn test_partial_sources_fill_each_other() {
    let reference = reference();
    // Chapter covers the first 10, listing everything from index 5 on.
    let chapter = extract_chapter(&chapter_text(&reference, 10));
    let listing = extract_listing(&listing_text(&reference, 5));
    let merged = merge(&chapter, &listing, reference.canonical_channels());

    let summary = MergeSummary::from_channels(&merged);
    assert_eq!(summary.primary_only, 5);
    assert_eq!(summary.combined, 5);
    assert_eq!(summary.secondary_only, 26);
    assert!(summary.is_complete());
    assert_eq!(merged[20].chinese_name, "通道20");
    assert_eq!(merged[20].description, "描述20");
}

#[test]
fn test_merged_channels_connect_all_centers() {
    let reference = reference();
    let listing = extract_listing(&listing_text(&reference, 0));
    let merged = merge(&Default::default(), &listing, reference.canonical_channels());
    let index = build(&merged, &reference);

    assert_eq!(index.channel_count(), 36);
    assert_eq!(index.connections.len(), 17);
    let total: usize = index.connections.values().map(|c| c.channels.len()).sum();
    assert_eq!(total, 36);
    assert!(index.get(Center::Root, Center::Throat).is_none());
    let g_throat = index.get(Center::Throat, Center::G).unwrap();
    assert_eq!(g_throat.channels.len(), 4);
}

proptest! {
    #[test]
    fn listing_extraction_is_idempotent(
        lines in prop::collection::vec(
            prop_oneof![
                (0u32..70, 0u32..70, "[甲乙丙丁戊]{1,4}").prop_map(|(a, b, n)| format!("{a}-{b} {n}")),
                "[子丑寅卯 ]{0,6}",
            ],
            0..60,
        )
    ) {
        let text = lines.join("\n");
        let first = extract_listing(&text);
        let again = extract_listing(&text);
        prop_assert_eq!(&first.records, &again.records);

        // Rendering the extracted set and extracting it again gives the same set.
        let mut rendered = String::new();
        for r in &first.records {
            rendered.push_str(&format!("{} {}\n", r.key, r.chinese_name));
            if !r.description.is_empty() {
                rendered.push_str(&format!("{}\n", r.description));
            }
        }
        let second = extract_listing(&rendered);
        prop_assert_eq!(&first.records, &second.records);
    }
}
