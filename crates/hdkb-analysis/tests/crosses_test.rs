//! Integration tests for cross extraction and reconciliation.

use hdkb_analysis::crosses::{extract_crosses, CrossType};
use hdkb_core::config::CrossDedupKey;
use proptest::prelude::*;

/// Gate `n` shifted by `offset`, wrapped into 1..=64.
fn wrap(n: usize, offset: usize) -> usize {
    (n - 1 + offset) % 64 + 1
}

/// A complete book: 16 right-angle names × 4, 32 left-angle × 2,
/// 64 juxtapositions, every gate tuple unique.
fn full_book() -> String {
    let mut text = String::from("人类图轮回交叉全书\n\n");
    let mut push = |header: String, english: String, first: usize, step: usize| {
        text.push_str(&format!(
            "{header}\n\n{english}——{}/{}/{}/{}\n说明文字。\n\n",
            first,
            wrap(first, step),
            wrap(first, step + 20),
            wrap(first, step + 40)
        ));
    };

    for i in 0..64 {
        let (name, variant) = (i / 4 + 1, i % 4 + 1);
        push(
            format!("右角度交叉之第{name}号 {variant}"),
            format!("Right Angle Cross of R{name} {variant}"),
            i + 1,
            10,
        );
    }
    for i in 0..64 {
        let (name, variant) = (i / 2 + 1, i % 2 + 1);
        push(
            format!("左角度交叉之第{name}号 {variant}"),
            format!("Left Angle Cross of L{name} {variant}"),
            i + 1,
            5,
        );
    }
    for gate in 1..=64 {
        push(
            format!("并列交叉之第{gate}号"),
            format!("Juxtaposition Cross of J{gate}"),
            gate,
            1,
        );
    }
    text
}

#[test]
fn test_full_book_reconciles_cleanly() {
    let extraction = extract_crosses(&full_book(), CrossDedupKey::Typed);
    assert_eq!(extraction.records.len(), 192);
    assert_eq!(extraction.stats.headers_seen, 192);
    assert_eq!(extraction.stats.skipped_headers(), 0);
    assert_eq!(extraction.stats.unique_typed, 192);
    assert_eq!(extraction.stats.unique_gates, 192);

    let report = extraction.reconcile();
    assert!(report.is_clean(), "{}", report.render_text());
    assert!(report.discrepancies.is_empty());
    assert!(report.key_collisions.is_empty());
    assert!(report.juxtaposition.is_complete());

    let counts: Vec<(CrossType, usize, usize)> = report
        .by_type
        .iter()
        .map(|t| (t.cross_type, t.names(), t.records))
        .collect();
    assert_eq!(
        counts,
        vec![
            (CrossType::RightAngle, 16, 64),
            (CrossType::LeftAngle, 32, 64),
            (CrossType::Juxtaposition, 64, 64),
        ]
    );
}

#[test]
fn test_variant_numbers_collapse_into_one_name() {
    let extraction = extract_crosses(&full_book(), CrossDedupKey::Typed);
    let first = &extraction.records[0];
    assert_eq!(first.chinese_name, "右角度交叉之第1号");
    assert_eq!(first.english_name, "Right Angle Cross of R1");
    assert_eq!(first.key, "1-11-31-51");
}

#[test]
fn test_missing_block_is_a_discrepancy_not_an_error() {
    let book = full_book();
    // Drop the last juxtaposition block.
    let cut = book.rfind("并列交叉之第64号").unwrap();
    let extraction = extract_crosses(&book[..cut], CrossDedupKey::Typed);
    assert_eq!(extraction.records.len(), 191);

    let report = extraction.reconcile();
    assert!(!report.is_clean());
    assert_eq!(report.juxtaposition.missing.len(), 1);
    assert_eq!(report.juxtaposition.missing[0].number(), 64);
    assert!(report.render_text().contains("191"));
}

#[test]
fn test_repeated_book_is_deduplicated() {
    let book = full_book();
    let twice = format!("{book}{book}");
    let extraction = extract_crosses(&twice, CrossDedupKey::Gates);
    assert_eq!(extraction.records.len(), 192);
    assert_eq!(extraction.stats.duplicates_dropped, 192);
    assert!(extraction.reconcile().is_clean());
}

proptest! {
    #[test]
    fn extraction_is_idempotent(
        blocks in prop::collection::vec((0usize..3, 1u32..80, 1u32..80, 1u32..80, 1u32..80, 0usize..4), 0..40)
    ) {
        let mut text = String::new();
        for (kind, a, b, c, d, noise) in blocks {
            let marker = ["右角度", "左角度", "并列"][kind];
            text.push_str(&format!("{marker}交叉之名{a}\n"));
            if noise == 0 {
                text.push_str("一段没有闸门的叙述\n");
                continue;
            }
            text.push_str(&format!("English {b}——{a}/{b}/{c}/{d}\n\n"));
        }

        let first = extract_crosses(&text, CrossDedupKey::Typed);
        let second = extract_crosses(&text, CrossDedupKey::Typed);
        prop_assert_eq!(&first.records, &second.records);
        prop_assert_eq!(first.stats, second.stats);
        prop_assert!(first.stats.unique_gates <= first.stats.unique_typed);
        prop_assert!(first.records.iter().all(|r| r.gates.as_array().iter().all(|g| (1..=64).contains(&g.number()))));
    }
}
