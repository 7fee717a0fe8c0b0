//! Chapter extractor: the channel chapter of the book text.
//!
//! Each entry is a `<g>-<g>` line, then a line holding the Chinese name
//! followed by an English title starting with `The Channel`, then the
//! English line. The book carries no Chinese description; those come from
//! the listing at merge time.

use hdkb_core::types::FxHashSet;
use once_cell::sync::Lazy;
use regex::Regex;

use super::types::{ChannelExtraction, ChannelRecord};
use crate::reference::ChannelKey;

/// Heading that opens the channel chapter.
pub const CHAPTER_START: &str = "第六章";
/// Heading of the chapter after it.
pub const CHAPTER_END: &str = "第七章";

static ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([0-9]+)-([0-9]+)\s*\n([^\n]+?)\s+The Channel[^\n]*\n([^\n]+)").unwrap()
});

/// The text between the first `第六章` and the next `第七章` (or end of text).
pub fn chapter_section(text: &str) -> Option<&str> {
    let start = text.find(CHAPTER_START)?;
    let rest = &text[start..];
    let end = rest[CHAPTER_START.len()..]
        .find(CHAPTER_END)
        .map(|i| i + CHAPTER_START.len())
        .unwrap_or(rest.len());
    Some(&rest[..end])
}

/// Extract channels from the book text. Without a chapter heading nothing is found.
pub fn extract_chapter(text: &str) -> ChannelExtraction {
    let mut out = ChannelExtraction::default();
    let Some(section) = chapter_section(text) else {
        tracing::warn!("no '{CHAPTER_START}' heading found; chapter extraction is empty");
        return out;
    };
    let section = section.replace("\r\n", "\n");
    out.stats.lines_scanned = section.lines().count();
    let mut seen = FxHashSet::default();

    for caps in ENTRY.captures_iter(&section) {
        out.stats.headers_matched += 1;
        let key = match (caps[1].parse::<u32>(), caps[2].parse::<u32>()) {
            (Ok(a), Ok(b)) => ChannelKey::from_numbers(a, b),
            _ => None,
        };
        let Some(key) = key else {
            out.stats.invalid_skipped += 1;
            continue;
        };
        if !seen.insert(key) {
            out.stats.duplicates_skipped += 1;
            continue;
        }
        let mut record = ChannelRecord::new(key, caps[3].trim());
        record.english_name = caps[4].trim().to_string();
        out.records.push(record);
    }

    tracing::debug!(
        entries = out.stats.headers_matched,
        unique = out.records.len(),
        "chapter channels extracted"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOOK: &str = "前言 第六章会讲通道\n\
第五章 闸门\n\
1-8 不算\n\
第六章 通道\n\
1-8\n\
灵感的通道 The Channel of Inspiration\n\
A Design of a Creative Role Model\n\
\n\
2-14\n\
脉动的通道 The Channel of the Beat\n\
A Design of a Keeper of the Keys\n\
第七章 交叉\n\
3-60\n\
突变的通道 The Channel of Mutation\n\
能量的起伏\n";

    #[test]
    fn test_section_stops_at_next_chapter() {
        let section = chapter_section(BOOK).unwrap();
        assert!(section.starts_with("第六章会讲通道"));
        assert!(!section.contains("3-60"));
    }

    #[test]
    fn test_entries_inside_section() {
        let out = extract_chapter(BOOK);
        let keys: Vec<&str> = out.records.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["1-8", "2-14"]);
        let first = &out.records[0];
        assert_eq!(first.chinese_name, "灵感的通道");
        assert_eq!(first.english_name, "A Design of a Creative Role Model");
        assert!(first.description.is_empty());
    }

    #[test]
    fn test_no_heading_yields_nothing() {
        let out = extract_chapter("1-8\n灵感的通道 The Channel of Inspiration\n描述\n");
        assert!(out.records.is_empty());
        assert_eq!(out.stats.lines_scanned, 0);
    }

    #[test]
    fn test_crlf_text() {
        let text = "第六章\r\n10-20\r\n觉醒的通道 The Channel of Awakening\r\nA Design of Commitment\r\n";
        let out = extract_chapter(text);
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].english_name, "A Design of Commitment");
    }
}
