//! Listing extractor: `<g>-<g> <name>` header lines, description on the next line.

use hdkb_core::types::FxHashSet;
use once_cell::sync::Lazy;
use regex::Regex;

use super::types::{ChannelExtraction, ChannelRecord};
use crate::reference::ChannelKey;

static HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([0-9]+)-([0-9]+)\s+(.+)$").unwrap());
static HEADER_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+-[0-9]+\s+").unwrap());

/// Extract channels from a listing text.
///
/// Lines are trimmed before matching. The line after a header is its
/// description unless it is itself a header. First occurrence of a key wins.
pub fn extract_listing(text: &str) -> ChannelExtraction {
    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    let mut out = ChannelExtraction::default();
    out.stats.lines_scanned = lines.len();
    let mut seen = FxHashSet::default();

    for (i, line) in lines.iter().enumerate() {
        let Some(caps) = HEADER.captures(line) else {
            continue;
        };
        out.stats.headers_matched += 1;

        let key = match (caps[1].parse::<u32>(), caps[2].parse::<u32>()) {
            (Ok(a), Ok(b)) => ChannelKey::from_numbers(a, b),
            _ => None,
        };
        let Some(key) = key else {
            tracing::debug!(line = i + 1, header = *line, "skipping invalid channel header");
            out.stats.invalid_skipped += 1;
            continue;
        };
        if !seen.insert(key) {
            out.stats.duplicates_skipped += 1;
            continue;
        }

        let mut record = ChannelRecord::new(key, caps[3].trim());
        if let Some(next) = lines.get(i + 1) {
            if !HEADER_PREFIX.is_match(next) {
                record.description = next.to_string();
            }
        }
        out.records.push(record);
    }

    tracing::debug!(
        headers = out.stats.headers_matched,
        unique = out.records.len(),
        "listing channels extracted"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_and_description() {
        let text = "  1-8 灵感的通道\n  创意的角色模型\n2-14 脉动的通道\n";
        let out = extract_listing(text);
        assert_eq!(out.records.len(), 2);
        assert_eq!(out.records[0].key, "1-8");
        assert_eq!(out.records[0].chinese_name, "灵感的通道");
        assert_eq!(out.records[0].description, "创意的角色模型");
        // Next line is a header, so no description.
        assert_eq!(out.records[1].description, "");
    }

    #[test]
    fn test_key_is_normalized_and_first_wins() {
        let text = "8-1 第一\n描述一\n1-8 第二\n描述二\n";
        let out = extract_listing(text);
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].key, "1-8");
        assert_eq!(out.records[0].chinese_name, "第一");
        assert_eq!(out.stats.duplicates_skipped, 1);
    }

    #[test]
    fn test_out_of_range_and_self_pairs_are_skipped() {
        let out = extract_listing("0-5 零\n65-1 越界\n7-7 自环\n");
        assert!(out.records.is_empty());
        assert_eq!(out.stats.headers_matched, 3);
        assert_eq!(out.stats.invalid_skipped, 3);
    }

    #[test]
    fn test_last_line_header_has_empty_description() {
        let out = extract_listing("20-34 魅力的通道");
        assert_eq!(out.records[0].description, "");
        assert_eq!(out.stats.lines_scanned, 1);
    }

    #[test]
    fn test_prose_lines_are_ignored() {
        let out = extract_listing("第六章 通道\n这里介绍 36 条通道。\n");
        assert!(out.records.is_empty());
        assert_eq!(out.stats.headers_matched, 0);
    }
}
