//! Line-anchored extraction of incarnation crosses.

use hdkb_core::config::CrossDedupKey;
use hdkb_core::types::{FxHashSet, Gate};
use once_cell::sync::Lazy;
use regex::Regex;

use super::types::{CrossExtraction, CrossGates, CrossRecord, CrossType};

/// Header line, blank lines, then `<english>——<g>/<g>/<g>/<g>`.
static CROSS_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^[ \t]*((?:右角度|左角度|并列)交叉之[^\n]*?)[ \t\r]*\n\s*([^\n]+?)——([0-9]+)/([0-9]+)/([0-9]+)/([0-9]+)",
    )
    .unwrap()
});

static HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*(?:右角度|左角度|并列)交叉之").unwrap());

static TRAILING_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*[0-9]+\s*$").unwrap());

/// Strip trailing whitespace and a trailing variant number.
pub fn clean_name(raw: &str) -> String {
    TRAILING_NUMBER.replace(raw.trim_end(), "").trim().to_string()
}

/// Extract every cross block from `text`, deduplicating by `dedup_key`.
///
/// Prose between blocks is skipped; headers that never reach a gates line
/// show up in [`CrossStats::skipped_headers`](super::CrossStats::skipped_headers).
pub fn extract_crosses(text: &str, dedup_key: CrossDedupKey) -> CrossExtraction {
    let mut out = CrossExtraction::default();
    out.stats.dedup_key = dedup_key;
    out.stats.headers_seen = HEADER.find_iter(text).count();

    let mut typed_seen: FxHashSet<(CrossType, [Gate; 4])> = FxHashSet::default();
    let mut gates_seen: FxHashSet<[Gate; 4]> = FxHashSet::default();

    for caps in CROSS_BLOCK.captures_iter(text) {
        out.stats.matched += 1;

        let header = &caps[1];
        let Some(cross_type) = CrossType::from_header(header) else {
            continue;
        };

        let parsed: Option<Vec<Gate>> = (3..=6).map(|i| Gate::parse(&caps[i])).collect();
        let Some(&[black_sun, black_earth, red_sun, red_earth]) = parsed.as_deref() else {
            tracing::debug!(header, "rejecting cross with out-of-range gate");
            out.stats.rejected_gates += 1;
            continue;
        };
        let gates = CrossGates {
            black_sun,
            black_earth,
            red_sun,
            red_earth,
        };
        let tuple = gates.as_array();

        let new_typed = typed_seen.insert((cross_type, tuple));
        let new_gates = gates_seen.insert(tuple);
        let keep = match dedup_key {
            CrossDedupKey::Typed => new_typed,
            CrossDedupKey::Gates => new_gates,
        };
        if !keep {
            out.stats.duplicates_dropped += 1;
            continue;
        }

        out.records.push(CrossRecord {
            chinese_name: clean_name(header),
            english_name: clean_name(&caps[2]),
            cross_type,
            key: gates.key(),
            gates,
        });
    }

    out.stats.unique_typed = typed_seen.len();
    out.stats.unique_gates = gates_seen.len();

    tracing::info!(
        headers = out.stats.headers_seen,
        matched = out.stats.matched,
        records = out.records.len(),
        unique_typed = out.stats.unique_typed,
        unique_gates = out.stats.unique_gates,
        dedup_key = dedup_key.name(),
        "crosses extracted"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate(n: u32) -> Gate {
        Gate::new(n).unwrap()
    }

    #[test]
    fn test_juxtaposition_example() {
        let text = "并列交叉之创意的自我表达 4\nCREATIVESELF-EXPRESSION 4——1/2/4/49";
        let out = extract_crosses(text, CrossDedupKey::Typed);
        assert_eq!(out.records.len(), 1);
        let rec = &out.records[0];
        assert_eq!(rec.cross_type, CrossType::Juxtaposition);
        assert_eq!(rec.chinese_name, "并列交叉之创意的自我表达");
        assert_eq!(rec.english_name, "CREATIVESELF-EXPRESSION");
        assert_eq!(rec.gates.black_sun, gate(1));
        assert_eq!(rec.gates.black_earth, gate(2));
        assert_eq!(rec.gates.red_sun, gate(4));
        assert_eq!(rec.gates.red_earth, gate(49));
        assert_eq!(rec.key, "1-2-4-49");

        let json = serde_json::to_value(rec).unwrap();
        assert_eq!(json["type"], "juxtaposition");
        assert_eq!(json["gates"]["red_earth"], 49);
    }

    #[test]
    fn test_blank_lines_between_header_and_gates() {
        let text = "右角度交叉之斯芬克斯 1\n\n   \nTHE SPHINX 1——13/7/1/2\n";
        let out = extract_crosses(text, CrossDedupKey::Typed);
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].chinese_name, "右角度交叉之斯芬克斯");
        assert_eq!(out.records[0].english_name, "THE SPHINX");
    }

    #[test]
    fn test_prose_is_skipped_and_counted() {
        let text = "\
左角度交叉之面具 1\n\
这里是一段说明文字，没有闸门。\n\
左角度交叉之面具 2\n\
MASKS 2——13/7/43/23\n\
随便一段话——不是交叉\n";
        let out = extract_crosses(text, CrossDedupKey::Typed);
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.stats.headers_seen, 2);
        assert_eq!(out.stats.skipped_headers(), 1);
    }

    #[test]
    fn test_out_of_range_gate_is_rejected() {
        let text = "并列交叉之测试\nTEST——1/2/65/4\n";
        let out = extract_crosses(text, CrossDedupKey::Typed);
        assert!(out.records.is_empty());
        assert_eq!(out.stats.rejected_gates, 1);
    }

    #[test]
    fn test_mid_line_marker_is_not_a_header() {
        let text = "参见右角度交叉之斯芬克斯\nTHE SPHINX——13/7/1/2\n";
        let out = extract_crosses(text, CrossDedupKey::Typed);
        assert!(out.records.is_empty());
        assert_eq!(out.stats.headers_seen, 0);
    }

    #[test]
    fn test_both_dedup_counts_are_reported() {
        // Same gates under two types: distinct when typed, one when gates-only.
        let text = "\
右角度交叉之甲 1\nA 1——1/2/3/4\n\
左角度交叉之乙 1\nB 1——1/2/3/4\n\
右角度交叉之甲 1\nA 1——1/2/3/4\n";

        let typed = extract_crosses(text, CrossDedupKey::Typed);
        assert_eq!(typed.records.len(), 2);
        assert_eq!(typed.stats.duplicates_dropped, 1);

        let plain = extract_crosses(text, CrossDedupKey::Gates);
        assert_eq!(plain.records.len(), 1);
        assert_eq!(plain.stats.duplicates_dropped, 2);

        for stats in [typed.stats, plain.stats] {
            assert_eq!(stats.unique_typed, 2);
            assert_eq!(stats.unique_gates, 1);
        }
    }

    #[test]
    fn test_clean_name() {
        assert_eq!(clean_name("右角度交叉之人面狮身 3  "), "右角度交叉之人面狮身");
        assert_eq!(clean_name("THE SPHINX"), "THE SPHINX");
        assert_eq!(clean_name("GATE 10 OF 2"), "GATE 10 OF");
    }

    #[test]
    fn test_crlf_input() {
        let text = "并列交叉之创意 4\r\nCREATIVITY 4——1/2/4/49\r\n";
        let out = extract_crosses(text, CrossDedupKey::Typed);
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].chinese_name, "并列交叉之创意");
    }
}
