//! Reconciliation of extracted crosses against the domain totals.
//!
//! Every finding here is advisory: nothing fails, everything is reported.

use std::collections::BTreeMap;

use hdkb_core::constants::CROSS_TOTAL;
use hdkb_core::types::Gate;
use serde::Serialize;

use super::types::{CrossExtraction, CrossRecord, CrossStats, CrossType};

/// All records sharing one Chinese name within a type.
#[derive(Debug, Clone, Serialize)]
pub struct NameGroup {
    pub name: String,
    pub expected: usize,
    /// `(key, english_name)` per record, in discovery order.
    pub variants: Vec<(String, String)>,
}

impl NameGroup {
    pub fn count(&self) -> usize {
        self.variants.len()
    }

    pub fn is_ok(&self) -> bool {
        self.count() == self.expected
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TypeSummary {
    pub cross_type: CrossType,
    pub expected_names: usize,
    pub expected_records: usize,
    pub records: usize,
    /// Sorted by name.
    pub groups: Vec<NameGroup>,
}

impl TypeSummary {
    pub fn names(&self) -> usize {
        self.groups.len()
    }
}

/// A name whose variant count differs from the expectation for its type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Discrepancy {
    pub cross_type: CrossType,
    pub name: String,
    pub expected: usize,
    pub actual: usize,
}

/// A gate tuple listed by more than one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyCollision {
    pub key: String,
    /// `(type, chinese_name)` per record.
    pub entries: Vec<(CrossType, String)>,
}

/// Each gate should be the black-sun gate of exactly one juxtaposition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JuxtapositionCoverage {
    pub missing: Vec<Gate>,
    /// `(gate, times)` for gates that appear more than once.
    pub repeated: Vec<(Gate, usize)>,
}

impl JuxtapositionCoverage {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty() && self.repeated.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconciliationReport {
    pub total: usize,
    pub expected_total: usize,
    pub by_type: Vec<TypeSummary>,
    pub discrepancies: Vec<Discrepancy>,
    pub key_collisions: Vec<KeyCollision>,
    pub juxtaposition: JuxtapositionCoverage,
    /// Present when the report was built from an extraction.
    pub stats: Option<CrossStats>,
}

impl ReconciliationReport {
    /// Totals, name counts and juxtaposition coverage all match.
    pub fn is_clean(&self) -> bool {
        self.total == self.expected_total
            && self.discrepancies.is_empty()
            && self.by_type.iter().all(|t| t.names() == t.expected_names)
            && self.juxtaposition.is_complete()
    }
}

/// Group, count and cross-check a set of records.
pub fn reconcile(records: &[CrossRecord]) -> ReconciliationReport {
    let mut by_type = Vec::with_capacity(CrossType::ALL.len());
    let mut discrepancies = Vec::new();

    for cross_type in CrossType::ALL {
        let expected = cross_type.variants_per_name();
        let mut groups: BTreeMap<&str, NameGroup> = BTreeMap::new();
        let mut count = 0;
        for rec in records.iter().filter(|r| r.cross_type == cross_type) {
            count += 1;
            groups
                .entry(rec.chinese_name.as_str())
                .or_insert_with(|| NameGroup {
                    name: rec.chinese_name.clone(),
                    expected,
                    variants: Vec::new(),
                })
                .variants
                .push((rec.key.clone(), rec.english_name.clone()));
        }

        let groups: Vec<NameGroup> = groups.into_values().collect();
        for group in groups.iter().filter(|g| !g.is_ok()) {
            discrepancies.push(Discrepancy {
                cross_type,
                name: group.name.clone(),
                expected,
                actual: group.count(),
            });
        }
        by_type.push(TypeSummary {
            cross_type,
            expected_names: cross_type.expected_names(),
            expected_records: cross_type.expected_records(),
            records: count,
            groups,
        });
    }

    if !discrepancies.is_empty() {
        tracing::warn!(count = discrepancies.len(), "cross name counts differ from expectation");
    }

    ReconciliationReport {
        total: records.len(),
        expected_total: CROSS_TOTAL,
        by_type,
        discrepancies,
        key_collisions: key_collisions(records),
        juxtaposition: juxtaposition_coverage(records),
        stats: None,
    }
}

/// Gate tuples shared by more than one record, ordered by key.
pub fn key_collisions(records: &[CrossRecord]) -> Vec<KeyCollision> {
    let mut by_key: BTreeMap<&str, Vec<(CrossType, String)>> = BTreeMap::new();
    for rec in records {
        by_key
            .entry(rec.key.as_str())
            .or_default()
            .push((rec.cross_type, rec.chinese_name.clone()));
    }
    by_key
        .into_iter()
        .filter(|(_, entries)| entries.len() > 1)
        .map(|(key, entries)| KeyCollision {
            key: key.to_string(),
            entries,
        })
        .collect()
}

pub fn juxtaposition_coverage(records: &[CrossRecord]) -> JuxtapositionCoverage {
    let mut counts = [0usize; 64];
    for rec in records
        .iter()
        .filter(|r| r.cross_type == CrossType::Juxtaposition)
    {
        counts[rec.gates.black_sun.number() as usize - 1] += 1;
    }

    let mut coverage = JuxtapositionCoverage::default();
    for gate in Gate::all() {
        match counts[gate.number() as usize - 1] {
            0 => coverage.missing.push(gate),
            1 => {}
            n => coverage.repeated.push((gate, n)),
        }
    }
    coverage
}

impl CrossExtraction {
    /// Reconcile the records and attach the extraction counters.
    pub fn reconcile(&self) -> ReconciliationReport {
        let mut report = reconcile(&self.records);
        report.stats = Some(self.stats);
        report
    }
}

impl ReconciliationReport {
    /// Human-readable report, one block per type.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str("轮回交叉提取分析\n");
        out.push_str(&format!("{}\n", "=".repeat(60)));
        out.push_str(&format!(
            "总记录数: {} (期望 {})\n",
            self.total, self.expected_total
        ));

        if let Some(stats) = &self.stats {
            out.push_str(&format!(
                "标题行: {}  匹配: {}  未匹配: {}  闸门越界: {}\n",
                stats.headers_seen,
                stats.matched,
                stats.skipped_headers(),
                stats.rejected_gates
            ));
            out.push_str(&format!(
                "去重键: {}  丢弃重复: {}\n",
                stats.dedup_key.name(),
                stats.duplicates_dropped
            ));
            out.push_str(&format!(
                "按 类型+闸门 去重: {} 条  按 闸门 去重: {} 条\n",
                stats.unique_typed, stats.unique_gates
            ));
        }

        for summary in &self.by_type {
            out.push_str(&format!(
                "\n【{} {}】 名称 {}/{}  记录 {}/{}\n",
                summary.cross_type.marker(),
                summary.cross_type.label(),
                summary.names(),
                summary.expected_names,
                summary.records,
                summary.expected_records
            ));
            out.push_str(&format!("{}\n", "-".repeat(60)));
            for group in &summary.groups {
                let mark = if group.is_ok() { "✓" } else { "✗" };
                out.push_str(&format!(
                    "{mark} {} ({}/{})\n",
                    group.name,
                    group.count(),
                    group.expected
                ));
                for (key, english) in &group.variants {
                    out.push_str(&format!("    {key}  {english}\n"));
                }
            }
        }

        out.push('\n');
        if self.discrepancies.is_empty() {
            out.push_str("名称数量: 全部符合\n");
        } else {
            out.push_str(&format!("名称数量不符: {}\n", self.discrepancies.len()));
            for d in &self.discrepancies {
                out.push_str(&format!(
                    "  [{}] {}: {} (期望 {})\n",
                    d.cross_type, d.name, d.actual, d.expected
                ));
            }
        }

        if !self.key_collisions.is_empty() {
            out.push_str(&format!("重复闸门组合: {}\n", self.key_collisions.len()));
            for c in &self.key_collisions {
                let names: Vec<String> = c
                    .entries
                    .iter()
                    .map(|(t, n)| format!("{n} [{t}]"))
                    .collect();
                out.push_str(&format!("  {}: {}\n", c.key, names.join(", ")));
            }
        }

        let j = &self.juxtaposition;
        if j.is_complete() {
            out.push_str("并列交叉覆盖: 64 个闸门各一次\n");
        } else {
            if !j.missing.is_empty() {
                let gates: Vec<String> = j.missing.iter().map(Gate::to_string).collect();
                out.push_str(&format!("并列交叉缺少闸门: {}\n", gates.join(", ")));
            }
            for (gate, n) in &j.repeated {
                out.push_str(&format!("并列交叉重复闸门: {gate} ({n} 次)\n"));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crosses::types::CrossGates;

    fn record(cross_type: CrossType, name: &str, gates: [u32; 4]) -> CrossRecord {
        let g = |n: u32| Gate::new(n).unwrap();
        let gates = CrossGates {
            black_sun: g(gates[0]),
            black_earth: g(gates[1]),
            red_sun: g(gates[2]),
            red_earth: g(gates[3]),
        };
        CrossRecord {
            chinese_name: name.to_string(),
            english_name: name.to_uppercase(),
            cross_type,
            key: gates.key(),
            gates,
        }
    }

    #[test]
    fn test_short_group_is_a_discrepancy() {
        let records = vec![
            record(CrossType::RightAngle, "右角度交叉之甲", [1, 2, 3, 4]),
            record(CrossType::RightAngle, "右角度交叉之甲", [2, 1, 4, 3]),
        ];
        let report = reconcile(&records);
        assert_eq!(
            report.discrepancies,
            vec![Discrepancy {
                cross_type: CrossType::RightAngle,
                name: "右角度交叉之甲".to_string(),
                expected: 4,
                actual: 2,
            }]
        );
        assert!(!report.is_clean());
        assert!(report.render_text().contains("✗ 右角度交叉之甲 (2/4)"));
    }

    #[test]
    fn test_key_collisions_across_types() {
        let records = vec![
            record(CrossType::RightAngle, "甲", [1, 2, 3, 4]),
            record(CrossType::LeftAngle, "乙", [1, 2, 3, 4]),
            record(CrossType::LeftAngle, "乙", [5, 6, 7, 8]),
        ];
        let collisions = key_collisions(&records);
        assert_eq!(collisions.len(), 1);
        assert_eq!(collisions[0].key, "1-2-3-4");
        assert_eq!(collisions[0].entries.len(), 2);
    }

    #[test]
    fn test_juxtaposition_coverage() {
        let mut records: Vec<CrossRecord> = (1..=62)
            .map(|n| record(CrossType::Juxtaposition, &format!("并列{n}"), [n, 1, 2, 3]))
            .collect();
        records.push(record(CrossType::Juxtaposition, "并列重复", [5, 9, 9, 9]));
        let coverage = juxtaposition_coverage(&records);
        let missing: Vec<u8> = coverage.missing.iter().map(|g| g.number()).collect();
        assert_eq!(missing, vec![63, 64]);
        assert_eq!(coverage.repeated.len(), 1);
        assert_eq!(coverage.repeated[0].1, 2);
    }
}
