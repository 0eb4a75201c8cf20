use super::record::{
    CalculatedRecord, ClassifiedRecord, FailedRecord, RawRecord, RecordOutcome,
};
use super::rules::{RemarkBucket, Rule, RuleTable};
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::sync::OnceLock;
use tracing::{debug, error, warn};

pub const OVERRIDE_PAYOUT: f64 = 21.0;
pub const OVERRIDE_LABEL: &str = "Zuno - 21 (from remark)";
pub const NO_MATCH_LABEL: &str = "No matching rule";

fn override_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)zuno\s*[-\x{2013}\x{2014}]\s*21").expect("override pattern compiles")
    })
}

pub fn has_override(remark: &str) -> bool {
    override_pattern().is_match(remark)
}

/// Applies the rule table to classified records.
#[derive(Debug, Clone, Default)]
pub struct PayoutEngine {
    table: RuleTable,
}

impl PayoutEngine {
    pub fn new(table: RuleTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    /// Two passes over the candidates, both in table order: a specific remark
    /// bucket first, then the `NIL` wildcard.
    pub fn match_rule(&self, record: &ClassifiedRecord) -> Option<&Rule> {
        let lob = record.line_of_business();
        let upper_segment = record.raw.segment.to_uppercase();
        let category = record.payin_category.label();

        let candidates = self.table.candidates(lob, &upper_segment);
        candidates
            .iter()
            .copied()
            .find(|rule| rule.remark.matches(category, &record.raw.remark))
            .or_else(|| {
                candidates
                    .iter()
                    .copied()
                    .find(|rule| rule.remark == RemarkBucket::Nil)
            })
    }

    pub fn calculate(&self, record: ClassifiedRecord) -> CalculatedRecord {
        if has_override(&record.raw.remark) {
            debug!(segment = %record.raw.segment, "remark override applied");
            return CalculatedRecord {
                classified: record,
                payout_value: OVERRIDE_PAYOUT,
                matched_formula: OVERRIDE_LABEL.to_string(),
                explanation: "Remark contains 'Zuno - 21' -> Fixed payout of 21%".to_string(),
            };
        }

        let lob = record.line_of_business();
        match self.match_rule(&record) {
            Some(rule) => {
                let payout_value = round2(rule.formula.apply(record.payin_value));
                let explanation = format!(
                    "LOB={}, Segment={}, Rule={}",
                    lob,
                    rule.segment,
                    rule.remark.label()
                );
                CalculatedRecord {
                    classified: record,
                    payout_value,
                    matched_formula: rule.formula.label(),
                    explanation,
                }
            }
            None => {
                let explanation = format!(
                    "No rule for LOB={}, Segment={}, Payin={}",
                    lob,
                    record.raw.segment.to_uppercase(),
                    record.payin_category.label()
                );
                warn!(%lob, segment = %record.raw.segment, "no matching payout rule");
                CalculatedRecord {
                    payout_value: record.payin_value,
                    classified: record,
                    matched_formula: NO_MATCH_LABEL.to_string(),
                    explanation,
                }
            }
        }
    }

    /// Processes every entry independently; malformed entries become failed rows.
    pub fn calculate_batch(&self, entries: &[Value]) -> PayoutBatch {
        let outcomes = entries
            .iter()
            .map(|entry| match RawRecord::from_value(entry) {
                Ok(raw) => RecordOutcome::Calculated(self.calculate(raw.classify())),
                Err(err) => {
                    error!(error = %err, record = %entry, "failed to process record");
                    RecordOutcome::Failed(FailedRecord::from_value(entry, &err))
                }
            })
            .collect();

        PayoutBatch { outcomes }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Ordered outcomes, one per input entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PayoutBatch {
    pub outcomes: Vec<RecordOutcome>,
}

impl PayoutBatch {
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn calculated(&self) -> impl Iterator<Item = &CalculatedRecord> {
        self.outcomes.iter().filter_map(RecordOutcome::as_calculated)
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.is_failed()).count()
    }
}
