use crate::workflows::payout::{PayoutBatch, RecordOutcome};
use serde::Serialize;

pub const COLUMNS: [&str; 8] = [
    "segment",
    "policy type",
    "location",
    "payin",
    "remark",
    "Calculated Payout",
    "Formula Used",
    "Rule Explanation",
];

/// One output row, already rendered as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub segment: String,
    #[serde(rename = "policy type")]
    pub policy_type: String,
    pub location: String,
    pub payin: String,
    pub remark: String,
    #[serde(rename = "Calculated Payout")]
    pub calculated_payout: String,
    #[serde(rename = "Formula Used")]
    pub formula_used: String,
    #[serde(rename = "Rule Explanation")]
    pub rule_explanation: String,
}

impl ReportRow {
    pub fn from_outcome(outcome: &RecordOutcome) -> Self {
        match outcome {
            RecordOutcome::Calculated(record) => {
                let raw = &record.classified.raw;
                Self {
                    segment: raw.segment.clone(),
                    policy_type: raw.policy_type.clone(),
                    location: raw.location.clone(),
                    payin: percent(record.classified.payin_value),
                    remark: raw.remark.clone(),
                    calculated_payout: percent(record.payout_value),
                    formula_used: record.matched_formula.clone(),
                    rule_explanation: record.explanation.clone(),
                }
            }
            RecordOutcome::Failed(record) => Self {
                segment: record.segment.clone(),
                policy_type: record.policy_type.clone(),
                location: record.location.clone(),
                payin: record.payin.clone(),
                remark: record.remark.clone(),
                calculated_payout: "Error".to_string(),
                formula_used: "Error".to_string(),
                rule_explanation: format!("Error: {}", record.error),
            },
        }
    }

    /// Cells in `COLUMNS` order.
    pub fn cells(&self) -> [&str; 8] {
        [
            &self.segment,
            &self.policy_type,
            &self.location,
            &self.payin,
            &self.remark,
            &self.calculated_payout,
            &self.formula_used,
            &self.rule_explanation,
        ]
    }
}

fn percent(value: f64) -> String {
    format!("{value:.2}%")
}

/// Title plus rendered rows for one company's rate card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportTable {
    pub title: String,
    pub rows: Vec<ReportRow>,
}

impl ReportTable {
    pub fn new(company_name: &str, batch: &PayoutBatch) -> Self {
        Self {
            title: format!("{company_name} - Policy Data"),
            rows: batch.outcomes.iter().map(ReportRow::from_outcome).collect(),
        }
    }
}
