use crate::workflows::payout::PayoutBatch;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportMetrics {
    pub total_records: usize,
    pub avg_payin: f64,
    pub unique_segments: usize,
    pub company_name: String,
    pub formula_summary: BTreeMap<String, usize>,
}

impl ReportMetrics {
    pub fn from_batch(company_name: &str, batch: &PayoutBatch) -> Self {
        let payins: Vec<f64> = batch
            .calculated()
            .map(|record| record.classified.payin_value)
            .collect();
        let avg_payin = if payins.is_empty() {
            0.0
        } else {
            let mean = payins.iter().sum::<f64>() / payins.len() as f64;
            (mean * 10.0).round() / 10.0
        };

        let unique_segments = batch
            .outcomes
            .iter()
            .map(|outcome| outcome.segment())
            .collect::<HashSet<_>>()
            .len();

        let mut formula_summary = BTreeMap::new();
        for outcome in &batch.outcomes {
            *formula_summary
                .entry(outcome.formula_label().to_string())
                .or_insert(0) += 1;
        }

        Self {
            total_records: batch.len(),
            avg_payin,
            unique_segments,
            company_name: company_name.to_string(),
            formula_summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::payout::PayoutEngine;
    use serde_json::json;

    #[test]
    fn summarizes_batch() {
        let batch = PayoutEngine::default().calculate_batch(&[
            json!({ "segment": "TAXI", "payin": 25 }),
            json!({ "segment": "TAXI", "payin": "18%" }),
            json!({ "segment": "SCHOOL BUS", "payin": 62.5 }),
            json!(null),
        ]);
        let metrics = ReportMetrics::from_batch("Digit", &batch);

        assert_eq!(metrics.total_records, 4);
        assert_eq!(metrics.avg_payin, 35.2);
        assert_eq!(metrics.unique_segments, 3);
        assert_eq!(metrics.formula_summary.get("-2%"), Some(&1));
        assert_eq!(metrics.formula_summary.get("-3%"), Some(&1));
        assert_eq!(metrics.formula_summary.get("88% of Payin"), Some(&1));
        assert_eq!(metrics.formula_summary.get("Error"), Some(&1));
    }

    #[test]
    fn empty_batch_has_zero_average() {
        let metrics = ReportMetrics::from_batch("Digit", &PayoutBatch::default());
        assert_eq!(metrics.total_records, 0);
        assert_eq!(metrics.avg_payin, 0.0);
        assert!(metrics.formula_summary.is_empty());
    }
}
