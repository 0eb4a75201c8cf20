use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use payout_engine::workflows::extraction::{CannedExtractor, UploadedImage};
use payout_engine::workflows::payout::PayoutEngine;
use payout_engine::workflows::pipeline::{calculate_records, PipelineError, RateCardService};
use serde_json::json;
use std::sync::Arc;

const MODEL_REPLY: &str = r#"Here are the extracted rows:
```json
[
  {"segment": "TW SAOD + COMP", "policy_type": "Comp", "location": "Delhi NCR", "payin": 30, "remark": "Tata"},
  {"segment": "TW TP", "policy_type": "TP", "location": "Delhi NCR", "payin": "26%", "remark": "other make"},
  {"segment": "PVT CAR TP", "policy_type": "TP", "location": "Mumbai", "payin": 48, "remark": "Zuno – 21"},
  {"segment": "SCHOOL BUS", "policy_type": "Comp", "location": "Rajasthan and Bengaluru", "payin": 70},
  "page 2 continues",
  {"segment": "Ambulance", "policy_type": "Comp", "location": "Kerala", "payin": "-12.5%"}
]
```"#;

fn service(reply: &str) -> RateCardService<CannedExtractor> {
    RateCardService::new(
        Arc::new(CannedExtractor::with_reply(reply)),
        Arc::new(PayoutEngine::default()),
    )
}

fn upload() -> UploadedImage {
    UploadedImage::new("digit-rates.jpg", Some("image/jpeg".to_string()), vec![0xFF, 0xD8, 0xFF])
}

#[tokio::test]
async fn processes_a_full_rate_card() {
    let outcome = service(MODEL_REPLY)
        .process(upload(), "Digit")
        .await
        .expect("rate card processes");

    let payouts: Vec<_> = outcome
        .calculated_data
        .iter()
        .map(|row| row.calculated_payout.as_str())
        .collect();
    assert_eq!(
        payouts,
        vec!["27.00%", "23.00%", "21.00%", "61.60%", "Error", "12.50%"]
    );

    let formulas: Vec<_> = outcome
        .calculated_data
        .iter()
        .map(|row| row.formula_used.as_str())
        .collect();
    assert_eq!(
        formulas,
        vec![
            "90% of Payin",
            "-3%",
            "Zuno - 21 (from remark)",
            "88% of Payin",
            "Error",
            "No matching rule"
        ]
    );

    assert_eq!(outcome.metrics.total_records, 6);
    assert_eq!(outcome.metrics.unique_segments, 6);
    assert_eq!(outcome.metrics.formula_summary.get("Error"), Some(&1));
    assert_eq!(outcome.metrics.avg_payin, 37.3);
    assert_eq!(outcome.parsed_data.len(), 6);
    assert_eq!(outcome.parsed_data[4], json!("page 2 continues"));

    let xlsx = STANDARD.decode(&outcome.excel_data).expect("valid base64");
    assert!(xlsx.starts_with(b"PK"));
    assert_eq!(outcome.csv_data.lines().count(), 7);

    let rows: serde_json::Value = serde_json::from_str(&outcome.json_data).expect("json rows");
    assert_eq!(rows[5]["Rule Explanation"], "No rule for LOB=UNKNOWN, Segment=AMBULANCE, Payin=Below 20%");
}

#[tokio::test]
async fn empty_upload_is_rejected() {
    let empty = UploadedImage::new("digit.png", Some("image/png".to_string()), Vec::new());
    let error = service(MODEL_REPLY)
        .process(empty, "Digit")
        .await
        .expect_err("empty upload rejected");
    assert_eq!(error.to_string(), "Empty file");
}

#[tokio::test]
async fn model_failure_surfaces_as_no_text_extracted() {
    let service = RateCardService::new(
        Arc::new(CannedExtractor::failing("503 upstream")),
        Arc::new(PayoutEngine::default()),
    );
    let error = service
        .process(upload(), "Digit")
        .await
        .expect_err("nothing extracted");
    assert!(matches!(error, PipelineError::NoTextExtracted));
}

#[test]
fn offline_records_share_the_calculation_path() {
    let records = vec![json!({ "segment": "TAXI", "payin": 35 })];
    let outcome = calculate_records(
        &PayoutEngine::default(),
        "[]".to_string(),
        records,
        "Digit",
    )
    .expect("records calculate");
    assert_eq!(outcome.calculated_data[0].calculated_payout, "31.00%");

    let error = calculate_records(&PayoutEngine::default(), String::new(), Vec::new(), "Digit")
        .expect_err("no records");
    assert!(error.is_client_error());
}
