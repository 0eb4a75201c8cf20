use crate::workflows::extraction::{self, UploadError, UploadedImage, VisionExtractor};
use crate::workflows::payout::{classify, PayoutBatch, PayoutEngine, RuleView};
use crate::workflows::report::{PayoutReport, ReportError, ReportMetrics, ReportRow};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error("No text extracted from image")]
    NoTextExtracted,
    #[error(transparent)]
    Report(#[from] ReportError),
}

impl PipelineError {
    /// Caller-side problems, as opposed to failures of the service itself.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Upload(_) | Self::NoTextExtracted)
    }
}

/// Response payload for one processed rate card.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingOutcome {
    pub extracted_text: String,
    pub parsed_data: Vec<Value>,
    pub calculated_data: Vec<ReportRow>,
    pub excel_data: String,
    pub csv_data: String,
    pub json_data: String,
    pub formula_data: Vec<RuleView>,
    pub metrics: ReportMetrics,
    pub generated_at: DateTime<Utc>,
}

/// Upload validation, extraction, rule application and rendering in one place.
pub struct RateCardService<E: ?Sized> {
    extractor: Arc<E>,
    engine: Arc<PayoutEngine>,
}

impl<E> RateCardService<E>
where
    E: VisionExtractor + ?Sized,
{
    pub fn new(extractor: Arc<E>, engine: Arc<PayoutEngine>) -> Self {
        Self { extractor, engine }
    }

    pub fn engine(&self) -> &PayoutEngine {
        &self.engine
    }

    pub async fn process(
        &self,
        upload: UploadedImage,
        company_name: &str,
    ) -> Result<ProcessingOutcome, PipelineError> {
        info!(
            filename = %upload.filename,
            company = company_name,
            bytes = upload.bytes.len(),
            "processing rate card"
        );
        upload.validate()?;

        let reply = extraction::extract_records(self.extractor.as_ref(), &upload).await;
        if reply.is_empty() {
            warn!(filename = %upload.filename, "no records extracted");
            return Err(PipelineError::NoTextExtracted);
        }

        self.calculate(reply.json, reply.records, company_name)
    }

    /// Rule application and rendering for records that are already extracted.
    pub fn calculate(
        &self,
        extracted_text: String,
        records: Vec<Value>,
        company_name: &str,
    ) -> Result<ProcessingOutcome, PipelineError> {
        calculate_records(&self.engine, extracted_text, records, company_name)
    }
}

/// A calculated batch together with its renderings.
#[derive(Debug, Clone)]
pub struct RateCardReport {
    pub batch: PayoutBatch,
    pub report: PayoutReport,
}

/// Rule application and rendering, shared by the HTTP pipeline and offline
/// runs that start from JSON records.
pub fn calculate_report(
    engine: &PayoutEngine,
    records: &[Value],
    company_name: &str,
) -> Result<RateCardReport, PipelineError> {
    if records.is_empty() {
        return Err(PipelineError::NoTextExtracted);
    }

    let batch = engine.calculate_batch(records);
    let report = PayoutReport::render(company_name, &batch)?;
    info!(
        company = company_name,
        records = batch.len(),
        failed = batch.failed_count(),
        "payouts calculated"
    );

    Ok(RateCardReport { batch, report })
}

/// Builds the response payload for records that are already extracted.
pub fn calculate_records(
    engine: &PayoutEngine,
    extracted_text: String,
    records: Vec<Value>,
    company_name: &str,
) -> Result<ProcessingOutcome, PipelineError> {
    let RateCardReport { report, .. } = calculate_report(engine, &records, company_name)?;

    Ok(ProcessingOutcome {
        extracted_text,
        parsed_data: records.into_iter().map(annotate_payin).collect(),
        excel_data: report.xlsx_base64(),
        csv_data: report.csv,
        json_data: report.json,
        calculated_data: report.table.rows,
        formula_data: engine.table().views(),
        metrics: report.metrics,
        generated_at: Utc::now(),
    })
}

/// Echoes the extracted entry with its classified pay-in attached.
fn annotate_payin(mut entry: Value) -> Value {
    if let Value::Object(object) = &mut entry {
        let classified = classify(object.get("payin").unwrap_or(&Value::Null));
        object.insert("Payin_Value".to_string(), Value::from(classified.value));
        object.insert(
            "Payin_Category".to_string(),
            Value::from(classified.category.label()),
        );
    }
    entry
}
