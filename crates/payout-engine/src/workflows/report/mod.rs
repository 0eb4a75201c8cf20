mod export;
mod metrics;
mod table;

pub use metrics::ReportMetrics;
pub use table::{ReportRow, ReportTable, COLUMNS};

use crate::workflows::payout::PayoutBatch;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush CSV buffer: {0}")]
    Flush(String),
    #[error("CSV output was not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("failed to build spreadsheet: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    #[error("failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Every rendering of one batch that the caller gets back.
#[derive(Debug, Clone)]
pub struct PayoutReport {
    pub table: ReportTable,
    pub metrics: ReportMetrics,
    pub csv: String,
    pub json: String,
    pub xlsx: Vec<u8>,
}

impl PayoutReport {
    pub fn render(company_name: &str, batch: &PayoutBatch) -> Result<Self, ReportError> {
        let table = ReportTable::new(company_name, batch);
        let metrics = ReportMetrics::from_batch(company_name, batch);
        let csv = export::to_csv(&table)?;
        let json = export::to_json(&table)?;
        let xlsx = export::to_xlsx(&table)?;

        Ok(Self {
            table,
            metrics,
            csv,
            json,
            xlsx,
        })
    }

    pub fn xlsx_base64(&self) -> String {
        STANDARD.encode(&self.xlsx)
    }
}
