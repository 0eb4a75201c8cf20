mod canned;
mod openai;
mod prompt;
mod response;
mod upload;

pub use canned::CannedExtractor;
pub use openai::OpenAiVisionClient;
pub use prompt::EXTRACTION_PROMPT;
pub use response::{parse_reply, ParsedReply};
pub use upload::{UploadError, UploadedImage};

use async_trait::async_trait;
use tracing::{error, info};

/// What the vision model is asked to read.
#[derive(Debug, Clone, Copy)]
pub struct VisionRequest<'a> {
    pub prompt: &'a str,
    pub image: &'a UploadedImage,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractionError {
    #[error("vision client setup failed: {0}")]
    Setup(String),
    #[error("vision request failed: {0}")]
    Transport(String),
    #[error("vision service returned {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("vision response could not be decoded: {0}")]
    Decode(String),
}

/// Seam to the hosted vision-language model.
#[async_trait]
pub trait VisionExtractor: Send + Sync {
    fn name(&self) -> &str;

    /// Returns the model's raw text reply.
    async fn complete(&self, request: &VisionRequest<'_>) -> Result<String, ExtractionError>;
}

/// Runs the extractor and parses its reply. Failures are logged and reported
/// as an empty reply so callers treat them as "nothing extracted".
pub async fn extract_records<E>(extractor: &E, image: &UploadedImage) -> ParsedReply
where
    E: VisionExtractor + ?Sized,
{
    let request = VisionRequest {
        prompt: EXTRACTION_PROMPT,
        image,
    };

    match extractor.complete(&request).await {
        Ok(raw) => {
            let parsed = parse_reply(&raw);
            info!(
                extractor = extractor.name(),
                records = parsed.records.len(),
                "rate card extracted"
            );
            parsed
        }
        Err(err) => {
            error!(extractor = extractor.name(), error = %err, "extraction failed");
            ParsedReply::default()
        }
    }
}
