use super::{ExtractionError, VisionExtractor, VisionRequest};
use async_trait::async_trait;

/// Replays a fixed model reply. Used for offline runs and tests.
#[derive(Debug, Clone)]
pub struct CannedExtractor {
    reply: Result<String, String>,
}

impl CannedExtractor {
    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self {
            reply: Ok(reply.into()),
        }
    }

    /// Every call fails with a transport error carrying `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: Err(message.into()),
        }
    }
}

#[async_trait]
impl VisionExtractor for CannedExtractor {
    fn name(&self) -> &str {
        "canned"
    }

    async fn complete(&self, _request: &VisionRequest<'_>) -> Result<String, ExtractionError> {
        self.reply
            .clone()
            .map_err(ExtractionError::Transport)
    }
}
