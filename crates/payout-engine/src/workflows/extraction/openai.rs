use super::{ExtractionError, VisionExtractor, VisionRequest};
use crate::config::{ConfigError, ExtractionConfig};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

/// Chat-completions client for OpenAI-compatible vision endpoints.
#[derive(Debug, Clone)]
pub struct OpenAiVisionClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
}

impl OpenAiVisionClient {
    pub fn from_config(config: &ExtractionConfig) -> Result<Self, ExtractionError> {
        let api_key = config
            .require_api_key()
            .map_err(|err: ConfigError| ExtractionError::Setup(err.to_string()))?
            .to_string();

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| ExtractionError::Setup(err.to_string()))?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: Vec<ContentPart<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl VisionExtractor for OpenAiVisionClient {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: &VisionRequest<'_>) -> Result<String, ExtractionError> {
        let start = Instant::now();
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: vec![
                    ContentPart::Text {
                        text: request.prompt,
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: request.image.data_url(),
                        },
                    },
                ],
            }],
            temperature: 0.0,
            max_tokens: self.max_tokens,
        };

        debug!(model = %self.model, filename = %request.image.filename, "sending rate card to vision model");

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| ExtractionError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(ExtractionError::Rejected {
                status: status.as_u16(),
                body: error_body,
            });
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|err| ExtractionError::Decode(err.to_string()))?;

        debug!(
            latency_ms = start.elapsed().as_millis() as u64,
            "vision model replied"
        );

        Ok(chat
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default())
    }
}
