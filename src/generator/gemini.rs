use async_trait::async_trait;
use tracing::debug;

use super::backend::{GenerationError, GenerationSettings, ModelBackend};
use crate::api::{summarize_error_body, Content, GenerateContentRequest, GenerateContentResponse};
use crate::utils::url::construct_api_url;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// [`ModelBackend`] speaking the Gemini `generateContent` REST API.
#[derive(Clone)]
pub struct GeminiBackend {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiBackend {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        construct_api_url(
            &self.base_url,
            &format!("v1beta/models/{}:generateContent", self.model),
        )
    }
}

#[async_trait]
impl ModelBackend for GeminiBackend {
    async fn submit(
        &self,
        prompt: &str,
        settings: &GenerationSettings,
    ) -> Result<String, GenerationError> {
        let request = GenerateContentRequest {
            contents: vec![Content::user_text(prompt)],
            generation_config: &settings.sampling,
            safety_settings: &settings.safety,
        };

        debug!(model = %self.model, prompt_chars = prompt.len(), "submitting prompt");
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message: summarize_error_body(&body),
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)?;
        extract_reply_text(parsed)
    }
}

fn extract_reply_text(response: GenerateContentResponse) -> Result<String, GenerationError> {
    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|feedback| feedback.block_reason.clone())
    {
        return Err(GenerationError::Blocked { reason });
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or(GenerationError::EmptyReply)?;

    let finish_reason = candidate.finish_reason.unwrap_or_default();
    match candidate.content.as_ref().and_then(Content::joined_text) {
        Some(text) => Ok(text),
        None if BLOCKING_FINISH_REASONS.contains(&finish_reason.as_str()) => {
            Err(GenerationError::Blocked {
                reason: finish_reason,
            })
        }
        None => Err(GenerationError::EmptyReply),
    }
}

const BLOCKING_FINISH_REASONS: &[&str] = &["SAFETY", "RECITATION", "BLOCKLIST", "PROHIBITED_CONTENT"];
