//! Response Generator: persona-conditioned prompting and mood inference.
//!
//! [`ResponseGenerator::generate`] turns the conversation so far into a single
//! prompt, hands it to a [`ModelBackend`], and tags the reply text with a
//! [`Mood`] inferred from its wording.

pub mod backend;
pub mod gemini;
pub mod mood;
pub mod personality;
pub mod prompt;
pub mod service;

use std::sync::Arc;

use crate::core::companion::{CompanionId, Mood};
use backend::{GenerationError, GenerationSettings, ModelBackend};
use prompt::{build_prompt, PromptTurn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedReply {
    pub text: String,
    pub mood: Mood,
}

#[derive(Clone)]
pub struct ResponseGenerator {
    backend: Arc<dyn ModelBackend>,
    settings: GenerationSettings,
}

impl ResponseGenerator {
    pub fn new(backend: Arc<dyn ModelBackend>) -> Self {
        Self::with_settings(backend, GenerationSettings::default())
    }

    pub fn with_settings(backend: Arc<dyn ModelBackend>, settings: GenerationSettings) -> Self {
        Self { backend, settings }
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    pub async fn generate(
        &self,
        history: &[PromptTurn],
        companion: CompanionId,
        companion_name: &str,
    ) -> Result<GeneratedReply, GenerationError> {
        let prompt = build_prompt(history, companion, companion_name);
        let text = self.backend.submit(&prompt, &self.settings).await?;
        let mood = mood::infer_mood(&text);
        Ok(GeneratedReply { text, mood })
    }
}
