use async_trait::async_trait;
use serde::Serialize;
use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplingConfig {
    pub temperature: f64,
    pub top_k: u32,
    pub top_p: f64,
    pub max_output_tokens: u32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            temperature: 0.9,
            top_k: 1,
            top_p: 1.0,
            max_output_tokens: 2048,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmCategory {
    HarmCategoryHarassment,
    HarmCategoryHateSpeech,
    HarmCategorySexuallyExplicit,
    HarmCategoryDangerousContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmBlockThreshold {
    BlockLowAndAbove,
    BlockMediumAndAbove,
    BlockOnlyHigh,
    BlockNone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SafetySetting {
    pub category: HarmCategory,
    pub threshold: HarmBlockThreshold,
}

/// Sampling parameters and safety thresholds sent with every prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub sampling: SamplingConfig,
    pub safety: Vec<SafetySetting>,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        let safety = [
            HarmCategory::HarmCategoryHarassment,
            HarmCategory::HarmCategoryHateSpeech,
            HarmCategory::HarmCategorySexuallyExplicit,
            HarmCategory::HarmCategoryDangerousContent,
        ]
        .into_iter()
        .map(|category| SafetySetting {
            category,
            threshold: HarmBlockThreshold::BlockMediumAndAbove,
        })
        .collect();

        Self {
            sampling: SamplingConfig::default(),
            safety,
        }
    }
}

/// Anything that can turn a prompt into reply text.
///
/// Implementations own transport details; callers only see prompt text in and
/// reply text out.
#[async_trait]
pub trait ModelBackend: Send + Sync {
    async fn submit(
        &self,
        prompt: &str,
        settings: &GenerationSettings,
    ) -> Result<String, GenerationError>;
}

#[derive(Debug)]
pub enum GenerationError {
    /// The request never produced an HTTP response.
    Transport(reqwest::Error),
    /// The model API answered with a non-success status.
    Api { status: u16, message: String },
    /// The prompt or reply was withheld by the safety filters.
    Blocked { reason: String },
    /// The response carried no usable text.
    EmptyReply,
    /// The response body could not be decoded.
    Decode(serde_json::Error),
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::Transport(err) => write!(f, "Model request failed: {err}"),
            GenerationError::Api { status, message } => {
                write!(f, "Model API error ({status}): {message}")
            }
            GenerationError::Blocked { reason } => {
                write!(f, "Reply was blocked by safety settings ({reason})")
            }
            GenerationError::EmptyReply => write!(f, "Model returned an empty reply"),
            GenerationError::Decode(err) => write!(f, "Could not decode model response: {err}"),
        }
    }
}

impl Error for GenerationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            GenerationError::Transport(err) => Some(err),
            GenerationError::Decode(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        GenerationError::Transport(err)
    }
}

impl From<serde_json::Error> for GenerationError {
    fn from(err: serde_json::Error) -> Self {
        GenerationError::Decode(err)
    }
}
