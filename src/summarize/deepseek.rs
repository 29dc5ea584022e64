use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use super::prompt::build_summary_prompt;
use crate::config::Config;

const MODEL: &str = "deepseek-chat";
const MAX_TOKENS: u32 = 2000;
const TEMPERATURE: f32 = 0.7;
const TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("DEEPSEEK_API_KEY not configured")]
    MissingCredential,

    #[error("summarization API returned {status}: {body}")]
    Api { status: StatusCode, body: String },

    #[error("summarization request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("summarization response contained no choices")]
    EmptyResponse,
}

/// Summary producer boundary, so the pipeline can run against a scripted
/// implementation in tests.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(
        &self,
        transcript_text: &str,
        additional_context: &str,
    ) -> Result<String, SummarizeError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// DeepSeek chat-completions client with a fixed prompt template.
pub struct DeepSeekSummarizer {
    api_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl DeepSeekSummarizer {
    pub fn new(
        api_key: impl Into<String>,
        api_url: impl Into<String>,
    ) -> Result<Self, SummarizeError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            api_url: api_url.into(),
            api_key: api_key.into(),
            client,
        })
    }

    /// Construct from configuration; the credential check happens here so it
    /// can run before any transcription work begins.
    pub fn from_config(config: &Config) -> Result<Self, SummarizeError> {
        let api_key = config
            .deepseek_api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(SummarizeError::MissingCredential)?;

        Self::new(api_key, config.deepseek_api_url.clone())
    }
}

#[async_trait]
impl Summarizer for DeepSeekSummarizer {
    async fn summarize(
        &self,
        transcript_text: &str,
        additional_context: &str,
    ) -> Result<String, SummarizeError> {
        let prompt = build_summary_prompt(transcript_text, additional_context);

        let request = ChatRequest {
            model: MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        info!("Requesting session summary from {}", self.api_url);

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizeError::Api { status, body });
        }

        let parsed: ChatResponse = response.json().await?;
        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or(SummarizeError::EmptyResponse)?;

        Ok(choice.message.content)
    }
}
