use std::fmt;

use async_openai::{
    config::AzureConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    pub max_output_tokens: u32,
    pub temperature: f32,
}

impl SamplingParams {
    pub const fn new(max_output_tokens: u32, temperature: f32) -> Self {
        Self {
            max_output_tokens,
            temperature,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCause {
    Transport,
    Authentication,
    RateLimited,
    Timeout,
    EmptyCompletion,
}

impl FailureCause {
    /// Whether another attempt could plausibly succeed.
    pub fn is_transient(self) -> bool {
        matches!(
            self,
            FailureCause::Transport | FailureCause::RateLimited | FailureCause::Timeout
        )
    }
}

impl fmt::Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureCause::Transport => write!(f, "transport"),
            FailureCause::Authentication => write!(f, "authentication"),
            FailureCause::RateLimited => write!(f, "rate_limited"),
            FailureCause::Timeout => write!(f, "timeout"),
            FailureCause::EmptyCompletion => write!(f, "empty_completion"),
        }
    }
}

/// Every way the external service can fail, collapsed into one outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("generation failed ({cause}): {detail}")]
pub struct GenerationFailed {
    pub cause: FailureCause,
    pub detail: String,
}

impl GenerationFailed {
    pub fn new(cause: FailureCause, detail: impl Into<String>) -> Self {
        Self {
            cause,
            detail: detail.into(),
        }
    }
}

impl From<OpenAIError> for GenerationFailed {
    fn from(err: OpenAIError) -> Self {
        match &err {
            OpenAIError::Reqwest(e) if e.is_timeout() => {
                GenerationFailed::new(FailureCause::Timeout, err.to_string())
            }
            OpenAIError::ApiError(api) => {
                let marker = format!(
                    "{} {}",
                    api.code.as_deref().unwrap_or_default(),
                    api.r#type.as_deref().unwrap_or_default()
                )
                .to_lowercase();

                let cause = if marker.contains("rate_limit") || marker.contains("429") {
                    FailureCause::RateLimited
                } else if marker.contains("invalid_api_key")
                    || marker.contains("401")
                    || marker.contains("authentication")
                    || marker.contains("permission")
                {
                    FailureCause::Authentication
                } else {
                    FailureCause::Transport
                };
                GenerationFailed::new(cause, api.message.clone())
            }
            _ => GenerationFailed::new(FailureCause::Transport, err.to_string()),
        }
    }
}

/// Boundary to the external text-generation service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(
        &self,
        messages: Vec<ChatMessage>,
        params: SamplingParams,
    ) -> Result<String, GenerationFailed>;
}

/// Chat completions against an Azure OpenAI deployment.
pub struct AzureGenerationClient {
    client: Client<AzureConfig>,
    deployment: String,
}

impl AzureGenerationClient {
    pub fn new(config: &Config) -> Self {
        let azure = AzureConfig::new()
            .with_api_base(config.openai_endpoint.trim_end_matches('/'))
            .with_api_version(config.openai_api_version.as_str())
            .with_deployment_id(config.openai_deployment.as_str())
            .with_api_key(config.openai_api_key.expose_secret());

        Self {
            client: Client::with_config(azure),
            deployment: config.openai_deployment.clone(),
        }
    }

    fn to_request_message(
        message: ChatMessage,
    ) -> Result<ChatCompletionRequestMessage, OpenAIError> {
        let built: ChatCompletionRequestMessage = match message.role {
            MessageRole::System => ChatCompletionRequestSystemMessageArgs::default()
                .content(message.content)
                .build()?
                .into(),
            MessageRole::User => ChatCompletionRequestUserMessageArgs::default()
                .content(message.content)
                .build()?
                .into(),
        };
        Ok(built)
    }
}

#[async_trait]
impl GenerationClient for AzureGenerationClient {
    async fn generate(
        &self,
        messages: Vec<ChatMessage>,
        params: SamplingParams,
    ) -> Result<String, GenerationFailed> {
        let messages = messages
            .into_iter()
            .map(Self::to_request_message)
            .collect::<Result<Vec<_>, _>>()?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(self.deployment.as_str())
            .messages(messages)
            .max_completion_tokens(params.max_output_tokens)
            .temperature(params.temperature)
            .build()?;

        let response = self.client.chat().create(request).await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| {
                GenerationFailed::new(FailureCause::EmptyCompletion, "completion had no text")
            })
    }
}
