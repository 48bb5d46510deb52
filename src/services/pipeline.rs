use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{
    config::Config,
    models::domain::ShapeViolation,
    services::{
        generation_client::{ChatMessage, FailureCause, GenerationClient, GenerationFailed, SamplingParams},
        response_extractor::ExtractionError,
    },
};

const DEFAULT_MAX_ATTEMPTS: u32 = 2;
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_BACKOFF_MILLIS: u64 = 250;

/// Where the content of a response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentSource {
    /// Produced by the generation service and validated.
    Generated,
    /// Curated content substituted for a failed generation.
    Fallback,
    /// Empty or partial result.
    Degraded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    ServiceFailure,
    Timeout,
    ExtractionFailure,
    ShapeViolation,
    PoolExhausted,
    CoverageBelowThreshold,
    EmptyInput,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::ServiceFailure => write!(f, "service_failure"),
            FallbackReason::Timeout => write!(f, "timeout"),
            FallbackReason::ExtractionFailure => write!(f, "extraction_failure"),
            FallbackReason::ShapeViolation => write!(f, "shape_violation"),
            FallbackReason::PoolExhausted => write!(f, "pool_exhausted"),
            FallbackReason::CoverageBelowThreshold => write!(f, "coverage_below_threshold"),
            FallbackReason::EmptyInput => write!(f, "empty_input"),
        }
    }
}

impl From<&GenerationFailed> for FallbackReason {
    fn from(failure: &GenerationFailed) -> Self {
        match failure.cause {
            FailureCause::Timeout => FallbackReason::Timeout,
            _ => FallbackReason::ServiceFailure,
        }
    }
}

impl From<&ExtractionError> for FallbackReason {
    fn from(_: &ExtractionError) -> Self {
        FallbackReason::ExtractionFailure
    }
}

impl From<&ShapeViolation> for FallbackReason {
    fn from(_: &ShapeViolation) -> Self {
        FallbackReason::ShapeViolation
    }
}

/// Diagnostics attached to every response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationStatus {
    pub source: ContentSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<FallbackReason>,
    pub attempts: u32,
}

impl GenerationStatus {
    pub fn generated(attempts: u32) -> Self {
        Self {
            source: ContentSource::Generated,
            reason: None,
            attempts,
        }
    }

    pub fn fallback(reason: FallbackReason, attempts: u32) -> Self {
        Self {
            source: ContentSource::Fallback,
            reason: Some(reason),
            attempts,
        }
    }

    pub fn degraded(reason: FallbackReason, attempts: u32) -> Self {
        Self {
            source: ContentSource::Degraded,
            reason: Some(reason),
            attempts,
        }
    }

    pub fn is_generated(&self) -> bool {
        self.source == ContentSource::Generated
    }
}

/// Result of a bounded call: the completion or the last failure, plus how
/// many attempts were made.
#[derive(Debug)]
pub struct CallOutcome {
    pub result: Result<String, GenerationFailed>,
    pub attempts: u32,
}

/// Per-attempt timeout and bounded retry for transient failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub timeout: Duration,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            backoff: Duration::from_millis(DEFAULT_BACKOFF_MILLIS),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self::default()
            .with_max_attempts(config.generation_max_attempts)
            .with_timeout(config.generation_timeout())
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Calls the client, retrying only transient causes. A call still running
    /// at the timeout is dropped, which cancels the request.
    pub async fn call(
        &self,
        client: &dyn GenerationClient,
        operation: &str,
        messages: Vec<ChatMessage>,
        params: SamplingParams,
    ) -> CallOutcome {
        let mut attempts = 0;

        loop {
            attempts += 1;

            let result = match tokio::time::timeout(
                self.timeout,
                client.generate(messages.clone(), params),
            )
            .await
            {
                Ok(result) => result,
                Err(_) => Err(GenerationFailed::new(
                    FailureCause::Timeout,
                    format!("no completion within {}ms", self.timeout.as_millis()),
                )),
            };

            match result {
                Ok(text) => {
                    log::debug!("{} completion (attempt {}): {}", operation, attempts, text);
                    return CallOutcome {
                        result: Ok(text),
                        attempts,
                    };
                }
                Err(failure) if failure.cause.is_transient() && attempts < self.max_attempts => {
                    log::warn!(
                        "{} attempt {}/{} failed ({}), retrying in {}ms",
                        operation,
                        attempts,
                        self.max_attempts,
                        failure.cause,
                        self.backoff.as_millis()
                    );
                    tokio::time::sleep(self.backoff).await;
                }
                Err(failure) => {
                    log::warn!(
                        "{} generation failed after {} attempt(s): {}",
                        operation,
                        attempts,
                        failure
                    );
                    return CallOutcome {
                        result: Err(failure),
                        attempts,
                    };
                }
            }
        }
    }
}
