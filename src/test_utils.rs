pub mod fixtures {
    use crate::models::domain::QuizQuestion;

    pub fn sample_question() -> QuizQuestion {
        QuizQuestion::new(
            "Which word means \"con mèo\"?",
            &["dog", "cat", "bird", "fish"],
            1,
            "\"Cat\" là con mèo.",
        )
    }

    /// A JSON array of `count` well-formed questions, optionally quoting
    /// `evidence`.
    pub fn quiz_json(count: usize, evidence: Option<&str>) -> String {
        let questions: Vec<serde_json::Value> = (0..count)
            .map(|i| {
                let mut question = serde_json::json!({
                    "question": format!("Question {}?", i + 1),
                    "options": ["a", "b", "c", "d"],
                    "answer": i % 4,
                    "explain": "Giải thích.",
                });
                if let Some(evidence) = evidence {
                    question["evidence"] = serde_json::json!(evidence);
                }
                question
            })
            .collect();
        serde_json::Value::Array(questions).to_string()
    }
}

pub mod stubs {
    use std::{collections::VecDeque, sync::Arc, sync::Mutex};

    use async_trait::async_trait;

    use crate::{
        app_state::AppState,
        config::Config,
        services::generation_client::{
            ChatMessage, FailureCause, GenerationClient, GenerationFailed, SamplingParams,
        },
    };

    /// Replays canned replies in order, then fails.
    pub struct ScriptedClient {
        replies: Mutex<VecDeque<Result<String, GenerationFailed>>>,
    }

    impl ScriptedClient {
        pub fn new(replies: Vec<Result<String, GenerationFailed>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
            }
        }

        pub fn replying(reply: &str) -> Self {
            Self::new(vec![Ok(reply.to_string())])
        }
    }

    #[async_trait]
    impl GenerationClient for ScriptedClient {
        async fn generate(
            &self,
            _messages: Vec<ChatMessage>,
            _params: SamplingParams,
        ) -> Result<String, GenerationFailed> {
            let next = self.replies.lock().ok().and_then(|mut replies| replies.pop_front());
            next.unwrap_or_else(|| {
                Err(GenerationFailed::new(FailureCause::Authentication, "script exhausted"))
            })
        }
    }

    pub fn state_with(client: impl GenerationClient + 'static) -> Arc<AppState> {
        Arc::new(AppState::with_client(Config::test_config(), Arc::new(client)))
    }
}

pub mod test_helpers {
    use actix_web::http::StatusCode;

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{fixtures::*, stubs::*};
    use crate::services::generation_client::{GenerationClient, SamplingParams};

    #[test]
    fn quiz_json_has_requested_length() {
        let parsed: Vec<serde_json::Value> =
            serde_json::from_str(&quiz_json(3, None)).expect("fixture is valid JSON");

        assert_eq!(parsed.len(), 3);
        assert!(parsed[0].get("evidence").is_none());
    }

    #[test]
    fn sample_question_is_well_formed() {
        assert!(sample_question().check_shape().is_ok());
    }

    #[actix_web::test]
    async fn scripted_client_fails_once_exhausted() {
        let client = ScriptedClient::replying("one");
        let params = SamplingParams::new(1, 0.0);

        assert_eq!(client.generate(vec![], params).await, Ok("one".to_string()));
        assert!(client.generate(vec![], params).await.is_err());
    }
}
