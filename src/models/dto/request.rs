use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::models::domain::BilingualPair;

const MAX_SENTENCE_CHARS: usize = 500;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TranslateStartRequest {
    #[validate(length(min = 1, max = 100))]
    pub topic: String,

    #[validate(length(min = 1, max = 50))]
    pub level: String,

    #[serde(default)]
    #[validate(length(max = 200), custom(function = "validate_history"))]
    pub prev_history: Vec<String>,

    #[serde(default)]
    #[validate(length(max = 50), nested)]
    pub paragraph: Vec<BilingualPair>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TranslateNextRequest {
    #[validate(length(min = 1, max = 100))]
    pub topic: String,

    #[validate(length(min = 1, max = 50))]
    pub level: String,

    #[serde(default)]
    #[validate(length(max = 200), custom(function = "validate_history"))]
    pub prev_history: Vec<String>,

    #[serde(default)]
    #[validate(length(max = 1000))]
    pub user_answer: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChatRequest {
    #[validate(length(min = 1, max = 2000))]
    pub message: String,
}

/// A blank sentence is accepted and answered with a fixed hint.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct HintRequest {
    #[serde(default)]
    #[validate(length(max = 500))]
    pub vi_sentence: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct QuizRequest {
    #[validate(length(min = 1, max = 100))]
    pub topic: String,

    #[validate(length(min = 1, max = 50))]
    pub level: String,

    #[serde(default = "default_quiz_count")]
    #[validate(range(min = 1, max = 20))]
    pub count: usize,

    #[validate(length(max = 8000))]
    pub passage: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PassageRequest {
    #[validate(length(min = 1, max = 50))]
    pub level: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ListeningRequest {
    #[validate(length(min = 1, max = 100))]
    pub topic: String,

    #[validate(length(min = 1, max = 50))]
    pub band: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct IeltsVocabRequest {
    #[validate(length(min = 1, max = 8000))]
    pub passage: String,

    #[validate(length(min = 1, max = 50))]
    pub level: Option<String>,
}

fn default_quiz_count() -> usize {
    5
}

fn validate_history(history: &[String]) -> Result<(), ValidationError> {
    if history.iter().any(|s| s.chars().count() > MAX_SENTENCE_CHARS) {
        let mut error = ValidationError::new("history_entry_too_long");
        error.message = Some(format!("history entries must be at most {} characters", MAX_SENTENCE_CHARS).into());
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start_request(json: serde_json::Value) -> TranslateStartRequest {
        serde_json::from_value(json).expect("request should deserialize")
    }

    #[test]
    fn start_request_defaults_history_and_paragraph() {
        let request = start_request(serde_json::json!({"topic": "travel", "level": "easy"}));

        assert!(request.prev_history.is_empty());
        assert!(request.paragraph.is_empty());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn empty_topic_is_rejected() {
        let request = start_request(serde_json::json!({"topic": "", "level": "easy"}));

        assert!(request.validate().is_err());
    }

    #[test]
    fn oversized_history_is_rejected() {
        let history: Vec<String> = (0..201).map(|i| format!("Câu {i}.")).collect();
        let request = start_request(
            serde_json::json!({"topic": "travel", "level": "easy", "prev_history": history}),
        );

        assert!(request.validate().is_err());
    }

    #[test]
    fn overlong_history_entry_is_rejected() {
        let request = start_request(serde_json::json!({
            "topic": "travel",
            "level": "easy",
            "prev_history": ["a".repeat(MAX_SENTENCE_CHARS + 1)]
        }));

        let errors = request.validate().expect_err("entry is too long");
        assert!(errors.field_errors().contains_key("prev_history"));
    }

    #[test]
    fn paragraph_pairs_are_validated() {
        let request = start_request(serde_json::json!({
            "topic": "travel",
            "level": "easy",
            "paragraph": [{"vi": "x".repeat(501)}]
        }));

        assert!(request.validate().is_err());
    }

    #[test]
    fn quiz_count_defaults_and_is_bounded() {
        let defaulted: QuizRequest =
            serde_json::from_value(serde_json::json!({"topic": "travel", "level": "easy"}))
                .expect("request should deserialize");
        let too_many: QuizRequest = serde_json::from_value(
            serde_json::json!({"topic": "travel", "level": "easy", "count": 21}),
        )
        .expect("request should deserialize");
        let zero: QuizRequest = serde_json::from_value(
            serde_json::json!({"topic": "travel", "level": "easy", "count": 0}),
        )
        .expect("request should deserialize");

        assert_eq!(defaulted.count, 5);
        assert!(defaulted.validate().is_ok());
        assert!(too_many.validate().is_err());
        assert!(zero.validate().is_err());
    }

    #[test]
    fn blank_hint_sentence_is_valid() {
        let request: HintRequest =
            serde_json::from_value(serde_json::json!({})).expect("request should deserialize");

        assert!(request.validate().is_ok());
    }
}
