use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::models::domain::ShapeViolation;

/// Multiple-choice question. `answer` indexes into `options`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>, // four expected
    pub answer: usize,
    pub explain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>, // quote from the passage, when one was given
}

impl QuizQuestion {
    pub const EXPECTED_OPTION_COUNT: usize = 4;

    pub fn new(question: &str, options: &[&str], answer: usize, explain: &str) -> Self {
        Self {
            question: question.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            answer,
            explain: explain.to_string(),
            evidence: None,
        }
    }

    pub fn check_shape(&self) -> Result<(), ShapeViolation> {
        if self.question.trim().is_empty() {
            return Err(ShapeViolation::MissingField("question"));
        }
        if self.options.is_empty() {
            return Err(ShapeViolation::MissingField("options"));
        }
        if self.options.iter().any(|o| o.trim().is_empty()) {
            return Err(ShapeViolation::BlankOption);
        }
        if self.answer >= self.options.len() {
            return Err(ShapeViolation::AnswerOutOfRange {
                answer: self.answer,
                options: self.options.len(),
            });
        }
        Ok(())
    }

    pub fn correct_option(&self) -> Option<&str> {
        self.options.get(self.answer).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> QuizQuestion {
        QuizQuestion::new(
            "Which word means 'con mèo'?",
            &["dog", "cat", "bird", "fish"],
            1,
            "'Cat' is 'con mèo'.",
        )
    }

    #[test]
    fn well_formed_question_passes_shape_check() {
        let question = sample();

        assert!(question.check_shape().is_ok());
        assert_eq!(question.correct_option(), Some("cat"));
    }

    #[test]
    fn answer_past_last_option_is_rejected() {
        let mut question = sample();
        question.answer = 4;

        assert_eq!(
            question.check_shape(),
            Err(ShapeViolation::AnswerOutOfRange { answer: 4, options: 4 })
        );
        assert_eq!(question.correct_option(), None);
    }

    #[test]
    fn question_without_options_is_rejected() {
        let mut question = sample();
        question.options.clear();
        question.answer = 0;

        assert_eq!(
            question.check_shape(),
            Err(ShapeViolation::MissingField("options"))
        );
    }

    #[test]
    fn evidence_is_omitted_from_json_when_absent() {
        let json = serde_json::to_value(sample()).expect("question should serialize");

        assert!(json.get("evidence").is_none());
        assert_eq!(json["answer"], 1);
    }

    #[test]
    fn schema_lists_required_fields() {
        let schema = schemars::schema_for!(QuizQuestion);
        let json = serde_json::to_value(&schema).expect("schema should serialize");
        let required = json["required"].as_array().expect("required should be an array");

        for field in ["question", "options", "answer", "explain"] {
            assert!(required.iter().any(|r| r == field), "missing {field}");
        }
    }
}
