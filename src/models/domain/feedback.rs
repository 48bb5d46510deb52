use serde::{Deserialize, Serialize};

/// Grading result for a learner's translation attempt.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub user_answer: String,
    pub correct_answer: String,
    pub score: Score,
    pub explanation: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Score {
    Number(f64),
    Text(String),
}

/// Feedback as returned to the caller: a parsed record when the model kept to
/// the requested JSON, otherwise its raw text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Feedback {
    Record(FeedbackRecord),
    Text(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_accepts_number_or_text() {
        let numeric: Score = serde_json::from_str("8.5").expect("number should parse");
        let textual: Score = serde_json::from_str("\"8/10\"").expect("text should parse");

        assert_eq!(numeric, Score::Number(8.5));
        assert_eq!(textual, Score::Text("8/10".to_string()));
    }

    #[test]
    fn feedback_text_serializes_as_plain_string() {
        let json = serde_json::to_value(Feedback::Text("Good job".into())).expect("serialize");

        assert_eq!(json, serde_json::json!("Good job"));
    }
}
