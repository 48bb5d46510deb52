use serde::{Deserialize, Serialize};

use crate::{
    models::domain::{
        CoverageReport, Feedback, HintItem, ListeningPrompt, PracticeItem, QuizQuestion,
        ReadingPassage, VocabEntry, VocabularyCoverageMap,
    },
    services::{
        pipeline::GenerationStatus,
        practice_service::{Generated, TurnResult},
    },
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub vi_sentence: String,
    pub feedback: Option<Feedback>,
    pub status: GenerationStatus,
}

impl From<Generated<PracticeItem>> for TranslateResponse {
    fn from(generated: Generated<PracticeItem>) -> Self {
        Self {
            vi_sentence: generated.value.sentence,
            feedback: None,
            status: generated.status,
        }
    }
}

impl From<Generated<TurnResult>> for TranslateResponse {
    fn from(generated: Generated<TurnResult>) -> Self {
        Self {
            vi_sentence: generated.value.next.sentence,
            feedback: generated.value.feedback,
            status: generated.status,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
    pub status: GenerationStatus,
}

impl From<Generated<String>> for ChatResponse {
    fn from(generated: Generated<String>) -> Self {
        Self {
            reply: generated.value,
            status: generated.status,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HintResponse {
    pub hints: Vec<HintItem>,
    pub status: GenerationStatus,
}

impl From<Generated<Vec<HintItem>>> for HintResponse {
    fn from(generated: Generated<Vec<HintItem>>) -> Self {
        Self {
            hints: generated.value,
            status: generated.status,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizResponse {
    pub questions: Vec<QuizQuestion>,
    pub status: GenerationStatus,
}

impl From<Generated<Vec<QuizQuestion>>> for QuizResponse {
    fn from(generated: Generated<Vec<QuizQuestion>>) -> Self {
        Self {
            questions: generated.value,
            status: generated.status,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassageResponse {
    pub passage: String,
    pub vocabulary: VocabularyCoverageMap,
    pub coverage: CoverageReport,
    pub status: GenerationStatus,
}

impl From<Generated<ReadingPassage>> for PassageResponse {
    fn from(generated: Generated<ReadingPassage>) -> Self {
        let ReadingPassage {
            passage,
            vocabulary,
            coverage,
        } = generated.value;

        Self {
            passage,
            vocabulary,
            coverage,
            status: generated.status,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListeningResponse {
    pub text: String,
    pub answer: String,
    pub audio_url: Option<String>,
    pub status: GenerationStatus,
}

impl From<Generated<ListeningPrompt>> for ListeningResponse {
    fn from(generated: Generated<ListeningPrompt>) -> Self {
        Self {
            text: generated.value.text,
            answer: generated.value.answer,
            audio_url: generated.value.audio_url,
            status: generated.status,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IeltsVocabResponse {
    pub vocab: Vec<VocabEntry>,
    pub status: GenerationStatus,
}

impl From<Generated<Vec<VocabEntry>>> for IeltsVocabResponse {
    fn from(generated: Generated<Vec<VocabEntry>>) -> Self {
        Self {
            vocab: generated.value,
            status: generated.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::pipeline::FallbackReason;

    #[test]
    fn start_response_serializes_null_feedback() {
        let response = TranslateResponse::from(Generated {
            value: PracticeItem::new("Tôi đi học.", "school", "easy"),
            status: GenerationStatus::generated(1),
        });

        let json = serde_json::to_value(&response).expect("response should serialize");
        assert_eq!(json["vi_sentence"], "Tôi đi học.");
        assert!(json["feedback"].is_null());
        assert_eq!(json["status"]["source"], "generated");
    }

    #[test]
    fn listening_response_always_carries_audio_url_key() {
        let response = ListeningResponse::from(Generated {
            value: ListeningPrompt::default(),
            status: GenerationStatus::degraded(FallbackReason::Timeout, 2),
        });

        let json = serde_json::to_value(&response).expect("response should serialize");
        assert!(json.as_object().is_some_and(|o| o.contains_key("audio_url")));
        assert!(json["audio_url"].is_null());
        assert_eq!(json["status"]["reason"], "timeout");
    }
}
