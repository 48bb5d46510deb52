use serde::{Deserialize, Serialize};
use validator::Validate;

/// A sentence issued to the learner for translation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeItem {
    pub sentence: String,
    pub topic: String,
    pub level: String,
}

impl PracticeItem {
    pub fn new(sentence: impl Into<String>, topic: &str, level: &str) -> Self {
        Self {
            sentence: sentence.into(),
            topic: topic.to_string(),
            level: level.to_string(),
        }
    }
}

/// A previously translated pair, used to keep generated sentences on topic.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct BilingualPair {
    #[validate(length(max = 500))]
    #[serde(default)]
    pub vi: String,

    #[validate(length(max = 500))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub en: Option<String>,
}

impl BilingualPair {
    pub fn new(vi: &str, en: Option<&str>) -> Self {
        Self {
            vi: vi.to_string(),
            en: en.map(str::to_string),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vi.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bilingual_pair_accepts_missing_english() {
        let pair: BilingualPair =
            serde_json::from_str(r#"{"vi": "Tôi đi học."}"#).expect("pair should parse");

        assert_eq!(pair.vi, "Tôi đi học.");
        assert!(pair.en.is_none());
        assert!(!pair.is_empty());
    }

    #[test]
    fn bilingual_pair_without_vietnamese_is_empty() {
        let pair: BilingualPair =
            serde_json::from_str(r#"{"en": "I go to school."}"#).expect("pair should parse");

        assert!(pair.is_empty());
    }
}
