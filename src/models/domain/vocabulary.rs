use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Lower-cased surface word to a short gloss, scoped to one passage.
pub type VocabularyCoverageMap = BTreeMap<String, String>;

/// How much of a passage a gloss map covers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoverageReport {
    pub ratio: f64,
    pub covered: usize,
    pub total: usize,
    pub missing: Vec<String>,
}

impl CoverageReport {
    pub fn empty() -> Self {
        Self {
            ratio: 0.0,
            covered: 0,
            total: 0,
            missing: Vec::new(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Word-detail record returned by IELTS vocabulary extraction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabEntry {
    #[serde(alias = "term")]
    pub word: String,
    #[serde(default, alias = "pos", skip_serializing_if = "Option::is_none")]
    pub part_of_speech: Option<String>,
    #[serde(default, alias = "ipa", skip_serializing_if = "Option::is_none")]
    pub pronunciation: Option<String>,
    #[serde(alias = "gloss", alias = "vi")]
    pub meaning: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

impl VocabEntry {
    pub fn is_usable(&self) -> bool {
        !self.word.trim().is_empty() && !self.meaning.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vocab_entry_accepts_common_field_aliases() {
        let entry: VocabEntry = serde_json::from_str(
            r#"{"term": "mitigate", "pos": "verb", "vi": "giảm nhẹ"}"#,
        )
        .expect("entry should parse");

        assert_eq!(entry.word, "mitigate");
        assert_eq!(entry.part_of_speech.as_deref(), Some("verb"));
        assert_eq!(entry.meaning, "giảm nhẹ");
        assert!(entry.is_usable());
    }

    #[test]
    fn blank_meaning_is_not_usable() {
        let entry: VocabEntry =
            serde_json::from_str(r#"{"word": "fluent", "meaning": " "}"#).expect("entry should parse");

        assert!(!entry.is_usable());
    }

    #[test]
    fn empty_report_is_complete() {
        assert!(CoverageReport::empty().is_complete());
    }
}
