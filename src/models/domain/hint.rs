use serde::{Deserialize, Serialize};

/// A translation hint. Variants are told apart by which fields are present,
/// so the JSON form carries no tag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HintItem {
    Vocabulary {
        word: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        part_of_speech: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pronunciation: Option<String>,
        gloss: String,
    },
    Grammar {
        grammar_pattern: String,
        gloss: String,
    },
    Info {
        info: String,
    },
}

impl HintItem {
    pub fn vocabulary(word: &str, gloss: &str) -> Self {
        HintItem::Vocabulary {
            word: word.to_string(),
            part_of_speech: None,
            pronunciation: None,
            gloss: gloss.to_string(),
        }
    }

    pub fn grammar(pattern: &str, gloss: &str) -> Self {
        HintItem::Grammar {
            grammar_pattern: pattern.to_string(),
            gloss: gloss.to_string(),
        }
    }

    pub fn info(text: &str) -> Self {
        HintItem::Info {
            info: text.to_string(),
        }
    }
}
