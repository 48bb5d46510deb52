use serde::{Deserialize, Serialize};

use crate::models::domain::{CoverageReport, VocabularyCoverageMap};

/// Reading passage with its per-word glossary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReadingPassage {
    pub passage: String,
    pub vocabulary: VocabularyCoverageMap,
    pub coverage: CoverageReport,
}

impl ReadingPassage {
    pub fn empty() -> Self {
        Self {
            passage: String::new(),
            vocabulary: VocabularyCoverageMap::new(),
            coverage: CoverageReport::empty(),
        }
    }
}
