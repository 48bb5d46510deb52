use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::domain::{CoverageReport, VocabularyCoverageMap};

static WORD_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\p{Alphabetic}+").expect("WORD_REGEX is a valid regex pattern"));

pub const DEFAULT_COVERAGE_THRESHOLD: f64 = 0.8;

/// Soft quality gate for passage glossaries.
#[derive(Debug, Clone, Copy)]
pub struct CoverageEnforcer {
    threshold: f64,
}

impl Default for CoverageEnforcer {
    fn default() -> Self {
        Self::new(DEFAULT_COVERAGE_THRESHOLD)
    }
}

impl CoverageEnforcer {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Distinct lower-cased alphabetic tokens of `text`.
    pub fn tokenize(text: &str) -> BTreeSet<String> {
        WORD_REGEX
            .find_iter(text)
            .map(|m| m.as_str().to_lowercase())
            .collect()
    }

    pub fn check(&self, passage: &str, glosses: &VocabularyCoverageMap) -> CoverageReport {
        let tokens = Self::tokenize(passage);
        let keys: BTreeSet<String> = glosses
            .keys()
            .map(|k| k.trim().to_lowercase())
            .collect();

        let missing: Vec<String> = tokens
            .iter()
            .filter(|token| !keys.contains(*token))
            .cloned()
            .collect();

        let total = tokens.len();
        let covered = total - missing.len();
        let ratio = if total == 0 {
            1.0
        } else {
            covered as f64 / total as f64
        };

        CoverageReport {
            ratio,
            covered,
            total,
            missing,
        }
    }

    /// Whether the report clears the threshold. Logs a warning when it does not.
    pub fn accept(&self, report: &CoverageReport) -> bool {
        if report.ratio + f64::EPSILON < self.threshold {
            log::warn!(
                "Gloss coverage {:.0}% below threshold {:.0}% ({} of {} words missing)",
                report.ratio * 100.0,
                self.threshold * 100.0,
                report.missing.len(),
                report.total
            );
            return false;
        }
        true
    }
}
