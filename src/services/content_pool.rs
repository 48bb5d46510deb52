use once_cell::sync::Lazy;

use crate::{
    constants::content_pool::{TopicQuestions, TopicSentences, PRACTICE_SENTENCES, QUIZ_BANK},
    models::domain::QuizQuestion,
};

static BUILTIN: Lazy<ContentPool> = Lazy::new(|| ContentPool::new(PRACTICE_SENTENCES, QUIZ_BANK));

/// Read-only curated content, keyed by topic and level.
#[derive(Clone, Copy)]
pub struct ContentPool {
    sentences: &'static [TopicSentences],
    questions: &'static [TopicQuestions],
}

impl ContentPool {
    pub fn new(sentences: &'static [TopicSentences], questions: &'static [TopicQuestions]) -> Self {
        Self {
            sentences,
            questions,
        }
    }

    /// The pool compiled into the binary.
    pub fn builtin() -> &'static ContentPool {
        &BUILTIN
    }

    /// Sentences for the pair, or an empty slice for an unknown topic or level.
    pub fn sentences(&self, topic: &str, level: &str) -> &'static [&'static str] {
        self.sentences
            .iter()
            .find(|entry| matches_key(entry.topic, entry.level, topic, level))
            .map(|entry| entry.sentences)
            .unwrap_or(&[])
    }

    pub fn quiz_questions(&self, topic: &str, level: &str) -> Vec<QuizQuestion> {
        self.questions
            .iter()
            .find(|entry| matches_key(entry.topic, entry.level, topic, level))
            .map(|entry| {
                entry
                    .questions
                    .iter()
                    .map(|q| QuizQuestion::new(q.question, &q.options, q.answer, q.explain))
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn matches_key(entry_topic: &str, entry_level: &str, topic: &str, level: &str) -> bool {
    entry_topic.eq_ignore_ascii_case(topic.trim()) && entry_level.eq_ignore_ascii_case(level.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_case_and_whitespace() {
        let pool = ContentPool::builtin();

        assert_eq!(pool.sentences(" Travel ", "EASY"), pool.sentences("travel", "easy"));
        assert!(!pool.sentences("travel", "easy").is_empty());
    }

    #[test]
    fn unknown_pair_has_no_content() {
        let pool = ContentPool::builtin();

        assert!(pool.sentences("astronomy", "easy").is_empty());
        assert!(pool.quiz_questions("travel", "expert").is_empty());
    }

    #[test]
    fn curated_questions_are_well_formed() {
        let pool = ContentPool::builtin();

        for entry in QUIZ_BANK {
            let questions = pool.quiz_questions(entry.topic, entry.level);
            assert_eq!(questions.len(), entry.questions.len());
            for question in questions {
                assert!(question.check_shape().is_ok(), "{}", question.question);
                assert_eq!(question.options.len(), QuizQuestion::EXPECTED_OPTION_COUNT);
            }
        }
    }

    #[test]
    fn curated_sentences_are_unique_per_pair() {
        for entry in PRACTICE_SENTENCES {
            let mut sentences = entry.sentences.to_vec();
            sentences.sort_unstable();
            sentences.dedup();
            assert_eq!(sentences.len(), entry.sentences.len());
        }
    }
}
