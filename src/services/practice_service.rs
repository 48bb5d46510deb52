use std::{collections::HashSet, sync::Arc};

use serde::Deserialize;
use serde_json::Value;

use crate::{
    config::Config,
    constants::content_pool::{NO_DATA_SENTINEL, POOL_EXHAUSTED_SENTINEL},
    models::domain::{
        BilingualPair, Feedback, FeedbackRecord, HintItem, ListeningPrompt, PracticeItem,
        QuizQuestion, ReadingPassage, ShapeViolation, VocabEntry, VocabularyCoverageMap,
    },
    services::{
        content_pool::ContentPool,
        coverage::CoverageEnforcer,
        deduplicator::{self, Selection},
        generation_client::{GenerationClient, SamplingParams},
        pipeline::{CallOutcome, FallbackReason, GenerationStatus, RetryPolicy},
        prompt_builder::{decorrelation_seed, Prompt, PromptBuilder},
        response_extractor::{coerce_gloss_map, ResponseExtractor},
    },
};

const SENTENCE_SAMPLING: SamplingParams = SamplingParams::new(60, 1.0);
const FEEDBACK_SAMPLING: SamplingParams = SamplingParams::new(400, 0.2);
const CHAT_SAMPLING: SamplingParams = SamplingParams::new(600, 0.2);
const HINT_SAMPLING: SamplingParams = SamplingParams::new(300, 0.2);
const PASSAGE_SAMPLING: SamplingParams = SamplingParams::new(1200, 0.7);
const GLOSS_REPAIR_SAMPLING: SamplingParams = SamplingParams::new(600, 0.0);
const LISTENING_SAMPLING: SamplingParams = SamplingParams::new(300, 0.8);
const IELTS_VOCAB_SAMPLING: SamplingParams = SamplingParams::new(900, 0.3);

const QUIZ_TOKENS_PER_QUESTION: u32 = 180;
const QUIZ_BASE_TOKENS: u32 = 200;
/// Upper bound on questions per quiz request.
pub const MAX_QUIZ_QUESTIONS: usize = 20;
const QUIZ_TEMPERATURE: f32 = 0.4;

const GAP_MARKER: &str = "____";
const NO_SENTENCE_HINT: &str = "Không có câu để gợi ý.";

/// A value plus how it was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct Generated<T> {
    pub value: T,
    pub status: GenerationStatus,
}

impl<T> Generated<T> {
    fn new(value: T, status: GenerationStatus) -> Self {
        Self { value, status }
    }
}

/// Next sentence and the grading of the previous answer.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnResult {
    pub next: PracticeItem,
    pub feedback: Option<Feedback>,
}

#[derive(Deserialize)]
struct PassagePayload {
    #[serde(default, alias = "text")]
    passage: String,
    #[serde(default, alias = "glossary")]
    vocabulary: Value,
}

#[derive(Deserialize)]
struct ListeningPayload {
    #[serde(default, alias = "script")]
    text: String,
    #[serde(default, alias = "gap")]
    answer: String,
}

/// Runs every content operation through prompt, call, extraction and
/// validation, and falls back to curated or empty content on failure.
pub struct PracticeService {
    client: Arc<dyn GenerationClient>,
    pool: ContentPool,
    coverage: CoverageEnforcer,
    retry: RetryPolicy,
}

impl PracticeService {
    pub fn new(
        client: Arc<dyn GenerationClient>,
        pool: ContentPool,
        coverage: CoverageEnforcer,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            client,
            pool,
            coverage,
            retry,
        }
    }

    pub fn from_config(client: Arc<dyn GenerationClient>, config: &Config) -> Self {
        Self::new(
            client,
            *ContentPool::builtin(),
            CoverageEnforcer::new(config.coverage_threshold),
            RetryPolicy::from_config(config),
        )
    }

    async fn call(&self, operation: &str, prompt: Prompt, params: SamplingParams) -> CallOutcome {
        self.retry
            .call(self.client.as_ref(), operation, prompt.into_messages(), params)
            .await
    }

    /// Issues a fresh sentence not present in `history`.
    pub async fn start_sentence(
        &self,
        topic: &str,
        level: &str,
        history: &[String],
        context: &[BilingualPair],
    ) -> Generated<PracticeItem> {
        let seed = decorrelation_seed();
        let prompt = PromptBuilder::sentence(topic, level, history, context, &seed);
        let outcome = self.call("sentence", prompt, SENTENCE_SAMPLING).await;
        let attempts = outcome.attempts;

        let reason = match outcome.result {
            Ok(raw) => match ResponseExtractor::extract_sentence(&raw) {
                Ok(sentence) if history.iter().any(|seen| *seen == sentence) => {
                    FallbackReason::from(&ShapeViolation::RepeatsHistory)
                }
                Ok(sentence) => {
                    log::info!("sentence: generated for topic={} level={}", topic, level);
                    return Generated::new(
                        PracticeItem::new(sentence, topic, level),
                        GenerationStatus::generated(attempts),
                    );
                }
                Err(e) => {
                    log::warn!("sentence: extraction failed: {}", e);
                    FallbackReason::from(&e)
                }
            },
            Err(failure) => FallbackReason::from(&failure),
        };

        log::info!(
            "sentence: falling back to curated pool ({}) for topic={} level={}",
            reason,
            topic,
            level
        );
        match self.pick_unseen_sentence(topic, level, history) {
            Selection::Picked(sentence) => Generated::new(
                PracticeItem::new(sentence, topic, level),
                GenerationStatus::fallback(reason, attempts),
            ),
            Selection::Exhausted => Generated::new(
                PracticeItem::new(NO_DATA_SENTINEL, topic, level),
                GenerationStatus::degraded(FallbackReason::PoolExhausted, attempts),
            ),
        }
    }

    /// Grades `user_answer` against the last sentence of `history` and
    /// issues the next curated sentence.
    pub async fn next_turn(
        &self,
        topic: &str,
        level: &str,
        history: &[String],
        user_answer: &str,
    ) -> Generated<TurnResult> {
        let next = match self.pick_unseen_sentence(topic, level, history) {
            Selection::Picked(sentence) => Some(sentence),
            Selection::Exhausted => None,
        };

        let previous = history.last().map(String::as_str).unwrap_or_default();
        let prompt = PromptBuilder::feedback(previous, user_answer);
        let outcome = self.call("feedback", prompt, FEEDBACK_SAMPLING).await;
        let attempts = outcome.attempts;

        let (feedback, mut status) = match outcome.result {
            Ok(raw) => match ResponseExtractor::extract_object::<FeedbackRecord>(&raw) {
                Ok(record) => (
                    Some(Feedback::Record(record)),
                    GenerationStatus::generated(attempts),
                ),
                Err(e) => {
                    log::warn!("feedback: returning raw text, extraction failed: {}", e);
                    (
                        Some(Feedback::Text(raw)),
                        GenerationStatus::degraded(FallbackReason::from(&e), attempts),
                    )
                }
            },
            Err(failure) => (
                None,
                GenerationStatus::degraded(FallbackReason::from(&failure), attempts),
            ),
        };

        let next = match next {
            Some(sentence) => PracticeItem::new(sentence, topic, level),
            None => {
                log::info!("next: pool exhausted for topic={} level={}", topic, level);
                if status.is_generated() {
                    status = GenerationStatus::degraded(FallbackReason::PoolExhausted, attempts);
                }
                PracticeItem::new(POOL_EXHAUSTED_SENTINEL, topic, level)
            }
        };

        Generated::new(TurnResult { next, feedback }, status)
    }

    /// Free-text correction. An empty reply stands in for a failed call.
    pub async fn chat_correction(&self, message: &str) -> Generated<String> {
        let outcome = self.call("chat", PromptBuilder::chat(message), CHAT_SAMPLING).await;

        match outcome.result {
            Ok(reply) => Generated::new(reply, GenerationStatus::generated(outcome.attempts)),
            Err(failure) => Generated::new(
                String::new(),
                GenerationStatus::degraded(FallbackReason::from(&failure), outcome.attempts),
            ),
        }
    }

    pub async fn hints(&self, vi_sentence: &str) -> Generated<Vec<HintItem>> {
        let vi_sentence = vi_sentence.trim();
        if vi_sentence.is_empty() {
            return Generated::new(
                vec![HintItem::info(NO_SENTENCE_HINT)],
                GenerationStatus::fallback(FallbackReason::EmptyInput, 0),
            );
        }

        let outcome = self.call("hints", PromptBuilder::hints(vi_sentence), HINT_SAMPLING).await;
        let attempts = outcome.attempts;

        let reason = match outcome.result {
            Ok(raw) => match ResponseExtractor::extract_hints(&raw) {
                Ok(hints) => {
                    log::info!("hints: {} generated", hints.len());
                    return Generated::new(hints, GenerationStatus::generated(attempts));
                }
                Err(e) => {
                    log::warn!("hints: extraction failed: {}", e);
                    FallbackReason::from(&e)
                }
            },
            Err(failure) => FallbackReason::from(&failure),
        };

        Generated::new(Vec::new(), GenerationStatus::degraded(reason, attempts))
    }

    /// Up to `count` validated questions. Without a passage, a failed
    /// generation is replaced by `count` curated questions when enough exist.
    pub async fn generate_quiz(
        &self,
        topic: &str,
        level: &str,
        count: usize,
        passage: Option<&str>,
    ) -> Generated<Vec<QuizQuestion>> {
        let count = count.min(MAX_QUIZ_QUESTIONS);
        let passage = passage.map(str::trim).filter(|p| !p.is_empty());
        let prompt = PromptBuilder::quiz(topic, level, count, passage);
        let params = SamplingParams::new(quiz_token_budget(count), QUIZ_TEMPERATURE);
        let outcome = self.call("quiz", prompt, params).await;
        let attempts = outcome.attempts;

        let reason = match outcome.result {
            Ok(raw) => match ResponseExtractor::extract_quiz_questions(&raw) {
                Ok(questions) => {
                    let mut valid = validate_questions(questions, passage);
                    if valid.is_empty() {
                        FallbackReason::ShapeViolation
                    } else {
                        valid.truncate(count);
                        log::info!("quiz: {} questions generated for topic={}", valid.len(), topic);
                        return Generated::new(valid, GenerationStatus::generated(attempts));
                    }
                }
                Err(e) => {
                    log::warn!("quiz: extraction failed: {}", e);
                    FallbackReason::from(&e)
                }
            },
            Err(failure) => FallbackReason::from(&failure),
        };

        if passage.is_none() {
            let curated = self.pool.quiz_questions(topic, level);
            if curated.len() >= count {
                let picked: Vec<QuizQuestion> = deduplicator::select_many(
                    &curated,
                    &HashSet::<String>::new(),
                    count,
                    |q| q.question.clone(),
                    &mut rand::thread_rng(),
                )
                .into_iter()
                .cloned()
                .collect();
                log::info!("quiz: falling back to {} curated questions ({})", picked.len(), reason);
                return Generated::new(picked, GenerationStatus::fallback(reason, attempts));
            }
            log::info!(
                "quiz: curated pool has {} questions, {} requested",
                curated.len(),
                count
            );
        }

        Generated::new(Vec::new(), GenerationStatus::degraded(reason, attempts))
    }

    /// Passage plus glossary. Coverage below the threshold triggers one
    /// follow-up call for the missing words.
    pub async fn generate_passage(&self, level: &str) -> Generated<ReadingPassage> {
        let outcome = self.call("passage", PromptBuilder::passage(level), PASSAGE_SAMPLING).await;
        let mut attempts = outcome.attempts;

        let payload = match outcome.result {
            Ok(raw) => match ResponseExtractor::extract_object::<PassagePayload>(&raw) {
                Ok(payload) if !payload.passage.trim().is_empty() => payload,
                Ok(_) => {
                    return Generated::new(
                        ReadingPassage::empty(),
                        GenerationStatus::degraded(FallbackReason::ShapeViolation, attempts),
                    )
                }
                Err(e) => {
                    log::warn!("passage: extraction failed: {}", e);
                    return Generated::new(
                        ReadingPassage::empty(),
                        GenerationStatus::degraded(FallbackReason::from(&e), attempts),
                    );
                }
            },
            Err(failure) => {
                return Generated::new(
                    ReadingPassage::empty(),
                    GenerationStatus::degraded(FallbackReason::from(&failure), attempts),
                )
            }
        };

        let passage = payload.passage.trim().to_string();
        let mut vocabulary = coerce_gloss_map(&payload.vocabulary);
        let mut coverage = self.coverage.check(&passage, &vocabulary);

        if !self.coverage.accept(&coverage) {
            let prompt = PromptBuilder::gloss_repair(&passage, &coverage.missing);
            let repair = self.call("gloss_repair", prompt, GLOSS_REPAIR_SAMPLING).await;
            attempts += repair.attempts;

            match repair.result.map(|raw| ResponseExtractor::extract_gloss_map(&raw)) {
                Ok(Ok(glosses)) => {
                    merge_missing(&mut vocabulary, glosses, &coverage.missing);
                    coverage = self.coverage.check(&passage, &vocabulary);
                    log::info!("passage: coverage after repair {:.2}", coverage.ratio);
                }
                Ok(Err(e)) => log::warn!("passage: gloss repair unusable: {}", e),
                Err(failure) => log::warn!("passage: gloss repair failed: {}", failure),
            }
        }

        let status = if self.coverage.accept(&coverage) {
            GenerationStatus::generated(attempts)
        } else {
            GenerationStatus::degraded(FallbackReason::CoverageBelowThreshold, attempts)
        };

        Generated::new(
            ReadingPassage {
                passage,
                vocabulary,
                coverage,
            },
            status,
        )
    }

    /// Gap-fill listening exercise; `audio_url` is always empty.
    pub async fn listening_prompt(&self, topic: &str, band: &str) -> Generated<ListeningPrompt> {
        let prompt = PromptBuilder::listening(topic, band);
        let outcome = self.call("listening", prompt, LISTENING_SAMPLING).await;
        let attempts = outcome.attempts;

        let reason = match outcome.result {
            Ok(raw) => match ResponseExtractor::extract_object::<ListeningPayload>(&raw) {
                Ok(payload) => match into_gap_fill(payload) {
                    Ok(listening) => {
                        return Generated::new(listening, GenerationStatus::generated(attempts))
                    }
                    Err(violation) => {
                        log::warn!("listening: {}", violation);
                        FallbackReason::from(&violation)
                    }
                },
                Err(e) => {
                    log::warn!("listening: extraction failed: {}", e);
                    FallbackReason::from(&e)
                }
            },
            Err(failure) => FallbackReason::from(&failure),
        };

        Generated::new(
            ListeningPrompt::default(),
            GenerationStatus::degraded(reason, attempts),
        )
    }

    pub async fn ielts_vocab(&self, passage: &str, level: Option<&str>) -> Generated<Vec<VocabEntry>> {
        let prompt = PromptBuilder::ielts_vocab(passage, level);
        let outcome = self.call("ielts_vocab", prompt, IELTS_VOCAB_SAMPLING).await;
        let attempts = outcome.attempts;

        let reason = match outcome.result {
            Ok(raw) => match ResponseExtractor::extract_array::<VocabEntry>(&raw) {
                Ok(entries) => {
                    let entries = dedup_vocab(entries);
                    if entries.is_empty() {
                        FallbackReason::ShapeViolation
                    } else {
                        log::info!("ielts_vocab: {} entries generated", entries.len());
                        return Generated::new(entries, GenerationStatus::generated(attempts));
                    }
                }
                Err(e) => {
                    log::warn!("ielts_vocab: extraction failed: {}", e);
                    FallbackReason::from(&e)
                }
            },
            Err(failure) => FallbackReason::from(&failure),
        };

        Generated::new(Vec::new(), GenerationStatus::degraded(reason, attempts))
    }

    fn pick_unseen_sentence(&self, topic: &str, level: &str, history: &[String]) -> Selection<&'static str> {
        let used: HashSet<&str> = history.iter().map(String::as_str).collect();
        let pool = self.pool.sentences(topic, level);

        match deduplicator::select(pool, &used, |s| *s, &mut rand::thread_rng()) {
            Selection::Picked(sentence) => Selection::Picked(*sentence),
            Selection::Exhausted => Selection::Exhausted,
        }
    }
}

fn validate_questions(questions: Vec<QuizQuestion>, passage: Option<&str>) -> Vec<QuizQuestion> {
    questions
        .into_iter()
        .filter(|question| match question.check_shape() {
            Ok(()) => true,
            Err(violation) => {
                log::debug!("quiz: dropping '{}': {}", question.question, violation);
                false
            }
        })
        .map(|mut question| {
            // Evidence must quote the passage; anything else is discarded.
            let quoted = match (question.evidence.as_deref(), passage) {
                (Some(evidence), Some(passage)) => passage.contains(evidence.trim()),
                _ => false,
            };
            if !quoted {
                question.evidence = None;
            }
            question
        })
        .collect()
}

fn merge_missing(vocabulary: &mut VocabularyCoverageMap, repaired: VocabularyCoverageMap, missing: &[String]) {
    for word in missing {
        if let Some(gloss) = repaired.get(word) {
            vocabulary.entry(word.clone()).or_insert_with(|| gloss.clone());
        }
    }
}

fn into_gap_fill(payload: ListeningPayload) -> Result<ListeningPrompt, ShapeViolation> {
    let text = payload.text.trim();
    let answer = payload.answer.trim();

    if text.is_empty() {
        return Err(ShapeViolation::MissingField("text"));
    }
    if answer.is_empty() {
        return Err(ShapeViolation::MissingField("answer"));
    }

    let text = if text.contains(GAP_MARKER) {
        text.to_string()
    } else if text.contains(answer) {
        text.replacen(answer, GAP_MARKER, 1)
    } else {
        return Err(ShapeViolation::MissingField("gap"));
    };

    Ok(ListeningPrompt {
        text,
        answer: answer.to_string(),
        audio_url: None,
    })
}

fn dedup_vocab(entries: Vec<VocabEntry>) -> Vec<VocabEntry> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(VocabEntry::is_usable)
        .filter(|entry| seen.insert(entry.word.trim().to_lowercase()))
        .collect()
}

fn quiz_token_budget(count: usize) -> u32 {
    u32::try_from(count)
        .unwrap_or(u32::MAX)
        .saturating_mul(QUIZ_TOKENS_PER_QUESTION)
        .saturating_add(QUIZ_BASE_TOKENS)
}
