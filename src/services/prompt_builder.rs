use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use rand::Rng;

use crate::{
    constants::prompts::{
        CHAT_CORRECTION_SYSTEM_PROMPT, FEEDBACK_SYSTEM_PROMPT, GLOSS_REPAIR_SYSTEM_PROMPT,
        HINT_SYSTEM_PROMPT, IELTS_VOCAB_SYSTEM_PROMPT, LISTENING_SYSTEM_PROMPT,
        PASSAGE_SYSTEM_PROMPT, QUIZ_OUTPUT_RULES, QUIZ_PASSAGE_RULES, QUIZ_SYSTEM_PROMPT,
        SENTENCE_OUTPUT_RULES, SENTENCE_TASK, SENTENCE_USER_REQUEST, TEACHER_PERSONA,
    },
    models::domain::{BilingualPair, QuizQuestion},
    services::generation_client::ChatMessage,
};

// Shown to the model so it sees the exact field names and types.
static QUIZ_SCHEMA: Lazy<String> = Lazy::new(|| {
    let schema = schemars::schema_for!(QuizQuestion);
    serde_json::to_string(&schema).unwrap_or_default()
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

impl Prompt {
    pub fn into_messages(self) -> Vec<ChatMessage> {
        vec![ChatMessage::system(self.system), ChatMessage::user(self.user)]
    }
}

/// Concrete guidance a level resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultyBand {
    pub name: &'static str,
    pub min_words: u16,
    pub max_words: u16,
    pub guidance: &'static str,
}

const BEGINNER: DifficultyBand = DifficultyBand {
    name: "beginner (A1)",
    min_words: 4,
    max_words: 8,
    guidance: "very common everyday words, present simple, one clause",
};
const ELEMENTARY: DifficultyBand = DifficultyBand {
    name: "elementary (A2)",
    min_words: 6,
    max_words: 10,
    guidance: "common words, simple past and future, basic connectors such as and, but, because",
};
const INTERMEDIATE: DifficultyBand = DifficultyBand {
    name: "intermediate (B1)",
    min_words: 8,
    max_words: 14,
    guidance: "everyday topics with some less common words, present perfect, simple subordinate clauses",
};
const UPPER_INTERMEDIATE: DifficultyBand = DifficultyBand {
    name: "upper-intermediate (B2)",
    min_words: 10,
    max_words: 18,
    guidance: "abstract topics, passive voice, conditionals, relative clauses",
};
const ADVANCED: DifficultyBand = DifficultyBand {
    name: "advanced (C1)",
    min_words: 12,
    max_words: 22,
    guidance: "precise and idiomatic vocabulary, complex sentences, nuanced opinion",
};
const PROFICIENT: DifficultyBand = DifficultyBand {
    name: "proficient (C2)",
    min_words: 14,
    max_words: 26,
    guidance: "low-frequency vocabulary, inversion, academic register",
};

impl DifficultyBand {
    /// Resolves `easy|medium|hard`, CEFR codes and IELTS bands. Anything else
    /// gets the intermediate band.
    pub fn resolve(level: &str) -> DifficultyBand {
        let normalized = level.trim().to_lowercase();

        match normalized.as_str() {
            "easy" | "beginner" | "a1" => return BEGINNER,
            "elementary" | "a2" => return ELEMENTARY,
            "medium" | "intermediate" | "b1" => return INTERMEDIATE,
            "upper-intermediate" | "b2" => return UPPER_INTERMEDIATE,
            "hard" | "advanced" | "c1" => return ADVANCED,
            "proficient" | "c2" => return PROFICIENT,
            _ => {}
        }

        let band = normalized
            .trim_start_matches("ielts")
            .trim()
            .trim_start_matches("band")
            .trim()
            .parse::<f32>()
            .ok()
            .filter(|band| (0.0..=9.0).contains(band));

        match band {
            Some(b) if b < 4.5 => BEGINNER,
            Some(b) if b < 5.0 => ELEMENTARY,
            Some(b) if b < 6.0 => INTERMEDIATE,
            Some(b) if b < 7.0 => UPPER_INTERMEDIATE,
            Some(b) if b < 8.0 => ADVANCED,
            Some(_) => PROFICIENT,
            None => INTERMEDIATE,
        }
    }

    fn describe(&self) -> String {
        format!(
            "{}: {}-{} words, {}",
            self.name, self.min_words, self.max_words, self.guidance
        )
    }
}

/// `<1000..=9999>-<epoch millis % 10000>`, embedded so identical requests
/// do not get identical completions.
pub fn decorrelation_seed() -> String {
    seed_from(&mut rand::thread_rng(), Utc::now())
}

pub fn seed_from<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>) -> String {
    format!(
        "{}-{}",
        rng.gen_range(1000..=9999),
        now.timestamp_millis().rem_euclid(10_000)
    )
}

pub struct PromptBuilder;

impl PromptBuilder {
    pub fn sentence(
        topic: &str,
        level: &str,
        history: &[String],
        context: &[BilingualPair],
        seed: &str,
    ) -> Prompt {
        let band = DifficultyBand::resolve(level);
        let mut system = format!(
            "{TEACHER_PERSONA} {SENTENCE_TASK}\nTopic: {topic}.\nLevel: {level} ({}).\n",
            band.describe()
        );

        if !history.is_empty() {
            system.push_str("Do not repeat any of these sentences:\n");
            for sentence in history {
                let _ = writeln!(system, "- {sentence}");
            }
        }

        let context = render_bilingual_context(context);
        if !context.is_empty() {
            system.push_str(
                "Continue the thread of the previous passage so the context stays coherent.\nPrevious passage:\n",
            );
            system.push_str(&context);
        }

        let _ = write!(system, "{SENTENCE_OUTPUT_RULES} (seed: {seed})");

        Prompt {
            system,
            user: SENTENCE_USER_REQUEST.to_string(),
        }
    }

    pub fn feedback(vi_sentence: &str, user_answer: &str) -> Prompt {
        Prompt {
            system: FEEDBACK_SYSTEM_PROMPT.to_string(),
            user: format!(
                "Vietnamese sentence: {vi_sentence}\nStudent's English translation: {user_answer}"
            ),
        }
    }

    pub fn chat(message: &str) -> Prompt {
        Prompt {
            system: CHAT_CORRECTION_SYSTEM_PROMPT.to_string(),
            user: message.to_string(),
        }
    }

    pub fn hints(vi_sentence: &str) -> Prompt {
        Prompt {
            system: HINT_SYSTEM_PROMPT.to_string(),
            user: format!(
                "Vietnamese sentence: {vi_sentence}\nReturn the JSON array as instructed."
            ),
        }
    }

    pub fn quiz(topic: &str, level: &str, count: usize, passage: Option<&str>) -> Prompt {
        let band = DifficultyBand::resolve(level);
        let mut system = format!(
            "{QUIZ_SYSTEM_PROMPT}\nLevel: {level} ({}).\nEach question object must match this JSON Schema:\n{}\n",
            band.describe(),
            QUIZ_SCHEMA.as_str()
        );
        if passage.is_some() {
            system.push_str(QUIZ_PASSAGE_RULES);
            system.push('\n');
        }
        system.push_str(QUIZ_OUTPUT_RULES);

        let user = match passage {
            Some(passage) => format!(
                "Write exactly {count} questions about this passage (topic: {topic}).\nPassage:\n{passage}"
            ),
            None => format!("Write exactly {count} questions on the topic \"{topic}\"."),
        };

        Prompt { system, user }
    }

    pub fn passage(level: &str) -> Prompt {
        let band = DifficultyBand::resolve(level);
        Prompt {
            system: PASSAGE_SYSTEM_PROMPT.to_string(),
            user: format!(
                "Level: {level} ({}). Write a passage of 3 to 5 sentences, each within the word range of the level.",
                band.describe()
            ),
        }
    }

    pub fn gloss_repair(passage: &str, missing: &[String]) -> Prompt {
        Prompt {
            system: GLOSS_REPAIR_SYSTEM_PROMPT.to_string(),
            user: format!(
                "Passage:\n{passage}\nWords to gloss: {}",
                missing.join(", ")
            ),
        }
    }

    pub fn listening(topic: &str, band: &str) -> Prompt {
        let difficulty = DifficultyBand::resolve(band);
        Prompt {
            system: LISTENING_SYSTEM_PROMPT.to_string(),
            user: format!(
                "Topic: {topic}. Target band: {band} ({}). Keep the script to two or three sentences.",
                difficulty.describe()
            ),
        }
    }

    pub fn ielts_vocab(passage: &str, level: Option<&str>) -> Prompt {
        let target = match level {
            Some(level) => {
                format!("Target band: {level} ({}).", DifficultyBand::resolve(level).describe())
            }
            None => "Target band: any.".to_string(),
        };
        Prompt {
            system: IELTS_VOCAB_SYSTEM_PROMPT.to_string(),
            user: format!("{target}\nPassage:\n{passage}"),
        }
    }
}

fn render_bilingual_context(context: &[BilingualPair]) -> String {
    let mut rendered = String::new();
    for (idx, pair) in context.iter().filter(|pair| !pair.is_empty()).enumerate() {
        let _ = writeln!(rendered, "{}. Vietnamese: {}", idx + 1, pair.vi.trim());
        if let Some(en) = pair.en.as_deref().map(str::trim).filter(|en| !en.is_empty()) {
            let _ = writeln!(rendered, "   English: {en}");
        }
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn levels_resolve_to_bands() {
        assert_eq!(DifficultyBand::resolve("easy"), BEGINNER);
        assert_eq!(DifficultyBand::resolve(" Medium "), INTERMEDIATE);
        assert_eq!(DifficultyBand::resolve("C1"), ADVANCED);
        assert_eq!(DifficultyBand::resolve("IELTS 6.5"), UPPER_INTERMEDIATE);
        assert_eq!(DifficultyBand::resolve("band 8"), PROFICIENT);
        assert_eq!(DifficultyBand::resolve("4.0"), BEGINNER);
    }

    #[test]
    fn unknown_level_gets_default_band() {
        assert_eq!(DifficultyBand::resolve("galaxy-brain"), INTERMEDIATE);
        assert_eq!(DifficultyBand::resolve("12.0"), INTERMEDIATE);
    }

    #[test]
    fn sentence_prompt_lists_history_and_seed() {
        let history = vec!["Tôi đi học.".to_string(), "Tôi ăn cơm.".to_string()];

        let prompt = PromptBuilder::sentence("school", "easy", &history, &[], "1234-5678");

        assert!(prompt.system.contains("- Tôi đi học.\n- Tôi ăn cơm.\n"));
        assert!(prompt.system.contains("(seed: 1234-5678)"));
        assert!(prompt.system.contains("Topic: school."));
        assert!(prompt.system.contains("4-8 words"));
        assert!(!prompt.system.contains("Previous passage"));
        assert_eq!(prompt.user, SENTENCE_USER_REQUEST);
    }

    #[test]
    fn bilingual_context_renders_numbered_pairs() {
        let context = vec![
            BilingualPair::new("Tôi đến sân bay.", Some("I arrive at the airport.")),
            BilingualPair::new("", Some("orphan")),
            BilingualPair::new("Chuyến bay bị trễ.", None),
        ];

        let prompt = PromptBuilder::sentence("travel", "easy", &[], &context, "1000-1");

        assert!(prompt.system.contains(
            "1. Vietnamese: Tôi đến sân bay.\n   English: I arrive at the airport.\n2. Vietnamese: Chuyến bay bị trễ.\n"
        ));
        assert!(!prompt.system.contains("orphan"));
    }

    #[test]
    fn quiz_prompt_embeds_schema_and_passage_rules() {
        let with_passage = PromptBuilder::quiz("travel", "easy", 3, Some("The cat sat."));
        let without_passage = PromptBuilder::quiz("travel", "easy", 3, None);

        assert!(with_passage.system.contains("\"options\""));
        assert!(with_passage.system.contains(QUIZ_PASSAGE_RULES));
        assert!(with_passage.user.contains("The cat sat."));
        assert!(!without_passage.system.contains(QUIZ_PASSAGE_RULES));
        assert!(without_passage.user.contains("exactly 3 questions"));
    }

    #[test]
    fn gloss_repair_lists_missing_words() {
        let prompt =
            PromptBuilder::gloss_repair("The cat sat.", &["sat".to_string(), "the".to_string()]);

        assert!(prompt.user.ends_with("Words to gloss: sat, the"));
    }

    #[test]
    fn seed_has_expected_shape() {
        let mut rng = StdRng::seed_from_u64(11);
        let now = Utc.timestamp_millis_opt(1_700_000_123_456).unwrap();

        let seed = seed_from(&mut rng, now);
        let (head, tail) = seed.split_once('-').expect("seed has a dash");

        let head: u32 = head.parse().expect("numeric head");
        assert!((1000..=9999).contains(&head));
        assert_eq!(tail, "3456");
    }

    #[test]
    fn prompt_converts_to_system_then_user_messages() {
        let messages = PromptBuilder::chat("I goes to school").into_messages();

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], ChatMessage::system(CHAT_CORRECTION_SYSTEM_PROMPT));
        assert_eq!(messages[1], ChatMessage::user("I goes to school"));
    }
}
