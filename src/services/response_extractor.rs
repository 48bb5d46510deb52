//! Recovers structured values from free-form model text.
//!
//! Strategies run in order and the first usable result wins:
//! 1. strict parse of the first balanced `[...]` / `{...}` literal,
//! 2. permissive parse after repairing common defects,
//! 3. per-field coercion of parsed elements (malformed elements are dropped),
//! 4. line heuristics, for hint lists only.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::domain::{HintItem, QuizQuestion, VocabularyCoverageMap};

static CODE_FENCE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*```[A-Za-z0-9_-]*[ \t]*$").expect("CODE_FENCE_REGEX is a valid regex pattern")
});

static TRAILING_COMMA_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",\s*([\]}])").expect("TRAILING_COMMA_REGEX is a valid regex pattern"));

static SINGLE_QUOTED_KEY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([{,]\s*)'([^'\n]+)'\s*:"#).expect("SINGLE_QUOTED_KEY_REGEX is a valid regex pattern")
});

static SINGLE_QUOTED_VALUE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#":\s*'([^'\n]*)'(\s*[,}\]])"#).expect("SINGLE_QUOTED_VALUE_REGEX is a valid regex pattern")
});

static LIST_MARKER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[-•*+]+|\d+[.)])\s*").expect("LIST_MARKER_REGEX is a valid regex pattern")
});

static SENTENCE_LABEL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:câu(?: tiếng việt)?|tiếng việt|vietnamese(?: sentence)?|sentence)\s*:\s*")
        .expect("SENTENCE_LABEL_REGEX is a valid regex pattern")
});

static SEED_ECHO_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\(\s*seed\s*:[^)]*\)").expect("SEED_ECHO_REGEX is a valid regex pattern"));

static OPTION_LABEL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z])[.):]\s+").expect("OPTION_LABEL_REGEX is a valid regex pattern"));

const VOCABULARY_KEYS: &[&str] = &[
    "từ vựng", "từ", "cụm từ", "từ/cụm từ", "word", "words", "vocabulary", "phrase",
];
const GRAMMAR_KEYS: &[&str] = &[
    "ngữ pháp", "cấu trúc", "cấu trúc ngữ pháp", "grammar", "structure", "pattern",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("response contained no text")]
    Blank,

    #[error("no structured literal found in response")]
    NoStructuredLiteral,

    #[error("structured literal could not be parsed: {0}")]
    Malformed(String),

    #[error("parsed value was empty")]
    Empty,

    #[error("parsed value did not match expected shape: {0}")]
    WrongShape(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedShape {
    Sentence,
    QuizQuestions,
    Hints,
    GlossMap,
    Object,
    Array,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StructuredValue {
    Sentence(String),
    QuizQuestions(Vec<QuizQuestion>),
    Hints(Vec<HintItem>),
    GlossMap(VocabularyCoverageMap),
    Object(Map<String, Value>),
    Array(Vec<Value>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Literal {
    Array,
    Object,
}

impl Literal {
    fn open(self) -> char {
        match self {
            Literal::Array => '[',
            Literal::Object => '{',
        }
    }

    fn close(self) -> char {
        match self {
            Literal::Array => ']',
            Literal::Object => '}',
        }
    }
}

pub struct ResponseExtractor;

impl ResponseExtractor {
    pub fn extract(raw: &str, shape: ExpectedShape) -> Result<StructuredValue, ExtractionError> {
        match shape {
            ExpectedShape::Sentence => Self::extract_sentence(raw).map(StructuredValue::Sentence),
            ExpectedShape::QuizQuestions => {
                Self::extract_quiz_questions(raw).map(StructuredValue::QuizQuestions)
            }
            ExpectedShape::Hints => Self::extract_hints(raw).map(StructuredValue::Hints),
            ExpectedShape::GlossMap => Self::extract_gloss_map(raw).map(StructuredValue::GlossMap),
            ExpectedShape::Object => match Self::parse_literal(raw, Literal::Object)? {
                Value::Object(map) if map.is_empty() => Err(ExtractionError::Empty),
                Value::Object(map) => Ok(StructuredValue::Object(map)),
                _ => Err(ExtractionError::WrongShape("object")),
            },
            ExpectedShape::Array => match Self::parse_literal(raw, Literal::Array)? {
                Value::Array(items) if items.is_empty() => Err(ExtractionError::Empty),
                Value::Array(items) => Ok(StructuredValue::Array(items)),
                _ => Err(ExtractionError::WrongShape("array")),
            },
        }
    }

    /// First sentence of the first non-empty line, without labels or quotes.
    pub fn extract_sentence(raw: &str) -> Result<String, ExtractionError> {
        let text = strip_code_fences(raw);
        let line = text
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .ok_or(ExtractionError::Blank)?;

        let line = LIST_MARKER_REGEX.replace(line, "");
        let line = SENTENCE_LABEL_REGEX.replace(&line, "");
        let line = SEED_ECHO_REGEX.replace_all(&line, "");
        let line = line
            .trim()
            .trim_matches(|c: char| matches!(c, '"' | '“' | '”' | '\'' | '«' | '»' | '*' | '`'))
            .trim();

        let sentence = first_sentence(line);
        if sentence.is_empty() {
            return Err(ExtractionError::Blank);
        }
        Ok(sentence.to_string())
    }

    pub fn extract_quiz_questions(raw: &str) -> Result<Vec<QuizQuestion>, ExtractionError> {
        let items = Self::parse_array(raw)?;
        let questions: Vec<QuizQuestion> = items.iter().filter_map(coerce_quiz_question).collect();

        if questions.is_empty() {
            log::debug!("Dropped all {} quiz elements as malformed", items.len());
            return Err(ExtractionError::WrongShape("quiz question objects"));
        }
        if questions.len() < items.len() {
            log::debug!(
                "Dropped {} malformed quiz elements",
                items.len() - questions.len()
            );
        }
        Ok(questions)
    }

    /// Hints from a JSON array, or from `key: value` lines when no usable
    /// array can be read. An empty array is final.
    pub fn extract_hints(raw: &str) -> Result<Vec<HintItem>, ExtractionError> {
        let err = match Self::parse_array(raw) {
            Ok(items) => {
                let hints: Vec<HintItem> = items.iter().filter_map(coerce_hint).collect();
                if !hints.is_empty() {
                    return Ok(hints);
                }
                ExtractionError::WrongShape("hint objects")
            }
            Err(err @ (ExtractionError::Empty | ExtractionError::Blank)) => return Err(err),
            Err(err) => err,
        };

        let hints = hints_from_lines(raw);
        if hints.is_empty() {
            return Err(err);
        }
        log::debug!("Hints read line by line after {}", err);
        Ok(hints)
    }

    pub fn extract_gloss_map(raw: &str) -> Result<VocabularyCoverageMap, ExtractionError> {
        let value = Self::parse_literal(raw, Literal::Object)?;
        let glosses = coerce_gloss_map(&value);
        if glosses.is_empty() {
            return Err(ExtractionError::Empty);
        }
        Ok(glosses)
    }

    /// First object literal, deserialized into `T`.
    pub fn extract_object<T: DeserializeOwned>(raw: &str) -> Result<T, ExtractionError> {
        match Self::parse_literal(raw, Literal::Object)? {
            Value::Object(map) if map.is_empty() => Err(ExtractionError::Empty),
            value => serde_json::from_value(value)
                .map_err(|e| ExtractionError::Malformed(e.to_string())),
        }
    }

    /// Array elements that deserialize into `T`; the rest are dropped.
    pub fn extract_array<T: DeserializeOwned>(raw: &str) -> Result<Vec<T>, ExtractionError> {
        let items = Self::parse_array(raw)?;
        let records: Vec<T> = items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect();

        if records.is_empty() {
            return Err(ExtractionError::WrongShape("records"));
        }
        Ok(records)
    }

    fn parse_array(raw: &str) -> Result<Vec<Value>, ExtractionError> {
        match Self::parse_literal(raw, Literal::Array)? {
            Value::Array(items) if items.is_empty() => Err(ExtractionError::Empty),
            Value::Array(items) => Ok(items),
            _ => Err(ExtractionError::WrongShape("array")),
        }
    }

    fn parse_literal(raw: &str, literal: Literal) -> Result<Value, ExtractionError> {
        if raw.trim().is_empty() {
            return Err(ExtractionError::Blank);
        }

        let text = strip_code_fences(raw);
        let candidates = balanced_literals(&text, literal);
        let mut first_error: Option<String> = None;

        for candidate in &candidates {
            match serde_json::from_str::<Value>(candidate) {
                Ok(value) => return Ok(value),
                Err(e) => {
                    first_error.get_or_insert_with(|| e.to_string());
                }
            }
        }

        let mut permissive: Vec<String> = candidates.iter().map(|c| relax_json(c)).collect();
        if let Some(span) = greedy_span(&text, literal) {
            permissive.push(relax_json(span));
        }

        if permissive.is_empty() {
            return Err(ExtractionError::NoStructuredLiteral);
        }

        for candidate in &permissive {
            if let Ok(value) = serde_json::from_str::<Value>(candidate) {
                log::debug!("Recovered {:?} literal with permissive parse", literal);
                return Ok(value);
            }
        }

        Err(ExtractionError::Malformed(
            first_error.unwrap_or_else(|| "unbalanced brackets".to_string()),
        ))
    }
}

fn strip_code_fences(raw: &str) -> String {
    CODE_FENCE_REGEX.replace_all(raw, "").into_owned()
}

/// Every top-level balanced literal of the requested kind, in order.
fn balanced_literals(text: &str, literal: Literal) -> Vec<&str> {
    let mut spans = Vec::new();
    let mut from = 0;

    while let Some(offset) = text[from..].find(literal.open()) {
        let start = from + offset;
        match balanced_len(&text[start..]) {
            Some(len) => {
                spans.push(&text[start..start + len]);
                from = start + len;
            }
            None => from = start + literal.open().len_utf8(),
        }
    }
    spans
}

/// Byte length of the balanced literal at the start of `s`, honouring JSON
/// strings and escapes.
fn balanced_len(s: &str) -> Option<usize> {
    let mut closers: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in s.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '[' => closers.push(']'),
            '{' => closers.push('}'),
            ']' | '}' => {
                if closers.pop() != Some(ch) {
                    return None;
                }
                if closers.is_empty() {
                    return Some(idx + ch.len_utf8());
                }
            }
            _ => {}
        }
    }
    None
}

fn greedy_span(text: &str, literal: Literal) -> Option<&str> {
    let start = text.find(literal.open())?;
    let end = text.rfind(literal.close())?;
    (end > start).then(|| &text[start..=end])
}

fn relax_json(candidate: &str) -> String {
    let normalized = candidate.replace(['“', '”', '„'], "\"");
    let normalized = SINGLE_QUOTED_KEY_REGEX.replace_all(&normalized, "$1\"$2\":");
    let normalized = SINGLE_QUOTED_VALUE_REGEX.replace_all(&normalized, ": \"$1\"$2");
    TRAILING_COMMA_REGEX
        .replace_all(&normalized, "$1")
        .into_owned()
}

fn first_sentence(line: &str) -> &str {
    let mut chars = line.char_indices().peekable();
    while let Some((idx, ch)) = chars.next() {
        if matches!(ch, '.' | '?' | '!' | '…') {
            let at_boundary = match chars.peek() {
                None => true,
                Some((_, next)) => next.is_whitespace(),
            };
            if at_boundary {
                return line[..idx + ch.len_utf8()].trim();
            }
        }
    }
    line.trim()
}

fn pick<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| obj.get(*key)).filter(|v| !v.is_null())
}

fn pick_str(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match obj.get(*key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn coerce_quiz_question(value: &Value) -> Option<QuizQuestion> {
    let obj = value.as_object()?;
    let question = pick_str(obj, &["question", "q", "prompt", "title"])?;
    let options = pick(obj, &["options", "choices"]).and_then(coerce_options)?;
    let answer = pick(obj, &["answer", "answer_index", "correct", "correct_answer"])
        .and_then(|v| coerce_answer(v, &options))?;

    Some(QuizQuestion {
        question,
        options,
        answer,
        explain: pick_str(obj, &["explain", "explanation", "reason"]).unwrap_or_default(),
        evidence: pick_str(obj, &["evidence", "quote"]),
    })
}

fn coerce_options(value: &Value) -> Option<Vec<String>> {
    let raw: Vec<String> = match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                Value::Object(obj) => pick_str(obj, &["text", "option", "value"]),
                _ => None,
            })
            .collect(),
        // {"A": "...", "B": "..."}; keys sort into option order.
        Value::Object(obj) => {
            let ordered: BTreeMap<&String, &Value> = obj.iter().collect();
            ordered
                .values()
                .filter_map(|v| v.as_str().map(|s| s.trim().to_string()))
                .collect()
        }
        _ => return None,
    };

    if raw.is_empty() {
        return None;
    }
    Some(strip_option_labels(raw))
}

/// Drops "A. " style prefixes, but only when every option carries the label
/// matching its position.
fn strip_option_labels(options: Vec<String>) -> Vec<String> {
    let labelled = options.iter().enumerate().all(|(idx, option)| {
        OPTION_LABEL_REGEX
            .captures(option)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().chars().next())
            .map(|letter| letter.to_ascii_uppercase() as usize == 'A' as usize + idx)
            .unwrap_or(false)
    });

    if !labelled {
        return options;
    }
    options
        .into_iter()
        .map(|option| OPTION_LABEL_REGEX.replace(&option, "").trim().to_string())
        .collect()
}

fn coerce_answer(value: &Value, options: &[String]) -> Option<usize> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64))
            .map(|n| n as usize),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(index) = s.parse::<usize>() {
                return Some(index);
            }
            if let Some(index) = options.iter().position(|option| option.eq_ignore_ascii_case(s)) {
                return Some(index);
            }
            let label = s.trim_end_matches(['.', ')', ':']).trim();
            let mut letters = label.chars();
            match (letters.next(), letters.next()) {
                (Some(letter), None) if letter.is_ascii_alphabetic() => {
                    let index = letter.to_ascii_uppercase() as usize - 'A' as usize;
                    (index < options.len()).then_some(index)
                }
                _ => None,
            }
        }
        _ => None,
    }
}

fn coerce_hint(value: &Value) -> Option<HintItem> {
    let obj = match value {
        Value::String(s) if !s.trim().is_empty() => return Some(HintItem::info(s.trim())),
        Value::Object(obj) => obj,
        _ => return None,
    };

    let gloss = pick_str(obj, &["gloss", "vi", "meaning", "explanation"]);

    if let Some(word) = pick_str(obj, &["word", "vocabulary", "phrase", "term"]) {
        return Some(HintItem::Vocabulary {
            word,
            part_of_speech: pick_str(obj, &["part_of_speech", "pos", "type"]),
            pronunciation: pick_str(obj, &["pronunciation", "ipa", "phonetic"]),
            gloss: gloss.unwrap_or_default(),
        });
    }
    if let Some(pattern) = pick_str(obj, &["grammar_pattern", "grammar", "structure", "pattern"]) {
        return Some(HintItem::Grammar {
            grammar_pattern: pattern,
            gloss: gloss.unwrap_or_default(),
        });
    }
    pick_str(obj, &["info", "note", "tip"])
        .or(gloss)
        .map(|info| HintItem::Info { info })
}

/// Accepts `{"word": "gloss"}`, `{"word": {"gloss": ...}}` and
/// `{"vocabulary": [{"word": ..., "gloss": ...}]}` forms.
pub fn coerce_gloss_map(value: &Value) -> VocabularyCoverageMap {
    let mut glosses = VocabularyCoverageMap::new();

    match value {
        Value::Object(obj) => {
            if let Some(nested) = obj.get("vocabulary").or_else(|| obj.get("glossary")) {
                return coerce_gloss_map(nested);
            }
            for (word, gloss) in obj {
                let gloss = match gloss {
                    Value::String(s) => Some(s.trim().to_string()),
                    Value::Object(inner) => pick_str(inner, &["gloss", "vi", "meaning"]),
                    _ => None,
                };
                insert_gloss(&mut glosses, word, gloss);
            }
        }
        Value::Array(items) => {
            for item in items.iter().filter_map(Value::as_object) {
                if let Some(word) = pick_str(item, &["word", "term"]) {
                    insert_gloss(&mut glosses, &word, pick_str(item, &["gloss", "vi", "meaning"]));
                }
            }
        }
        _ => {}
    }
    glosses
}

fn insert_gloss(glosses: &mut VocabularyCoverageMap, word: &str, gloss: Option<String>) {
    let word = word.trim().to_lowercase();
    if let Some(gloss) = gloss.filter(|g| !g.is_empty()) {
        if !word.is_empty() {
            glosses.insert(word, gloss);
        }
    }
}

fn hints_from_lines(raw: &str) -> Vec<HintItem> {
    strip_code_fences(raw)
        .lines()
        .map(clean_line)
        .filter(|line| !line.is_empty())
        .map(|line| classify_line(&line))
        .collect()
}

fn clean_line(line: &str) -> String {
    let trimmed = line.trim().trim_matches(|c: char| matches!(c, '-' | '•' | '*' | ' '));
    LIST_MARKER_REGEX.replace(trimmed, "").trim().to_string()
}

fn classify_line(line: &str) -> HintItem {
    let Some((key, value)) = line.split_once(':') else {
        return HintItem::info(line);
    };

    let key = key.trim().trim_matches('*').trim().to_lowercase();
    let value = value.trim();
    if value.is_empty() {
        return HintItem::info(line);
    }

    if VOCABULARY_KEYS.contains(&key.as_str()) {
        let (word, gloss) = split_gloss(value);
        HintItem::vocabulary(word, gloss)
    } else if GRAMMAR_KEYS.contains(&key.as_str()) {
        let (pattern, gloss) = split_gloss(value);
        HintItem::grammar(pattern, gloss)
    } else {
        HintItem::info(line)
    }
}

/// Splits "hotel - khách sạn" into its term and gloss. Without a separator
/// the value serves as both.
fn split_gloss(value: &str) -> (&str, &str) {
    [" - ", " – ", " — ", " = ", " → ", " -> "]
        .iter()
        .find_map(|sep| value.split_once(sep))
        .map(|(term, gloss)| (term.trim(), gloss.trim()))
        .filter(|(term, gloss)| !term.is_empty() && !gloss.is_empty())
        .unwrap_or((value, value))
}
