pub mod feedback;
pub mod hint;
pub mod listening;
pub mod practice;
pub mod quiz_question;
pub mod reading;
pub mod vocabulary;

pub use feedback::{Feedback, FeedbackRecord, Score};
pub use hint::HintItem;
pub use listening::ListeningPrompt;
pub use practice::{BilingualPair, PracticeItem};
pub use quiz_question::QuizQuestion;
pub use reading::ReadingPassage;
pub use vocabulary::{CoverageReport, VocabEntry, VocabularyCoverageMap};

use thiserror::Error;

/// A parsed value that does not satisfy its entity's structural invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeViolation {
    #[error("missing or empty field '{0}'")]
    MissingField(&'static str),

    #[error("answer index {answer} out of range for {options} options")]
    AnswerOutOfRange { answer: usize, options: usize },

    #[error("option text is blank")]
    BlankOption,

    #[error("sentence already appears in the session history")]
    RepeatsHistory,
}
