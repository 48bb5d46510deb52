pub mod health_handler;
pub mod learning_handler;
pub mod practice_handler;

use actix_web::web;

use crate::errors::AppError;

pub use health_handler::health_check;
pub use learning_handler::{generate_quiz, ielts_vocab, listening_prompt, reading_passage};
pub use practice_handler::{chat, translate_hint, translate_next, translate_start};

/// Registers every route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check)
        .service(translate_start)
        .service(translate_next)
        .service(chat)
        .service(translate_hint)
        .service(generate_quiz)
        .service(reading_passage)
        .service(listening_prompt)
        .service(ielts_vocab);
}

/// Malformed JSON bodies become validation errors instead of actix's plain
/// text responses.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(|err, _req| AppError::ValidationError(err.to_string()).into())
}
