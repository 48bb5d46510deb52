use std::sync::Arc;

use actix_web::{post, web, HttpRequest, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    errors::AppError,
    middleware::get_request_id,
    models::dto::{
        request::{ChatRequest, HintRequest, TranslateNextRequest, TranslateStartRequest},
        response::{ChatResponse, HintResponse, TranslateResponse},
    },
};

#[post("/translate/start")]
pub async fn translate_start(
    req: HttpRequest,
    state: web::Data<Arc<AppState>>,
    request: web::Json<TranslateStartRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;
    log::info!(
        "[{}] translate/start topic={} level={} history={}",
        get_request_id(&req).unwrap_or_default(),
        request.topic,
        request.level,
        request.prev_history.len()
    );

    let generated = state
        .practice_service
        .start_sentence(
            &request.topic,
            &request.level,
            &request.prev_history,
            &request.paragraph,
        )
        .await;
    Ok(HttpResponse::Ok().json(TranslateResponse::from(generated)))
}

#[post("/translate/next")]
pub async fn translate_next(
    req: HttpRequest,
    state: web::Data<Arc<AppState>>,
    request: web::Json<TranslateNextRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;
    log::info!(
        "[{}] translate/next topic={} level={}",
        get_request_id(&req).unwrap_or_default(),
        request.topic,
        request.level
    );

    let generated = state
        .practice_service
        .next_turn(
            &request.topic,
            &request.level,
            &request.prev_history,
            &request.user_answer,
        )
        .await;
    Ok(HttpResponse::Ok().json(TranslateResponse::from(generated)))
}

#[post("/chat")]
pub async fn chat(
    state: web::Data<Arc<AppState>>,
    request: web::Json<ChatRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let generated = state.practice_service.chat_correction(&request.message).await;
    Ok(HttpResponse::Ok().json(ChatResponse::from(generated)))
}

#[post("/translate/hint")]
pub async fn translate_hint(
    state: web::Data<Arc<AppState>>,
    request: web::Json<HintRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let generated = state.practice_service.hints(&request.vi_sentence).await;
    Ok(HttpResponse::Ok().json(HintResponse::from(generated)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};

    use crate::{
        constants::content_pool::NO_DATA_SENTINEL,
        handlers::json_config,
        services::generation_client::{FailureCause, GenerationFailed},
        test_utils::{
            stubs::{state_with, ScriptedClient},
            test_helpers::{assert_error_status, assert_success_status},
        },
    };

    fn down() -> ScriptedClient {
        ScriptedClient::new(vec![
            Err(GenerationFailed::new(FailureCause::Transport, "down")),
            Err(GenerationFailed::new(FailureCause::Transport, "down")),
        ])
    }

    #[actix_web::test]
    async fn start_returns_generated_sentence() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(ScriptedClient::replying(
                    "Tôi thích ăn phở.",
                ))))
                .app_data(json_config())
                .service(translate_start),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/translate/start")
            .set_json(serde_json::json!({"topic": "food", "level": "easy"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_success_status(resp.status());

        let body: TranslateResponse = test::read_body_json(resp).await;
        assert_eq!(body.vi_sentence, "Tôi thích ăn phở.");
        assert!(body.feedback.is_none());
    }

    #[actix_web::test]
    async fn start_with_unknown_topic_and_no_service_returns_sentinel() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(down())))
                .service(translate_start),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/translate/start")
            .set_json(serde_json::json!({"topic": "astronomy", "level": "easy", "prev_history": []}))
            .to_request();
        let body: TranslateResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body.vi_sentence, NO_DATA_SENTINEL);
    }

    #[actix_web::test]
    async fn invalid_request_is_rejected_before_generation() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(ScriptedClient::new(vec![]))))
                .app_data(json_config())
                .service(translate_start)
                .service(chat),
        )
        .await;

        let empty_topic = test::TestRequest::post()
            .uri("/translate/start")
            .set_json(serde_json::json!({"topic": "", "level": "easy"}))
            .to_request();
        let resp = test::call_service(&app, empty_topic).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);

        let missing_field = test::TestRequest::post()
            .uri("/chat")
            .set_json(serde_json::json!({}))
            .to_request();
        let resp = test::call_service(&app, missing_field).await;
        assert_error_status(resp.status());
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["kind"], "VALIDATION_ERROR");
    }

    #[actix_web::test]
    async fn next_returns_feedback_and_next_sentence() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(ScriptedClient::replying(
                    r#"{"user_answer": "I go school", "correct_answer": "I go to school.", "score": 7, "explanation": "Thiếu 'to'."}"#,
                ))))
                .service(translate_next),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/translate/next")
            .set_json(serde_json::json!({
                "topic": "school",
                "level": "easy",
                "prev_history": ["Tôi đi học bằng xe đạp."],
                "user_answer": "I go school"
            }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["feedback"]["score"], 7.0);
        assert_ne!(body["vi_sentence"], "Tôi đi học bằng xe đạp.");
        assert_eq!(body["status"]["source"], "generated");
    }

    #[actix_web::test]
    async fn hint_for_blank_sentence_is_fixed_info() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(ScriptedClient::new(vec![]))))
                .service(translate_hint),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/translate/hint")
            .set_json(serde_json::json!({"vi_sentence": "  "}))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["hints"], serde_json::json!([{"info": "Không có câu để gợi ý."}]));
    }

    #[actix_web::test]
    async fn chat_outage_returns_empty_reply() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(down())))
                .service(chat),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/chat")
            .set_json(serde_json::json!({"message": "I has a cat"}))
            .to_request();
        let body: ChatResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body.reply, "");
        assert_eq!(body.status.attempts, 2);
    }
}
