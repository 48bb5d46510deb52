use std::sync::Arc;

use actix_web::{post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::{
        request::{IeltsVocabRequest, ListeningRequest, PassageRequest, QuizRequest},
        response::{IeltsVocabResponse, ListeningResponse, PassageResponse, QuizResponse},
    },
};

#[post("/quiz/generate")]
pub async fn generate_quiz(
    state: web::Data<Arc<AppState>>,
    request: web::Json<QuizRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let generated = state
        .practice_service
        .generate_quiz(
            &request.topic,
            &request.level,
            request.count,
            request.passage.as_deref(),
        )
        .await;
    Ok(HttpResponse::Ok().json(QuizResponse::from(generated)))
}

#[post("/reading/passage")]
pub async fn reading_passage(
    state: web::Data<Arc<AppState>>,
    request: web::Json<PassageRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let generated = state.practice_service.generate_passage(&request.level).await;
    Ok(HttpResponse::Ok().json(PassageResponse::from(generated)))
}

#[post("/listening/prompt")]
pub async fn listening_prompt(
    state: web::Data<Arc<AppState>>,
    request: web::Json<ListeningRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let generated = state
        .practice_service
        .listening_prompt(&request.topic, &request.band)
        .await;
    Ok(HttpResponse::Ok().json(ListeningResponse::from(generated)))
}

#[post("/ielts/vocab")]
pub async fn ielts_vocab(
    state: web::Data<Arc<AppState>>,
    request: web::Json<IeltsVocabRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let generated = state
        .practice_service
        .ielts_vocab(&request.passage, request.level.as_deref())
        .await;
    Ok(HttpResponse::Ok().json(IeltsVocabResponse::from(generated)))
}
