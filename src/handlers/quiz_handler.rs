use actix_web::{get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::{
        request::GenerateQuizRequest,
        response::{GeneratedQuizResponse, StudentQuizResponse},
    },
};

#[post("/generate-quiz")]
async fn generate_quiz(
    state: web::Data<AppState>,
    request: web::Json<GenerateQuizRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let quiz = state
        .quiz_service
        .generate_quiz(&auth.0, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(GeneratedQuizResponse::from(quiz)))
}

#[get("/teacher/quizzes")]
async fn teacher_quizzes(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let quizzes = state.quiz_service.teacher_quizzes(&auth.0).await?;
    Ok(HttpResponse::Ok().json(quizzes))
}

#[get("/quiz/{code}")]
async fn get_quiz_by_code(
    state: web::Data<AppState>,
    code: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let quiz = state.quiz_service.get_for_participant(&auth.0, &code).await?;
    Ok(HttpResponse::Ok().json(StudentQuizResponse::from(quiz)))
}

#[get("/quiz/{code}/results")]
async fn quiz_results(
    state: web::Data<AppState>,
    code: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let results = state.quiz_service.quiz_results(&auth.0, &code).await?;
    Ok(HttpResponse::Ok().json(results))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(generate_quiz)
        .service(teacher_quizzes)
        .service(get_quiz_by_code)
        .service(quiz_results);
}
