use actix_web::{get, post, web, HttpResponse};

use crate::{
    app_state::AppState, auth::AuthenticatedUser, errors::AppError,
    models::dto::request::SubmitQuizRequest,
};

#[post("/quiz/{code}/submit")]
async fn submit_quiz(
    state: web::Data<AppState>,
    code: web::Path<String>,
    request: web::Json<SubmitQuizRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let result = state
        .submission_service
        .submit(&auth.0, &code, request.into_inner().answers)
        .await?;
    Ok(HttpResponse::Ok().json(result))
}

#[get("/student/submissions")]
async fn student_submissions(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let submissions = state.submission_service.student_submissions(&auth.0).await?;
    Ok(HttpResponse::Ok().json(submissions))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(submit_quiz).service(student_submissions);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        auth::{cookie::SESSION_COOKIE, AuthMiddleware},
        handlers::quiz_handler,
        models::domain::User,
        services::{google_oauth::MockOAuthProvider, quiz_generator::MockQuizGenerator},
        test_utils::{fixtures, test_state},
    };
    use actix_web::{cookie::Cookie, http::StatusCode, test, App};
    use serde_json::{json, Value};

    macro_rules! api_app {
        ($state:expr) => {
            test::init_service(
                App::new().app_data(web::Data::new($state)).service(
                    web::scope("/api")
                        .wrap(AuthMiddleware)
                        .configure(quiz_handler::configure)
                        .configure(configure),
                ),
            )
            .await
        };
    }

    fn session(state: &AppState, user: &User) -> Cookie<'static> {
        Cookie::new(SESSION_COOKIE, state.session_service.issue(user).unwrap())
    }

    #[actix_web::test]
    async fn test_submit_then_history_then_results() {
        let mut generator = MockQuizGenerator::new();
        generator
            .expect_generate()
            .returning(|_| Ok(fixtures::questions()));
        let state = test_state(generator, MockOAuthProvider::new());
        let teacher_cookie = session(&state, &User::test_teacher("Ada"));
        let student_cookie = session(&state, &User::test_student("Sam"));
        let app = api_app!(state);

        let req = test::TestRequest::post()
            .uri("/api/generate-quiz")
            .cookie(teacher_cookie.clone())
            .set_json(json!({ "topic": "Rivers", "difficulty": "hard" }))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        let code = created["shareableCode"].as_str().unwrap().to_string();

        let req = test::TestRequest::post()
            .uri(&format!("/api/quiz/{}/submit", code))
            .cookie(student_cookie.clone())
            .set_json(json!({ "answers": ["a", "B", "a"] }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let result: Value = test::read_body_json(resp).await;
        assert_eq!(
            result,
            json!({ "score": 2, "total": 3, "percentage": 67, "xpEarned": 40 })
        );

        // Second attempt and a revisit are both refused.
        let req = test::TestRequest::post()
            .uri(&format!("/api/quiz/{}/submit", code))
            .cookie(student_cookie.clone())
            .set_json(json!({ "answers": ["a", "b", "c"] }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["alreadySubmitted"], true);

        let req = test::TestRequest::get()
            .uri(&format!("/api/quiz/{}", code))
            .cookie(student_cookie.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::get()
            .uri("/api/student/submissions")
            .cookie(student_cookie)
            .to_request();
        let history: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(history[0]["quizTopic"], "Rivers");
        assert_eq!(history[0]["quizDifficulty"], "hard");
        assert_eq!(history[0]["totalQuestions"], 3);

        let req = test::TestRequest::get()
            .uri(&format!("/api/quiz/{}/results", code))
            .cookie(teacher_cookie)
            .to_request();
        let results: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(results["totalQuestions"], 3);
        assert_eq!(results["submissions"][0]["studentName"], "Sam");
        assert_eq!(results["submissions"][0]["percentage"], 67);
    }

    #[actix_web::test]
    async fn test_results_denied_to_other_teacher() {
        let mut generator = MockQuizGenerator::new();
        generator
            .expect_generate()
            .returning(|_| Ok(fixtures::questions()));
        let state = test_state(generator, MockOAuthProvider::new());
        let owner_cookie = session(&state, &User::test_teacher("Ada"));
        let other_cookie = session(&state, &User::test_teacher("Bob"));
        let app = api_app!(state);

        let req = test::TestRequest::post()
            .uri("/api/generate-quiz")
            .cookie(owner_cookie)
            .set_json(json!({}))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        let code = created["shareableCode"].as_str().unwrap().to_string();

        let req = test::TestRequest::get()
            .uri(&format!("/api/quiz/{}/results", code))
            .cookie(other_cookie)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Access denied");
    }
}
