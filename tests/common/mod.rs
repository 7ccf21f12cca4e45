#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;

use quizwhiz_server::{
    app_state::AppState,
    config::Config,
    errors::{AppError, AppResult},
    models::domain::QuizQuestion,
    services::{
        quiz_generator::{parse_generated_quiz, QuizGenerationRequest},
        GoogleProfile, OAuthProvider, QuizGenerator,
    },
    test_utils::InMemoryRepos,
};

pub fn config() -> Config {
    let mut config = Config::test_config();
    config.mongo_db_name = "quizwhiz-integration".to_string();
    config
}

/// App state over `repos` with the canned generator and Google account.
pub fn state(repos: &InMemoryRepos) -> AppState {
    repos.state(
        config(),
        Arc::new(CannedQuizGenerator),
        Arc::new(FixedGoogleAccount::verified()),
    )
}

/// Replies with a fixed model response, run through the real parser.
pub struct CannedQuizGenerator;

pub const CANNED_RESPONSE: &str = r#"```json
{"questions": [
  {"question": "Longest river?", "options": ["Nile", "Amazon", "Yangtze", "Danube"], "correctAnswer": "a"},
  {"question": "River through Paris?", "options": ["Thames", "Seine", "Rhine", "Po"], "correctAnswer": "Seine"},
  {"question": "River through Cairo?", "options": ["Congo", "Niger", "Nile", "Volga"], "correctAnswer": "C"}
]}
```"#;

#[async_trait]
impl QuizGenerator for CannedQuizGenerator {
    async fn generate(&self, request: &QuizGenerationRequest) -> AppResult<Vec<QuizQuestion>> {
        if request.topic == "fail" {
            return Err(AppError::Upstream("Failed to generate quiz".to_string()));
        }
        parse_generated_quiz(CANNED_RESPONSE)
    }
}

/// Accepts the code "good-code" and signs in as grace@example.com.
pub struct FixedGoogleAccount {
    pub email_verified: bool,
}

impl FixedGoogleAccount {
    pub fn verified() -> Self {
        Self {
            email_verified: true,
        }
    }
}

#[async_trait]
impl OAuthProvider for FixedGoogleAccount {
    fn authorize_url(&self) -> AppResult<String> {
        Ok("https://accounts.google.com/o/oauth2/v2/auth?client_id=client-id".to_string())
    }

    async fn exchange_code(&self, code: &str) -> AppResult<GoogleProfile> {
        if code != "good-code" {
            return Err(AppError::Upstream("Failed to exchange OAuth code".to_string()));
        }
        Ok(GoogleProfile {
            id: "google-42".to_string(),
            name: "Grace".to_string(),
            email: "grace@example.com".to_string(),
            email_verified: self.email_verified,
        })
    }
}
