use std::time::Duration;

use async_openai::{config::OpenAIConfig, error::OpenAIError, Client};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use schemars::JsonSchema;
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::json;

use crate::{
    config::Config,
    constants::prompts::{quiz_user_prompt, QUIZ_GENERATOR_SYSTEM_PROMPT},
    errors::{AppError, AppResult},
    models::domain::{Difficulty, QuizQuestion},
};

static CODE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```(?i:json)?").expect("CODE_FENCE is a valid regex pattern"));

static GENERATED_QUIZ_SCHEMA: Lazy<String> = Lazy::new(|| {
    serde_json::to_string(&schemars::schema_for!(GeneratedQuiz)).unwrap_or_default()
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizGenerationRequest {
    pub topic: String,
    pub question_count: u32,
    pub difficulty: Difficulty,
}

impl QuizGenerationRequest {
    pub fn temperature(&self) -> f32 {
        match self.difficulty {
            Difficulty::Hard => 0.9,
            _ => 0.7,
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizGenerator: Send + Sync {
    /// Produces validated questions for the request.
    async fn generate(&self, request: &QuizGenerationRequest) -> AppResult<Vec<QuizQuestion>>;
}

/// Shape the model is asked to return.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GeneratedQuiz {
    pub questions: Vec<GeneratedQuestion>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedQuestion {
    pub question: String,
    /// Exactly four answer options.
    pub options: Vec<String>,
    /// Letter of the correct option, "a" to "d".
    pub correct_answer: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

pub struct OpenAiQuizGenerator {
    client: Client<OpenAIConfig>,
    model: String,
    timeout: Duration,
}

impl OpenAiQuizGenerator {
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_base(config.openai_api_base.clone())
            .with_api_key(config.openai_api_key.expose_secret().to_string());

        Self {
            client: Client::with_config(openai_config),
            model: config.openai_model.clone(),
            timeout: Duration::from_secs(config.openai_timeout_seconds),
        }
    }
}

#[async_trait]
impl QuizGenerator for OpenAiQuizGenerator {
    async fn generate(&self, request: &QuizGenerationRequest) -> AppResult<Vec<QuizQuestion>> {
        let body = chat_request_body(&self.model, request);

        log::info!(
            "Requesting {} {} questions on '{}' from {}",
            request.question_count,
            request.difficulty,
            request.topic,
            self.model
        );

        let completion: Result<ChatCompletion, OpenAIError> =
            tokio::time::timeout(self.timeout, self.client.chat().create_byot(body))
                .await
                .map_err(|_| {
                    log::error!("Quiz generation timed out after {:?}", self.timeout);
                    AppError::Upstream("Failed to generate quiz".to_string())
                })?;

        let completion = completion.map_err(|e| {
            log::error!("Quiz generation request failed: {}", e);
            AppError::Upstream("Failed to generate quiz".to_string())
        })?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                log::error!("Quiz generation returned no content");
                AppError::Upstream("Failed to generate quiz".to_string())
            })?;

        parse_generated_quiz(&content)
    }
}

pub fn chat_request_body(model: &str, request: &QuizGenerationRequest) -> serde_json::Value {
    json!({
        "model": model,
        "messages": [
            { "role": "system", "content": QUIZ_GENERATOR_SYSTEM_PROMPT },
            {
                "role": "user",
                "content": quiz_user_prompt(
                    request.question_count,
                    &request.topic,
                    request.difficulty,
                    &GENERATED_QUIZ_SCHEMA,
                ),
            },
        ],
        "temperature": request.temperature(),
    })
}

/// Removes markdown fences and any prose around the outermost JSON object.
fn extract_json(raw: &str) -> &str {
    let trimmed = raw.trim();
    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => &trimmed[start..=end],
        _ => trimmed,
    }
}

/// Parses model output into stored questions, enforcing the question
/// invariants.
pub fn parse_generated_quiz(raw: &str) -> AppResult<Vec<QuizQuestion>> {
    let unfenced = CODE_FENCE.replace_all(raw, "");
    let generated: GeneratedQuiz = serde_json::from_str(extract_json(&unfenced)).map_err(|e| {
        log::error!("Failed to parse AI response: {}", e);
        AppError::Upstream("Failed to parse AI response".to_string())
    })?;

    if generated.questions.is_empty() {
        log::error!("AI response contained no questions");
        return Err(AppError::Upstream("Failed to parse AI response".to_string()));
    }

    generated
        .questions
        .into_iter()
        .enumerate()
        .map(|(index, generated)| {
            let options: Vec<String> = generated
                .options
                .iter()
                .map(|o| o.trim().to_string())
                .collect();
            let correct_answer =
                QuizQuestion::resolve_answer_letter(&options, &generated.correct_answer)
                    .unwrap_or_else(|| generated.correct_answer.trim().to_string());

            let question = QuizQuestion {
                question: generated.question.trim().to_string(),
                options,
                correct_answer,
            };

            question.check().map_err(|reason| {
                log::error!("AI question {} rejected: {}", index + 1, reason);
                AppError::Upstream("Failed to parse AI response".to_string())
            })?;

            Ok(question)
        })
        .collect()
}
