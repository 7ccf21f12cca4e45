use serde::Deserialize;
use validator::Validate;

use crate::models::domain::Difficulty;

pub const DEFAULT_TOPIC: &str = "general knowledge";
pub const DEFAULT_QUESTION_COUNT: u32 = 5;
pub const MAX_QUESTION_COUNT: u32 = 20;

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(max = 100))]
    pub name: String,

    #[serde(default)]
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 6, max = 128, message = "Password must be at least 6 characters"))]
    pub password: String,

    #[serde(default)]
    pub role: String,
}

impl RegisterRequest {
    pub fn has_missing_fields(&self) -> bool {
        [&self.name, &self.email, &self.password, &self.role]
            .iter()
            .any(|field| field.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub password: String,

    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuizRequest {
    #[validate(length(max = 200))]
    pub topic: Option<String>,

    #[validate(range(min = 1, max = 20))]
    pub num_questions: Option<u32>,

    pub difficulty: Option<Difficulty>,
}

impl GenerateQuizRequest {
    pub fn topic(&self) -> String {
        self.topic
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_TOPIC)
            .to_string()
    }

    pub fn num_questions(&self) -> u32 {
        self.num_questions
            .unwrap_or(DEFAULT_QUESTION_COUNT)
            .min(MAX_QUESTION_COUNT)
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty.unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitQuizRequest {
    pub answers: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OAuthCallbackParams {
    pub code: Option<String>,
    pub error: Option<String>,
}
