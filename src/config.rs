use std::env;

use secrecy::{ExposeSecret, SecretString};

use crate::errors::{AppError, AppResult};

const DEV_JWT_SECRET: &str = "dev_secret_key_change_in_production";

#[derive(Clone, Debug)]
pub struct Config {
    pub mongo_conn_string: String,
    pub mongo_db_name: String,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub production: bool,
    pub client_url: String,
    pub allowed_origins: Vec<String>,
    pub jwt_secret: SecretString,
    pub jwt_expiration_hours: i64,
    pub google_client_id: String,
    pub google_client_secret: SecretString,
    pub google_callback_url: String,
    pub openai_api_key: SecretString,
    pub openai_api_base: String,
    pub openai_model: String,
    pub openai_timeout_seconds: u64,
}

impl Config {
    pub fn from_env() -> Self {
        let production = env::var("APP_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        let client_url = env::var("CLIENT_URL").unwrap_or_else(|_| {
            if production {
                "https://quiz-whiz-sandy.vercel.app".to_string()
            } else {
                "http://localhost:5173".to_string()
            }
        });

        Self {
            mongo_conn_string: env::var("MONGO_CONN_STRING")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            mongo_db_name: env::var("MONGO_DB_NAME")
                .unwrap_or_else(|_| "quizwhiz-local".to_string()),
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            production,
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .map(|list| parse_origins(&list))
                .unwrap_or_else(|_| {
                    vec![
                        "http://localhost:5173".to_string(),
                        "http://localhost:3000".to_string(),
                        client_url.clone(),
                    ]
                }),
            client_url,
            jwt_secret: SecretString::from(
                env::var("JWT_SECRET").unwrap_or_else(|_| DEV_JWT_SECRET.to_string()),
            ),
            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or(24 * 7),
            google_client_id: env::var("GOOGLE_CLIENT_ID").unwrap_or_default(),
            google_client_secret: SecretString::from(
                env::var("GOOGLE_CLIENT_SECRET").unwrap_or_default(),
            ),
            google_callback_url: env::var("GOOGLE_CALLBACK_URL").unwrap_or_else(|_| {
                "http://localhost:5000/api/auth/google/callback".to_string()
            }),
            openai_api_key: SecretString::from(env::var("OPENAI_API_KEY").unwrap_or_default()),
            openai_api_base: env::var("OPENAI_API_BASE")
                .unwrap_or_else(|_| "https://models.github.ai/inference".to_string()),
            openai_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            openai_timeout_seconds: env::var("OPENAI_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(60),
        }
    }

    /// Rejects development defaults when running in production.
    pub fn validate_for_production(&self) -> AppResult<()> {
        if !self.production {
            return Ok(());
        }

        let jwt_secret = self.jwt_secret.expose_secret();
        if jwt_secret == DEV_JWT_SECRET {
            return Err(AppError::InternalError(
                "JWT_SECRET is using the development default".to_string(),
            ));
        }
        if jwt_secret.len() < 32 {
            return Err(AppError::InternalError(format!(
                "JWT_SECRET is too short ({}), must be at least 32 characters",
                jwt_secret.len()
            )));
        }
        if self.openai_api_key.expose_secret().is_empty() {
            return Err(AppError::InternalError("OPENAI_API_KEY is not set".to_string()));
        }
        if self.google_client_id.is_empty() {
            log::warn!("GOOGLE_CLIENT_ID is not set, Google login will fail");
        }

        Ok(())
    }

    pub fn session_max_age_seconds(&self) -> i64 {
        self.jwt_expiration_hours * 60 * 60
    }

    #[cfg(any(test, feature = "test-utils"))]
    pub fn test_config() -> Self {
        Self {
            mongo_conn_string: "mongodb://localhost:27017".to_string(),
            mongo_db_name: "quizwhiz-test".to_string(),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 5000,
            production: false,
            client_url: "http://localhost:5173".to_string(),
            allowed_origins: vec!["http://localhost:5173".to_string()],
            jwt_secret: SecretString::from("test_jwt_secret_key".to_string()),
            jwt_expiration_hours: 1,
            google_client_id: "google-client-id".to_string(),
            google_client_secret: SecretString::from("google-client-secret".to_string()),
            google_callback_url: "http://localhost:5000/api/auth/google/callback".to_string(),
            openai_api_key: SecretString::from("test-openai-key".to_string()),
            openai_api_base: "http://localhost:9999".to_string(),
            openai_model: "gpt-4o-mini".to_string(),
            openai_timeout_seconds: 5,
        }
    }
}

fn parse_origins(list: &str) -> Vec<String> {
    list.split(',')
        .map(|origin| origin.trim().trim_end_matches('/'))
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env_with_defaults() {
        let config = Config::from_env();

        assert!(!config.mongo_conn_string.is_empty());
        assert!(!config.mongo_db_name.is_empty());
        assert!(!config.openai_model.is_empty());
    }

    #[test]
    fn test_test_config() {
        let config = Config::test_config();

        assert_eq!(config.mongo_db_name, "quizwhiz-test");
        assert!(!config.production);
        assert_eq!(config.session_max_age_seconds(), 3600);
    }

    #[test]
    fn test_parse_origins_trims_and_skips_blanks() {
        let origins = parse_origins(" https://a.example/ ,, http://localhost:5173");
        assert_eq!(origins, vec!["https://a.example", "http://localhost:5173"]);
    }

    #[test]
    fn test_validate_skipped_outside_production() {
        let config = Config::test_config();
        assert!(config.validate_for_production().is_ok());
    }

    #[test]
    fn test_validate_rejects_short_secret_in_production() {
        let mut config = Config::test_config();
        config.production = true;
        assert!(config.validate_for_production().is_err());

        config.jwt_secret = SecretString::from("x".repeat(40));
        assert!(config.validate_for_production().is_ok());

        config.openai_api_key = SecretString::from(String::new());
        assert!(config.validate_for_production().is_err());
    }
}
