use async_trait::async_trait;
use reqwest::Url;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::{
    config::Config,
    errors::{AppError, AppResult},
};

const AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";
const SCOPES: &str = "openid profile email";

/// The parts of a Google account the app keeps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub email_verified: bool,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OAuthProvider: Send + Sync {
    fn authorize_url(&self) -> AppResult<String>;
    async fn exchange_code(&self, code: &str) -> AppResult<GoogleProfile>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UserInfo {
    sub: String,
    #[serde(default)]
    name: Option<String>,
    email: Option<String>,
    #[serde(default)]
    email_verified: bool,
}

pub struct GoogleOAuthClient {
    http: reqwest::Client,
    client_id: String,
    client_secret: SecretString,
    callback_url: String,
}

impl GoogleOAuthClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            client_id: config.google_client_id.clone(),
            client_secret: config.google_client_secret.clone(),
            callback_url: config.google_callback_url.clone(),
        }
    }

    async fn access_token(&self, code: &str) -> AppResult<SecretString> {
        let response = self
            .http
            .post(TOKEN_URL)
            .header("accept", "application/json")
            .form(&[
                ("code", code),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.expose_secret()),
                ("redirect_uri", self.callback_url.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| {
                log::error!("Failed to send token request to Google: {}", e);
                AppError::Upstream("Failed to exchange OAuth code".to_string())
            })?;

        let status = response.status();
        let token: TokenResponse = response.json().await.map_err(|e| {
            log::error!("Failed to parse Google token response ({}): {}", status, e);
            AppError::Upstream("Failed to exchange OAuth code".to_string())
        })?;

        if let Some(error) = token.error {
            log::error!(
                "Google OAuth error: {} - {}",
                error,
                token.error_description.as_deref().unwrap_or("Unknown error")
            );
            return Err(AppError::Upstream("Failed to exchange OAuth code".to_string()));
        }

        token.access_token.map(SecretString::from).ok_or_else(|| {
            log::error!("No access_token in Google response ({})", status);
            AppError::Upstream("Failed to exchange OAuth code".to_string())
        })
    }
}

#[async_trait]
impl OAuthProvider for GoogleOAuthClient {
    fn authorize_url(&self) -> AppResult<String> {
        let url = Url::parse_with_params(
            AUTHORIZE_URL,
            &[
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.callback_url.as_str()),
                ("response_type", "code"),
                ("scope", SCOPES),
            ],
        )
        .map_err(|e| AppError::InternalError(format!("Failed to build Google URL: {}", e)))?;

        Ok(url.to_string())
    }

    async fn exchange_code(&self, code: &str) -> AppResult<GoogleProfile> {
        let access_token = self.access_token(code).await?;

        let info: UserInfo = self
            .http
            .get(USERINFO_URL)
            .bearer_auth(access_token.expose_secret())
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| {
                log::error!("Failed to fetch Google profile: {}", e);
                AppError::Upstream("Failed to fetch Google profile".to_string())
            })?
            .json()
            .await
            .map_err(|e| {
                log::error!("Failed to parse Google profile: {}", e);
                AppError::Upstream("Failed to fetch Google profile".to_string())
            })?;

        profile_from_userinfo(info)
    }
}

fn profile_from_userinfo(info: UserInfo) -> AppResult<GoogleProfile> {
    let email = info
        .email
        .filter(|e| !e.trim().is_empty())
        .ok_or_else(|| AppError::Upstream("Google profile has no email".to_string()))?;

    // Fall back to the mailbox name when the account has no display name.
    let name = info
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| email.split('@').next().unwrap_or_default().to_string());

    Ok(GoogleProfile {
        id: info.sub,
        name,
        email,
        email_verified: info.email_verified,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorize_url_carries_client_and_scopes() {
        let client = GoogleOAuthClient::new(&Config::test_config());
        let url = Url::parse(&client.authorize_url().unwrap()).unwrap();

        assert_eq!(url.host_str(), Some("accounts.google.com"));
        let params: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(params.contains(&("client_id".to_string(), "google-client-id".to_string())));
        assert!(params.contains(&("response_type".to_string(), "code".to_string())));
        assert!(params.contains(&("scope".to_string(), "openid profile email".to_string())));
        assert!(params.contains(&(
            "redirect_uri".to_string(),
            "http://localhost:5000/api/auth/google/callback".to_string()
        )));
    }

    #[test]
    fn test_profile_from_userinfo() {
        let info: UserInfo = serde_json::from_str(
            r#"{"sub": "1234", "name": "Grace Hopper", "email": "grace@example.com", "email_verified": true}"#,
        )
        .unwrap();

        let profile = profile_from_userinfo(info).unwrap();
        assert_eq!(profile.id, "1234");
        assert_eq!(profile.name, "Grace Hopper");
        assert!(profile.email_verified);
    }

    #[test]
    fn test_profile_without_name_uses_mailbox() {
        let info: UserInfo =
            serde_json::from_str(r#"{"sub": "1", "email": "grace@example.com"}"#).unwrap();
        let profile = profile_from_userinfo(info).unwrap();
        assert_eq!(profile.name, "grace");
        assert!(!profile.email_verified);
    }

    #[test]
    fn test_profile_without_email_is_rejected() {
        let info: UserInfo = serde_json::from_str(r#"{"sub": "1", "name": "Nobody"}"#).unwrap();
        assert!(profile_from_userinfo(info).is_err());
    }
}
