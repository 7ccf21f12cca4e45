use std::sync::Arc;

use crate::{
    auth::{Claims, JwtService},
    errors::{AppError, AppResult},
    models::domain::{revoked_token::hash_token, RevokedToken, User},
    repositories::RevokedTokenRepository,
};

/// Issues, checks and revokes session tokens.
pub struct SessionService {
    jwt: JwtService,
    revoked: Arc<dyn RevokedTokenRepository>,
}

impl SessionService {
    pub fn new(jwt: JwtService, revoked: Arc<dyn RevokedTokenRepository>) -> Self {
        Self { jwt, revoked }
    }

    pub fn issue(&self, user: &User) -> AppResult<String> {
        self.jwt.create_token(user)
    }

    pub async fn authenticate(&self, token: &str) -> AppResult<Claims> {
        let claims = self.jwt.validate_token(token)?;

        if self.revoked.is_revoked(&hash_token(token)).await? {
            return Err(AppError::Unauthorized("Session has been revoked".to_string()));
        }

        Ok(claims)
    }

    /// Accepts the first presented token that is valid and not revoked, so a
    /// stale cookie does not hide a good bearer token.
    pub async fn authenticate_any(&self, tokens: &[String]) -> AppResult<Claims> {
        let mut last_error = AppError::Unauthorized("Not authenticated".to_string());

        for token in tokens {
            match self.authenticate(token).await {
                Ok(claims) => return Ok(claims),
                Err(e @ AppError::Unauthorized(_)) => last_error = e,
                Err(e) => return Err(e),
            }
        }

        Err(last_error)
    }

    /// Invalid or expired tokens are ignored; there is nothing left to revoke.
    pub async fn revoke(&self, token: &str) -> AppResult<()> {
        let claims = match self.jwt.validate_token(token) {
            Ok(claims) => claims,
            Err(_) => return Ok(()),
        };

        self.revoked
            .revoke(RevokedToken::new(token, &claims.sub, claims.exp))
            .await?;

        log::info!("Revoked session for user {}", claims.sub);
        Ok(())
    }
}
