use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};

use crate::{
    auth::claims::Claims,
    errors::{AppError, AppResult},
    models::domain::User,
};

#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expiration_hours: i64,
}

impl JwtService {
    pub fn new(secret: &SecretString, expiration_hours: i64) -> Self {
        let secret_bytes = secret.expose_secret().as_bytes();

        Self {
            encoding_key: EncodingKey::from_secret(secret_bytes),
            decoding_key: DecodingKey::from_secret(secret_bytes),
            validation: Validation::default(),
            expiration_hours,
        }
    }

    pub fn create_token(&self, user: &User) -> AppResult<String> {
        let claims = Claims::new(user, self.expiration_hours);

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalError(format!("Failed to create JWT: {}", e)))
    }

    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => {
                    AppError::Unauthorized("Session has expired".to_string())
                }
                _ => AppError::Unauthorized("Not authenticated".to_string()),
            })
    }

    pub fn expiration_hours(&self) -> i64 {
        self.expiration_hours
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_jwt_create_and_validate() {
        let config = Config::test_config();
        let jwt_service = JwtService::new(&config.jwt_secret, 1);

        let user = User::test_student("Sam");
        let token = jwt_service.create_token(&user).unwrap();

        assert!(!token.is_empty());

        let claims = jwt_service.validate_token(&token).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.role, user.role);
    }

    #[test]
    fn test_jwt_invalid_token() {
        let config = Config::test_config();
        let jwt_service = JwtService::new(&config.jwt_secret, 1);

        let result = jwt_service.validate_token("invalid.token.here");
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_jwt_rejects_token_signed_with_other_secret() {
        let issuer = JwtService::new(&SecretString::from("first-secret".to_string()), 1);
        let verifier = JwtService::new(&SecretString::from("second-secret".to_string()), 1);

        let token = issuer.create_token(&User::test_teacher("Ada")).unwrap();
        assert!(verifier.validate_token(&token).is_err());
    }

    #[test]
    fn test_jwt_expired_token() {
        let config = Config::test_config();
        // Default validation allows 60s of leeway, so go well past it.
        let jwt_service = JwtService::new(&config.jwt_secret, -2);

        let token = jwt_service.create_token(&User::test_teacher("Ada")).unwrap();
        match jwt_service.validate_token(&token) {
            Err(AppError::Unauthorized(msg)) => assert_eq!(msg, "Session has expired"),
            other => panic!("Expected expired session error, got {:?}", other.map(|c| c.sub)),
        }
    }
}
