use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("You have already submitted this quiz")]
    AlreadySubmitted,

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Upstream(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::AlreadyExists(_) => "ALREADY_EXISTS",
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::AlreadySubmitted => "ALREADY_SUBMITTED",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::Upstream(_) => "UPSTREAM_ERROR",
            AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Message safe to hand back to a client. Storage and internal details
    /// stay in the server log.
    fn public_message(&self) -> String {
        match self {
            AppError::DatabaseError(_) | AppError::InternalError(_) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub already_submitted: Option<bool>,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::AlreadyExists(_) => StatusCode::CONFLICT,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::AlreadySubmitted => StatusCode::BAD_REQUEST,
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            log::error!("{} ({})", self, self.error_code());
        }

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.public_message(),
            code: self.status_code().as_u16(),
            already_submitted: matches!(self, AppError::AlreadySubmitted).then_some(true),
        })
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InternalError(format!("JSON error: {}", err))
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            AppError::NotFound("test".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::AlreadyExists("test".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::ValidationError("test".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Forbidden("Access denied".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::Upstream("Failed to generate quiz".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_error_messages() {
        let err = AppError::NotFound("Quiz not found".into());
        assert_eq!(err.to_string(), "Quiz not found");

        let err = AppError::Unauthorized("Invalid credentials".into());
        assert_eq!(err.to_string(), "Invalid credentials");
    }

    #[actix_web::test]
    async fn test_already_submitted_body_carries_flag() {
        let response = AppError::AlreadySubmitted.error_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "You have already submitted this quiz");
        assert_eq!(json["alreadySubmitted"], true);
        assert_eq!(json["code"], 400);
    }

    #[actix_web::test]
    async fn test_database_error_hides_details() {
        let response = AppError::DatabaseError("connection refused to 10.0.0.3".into())
            .error_response();

        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Internal server error");
        assert!(json.get("alreadySubmitted").is_none());
    }
}
