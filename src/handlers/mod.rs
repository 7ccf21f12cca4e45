pub mod auth_handler;
pub mod health_handler;
pub mod quiz_handler;
pub mod submission_handler;

use actix_web::web;

use crate::{auth::AuthMiddleware, errors::AppError};

/// Malformed or mistyped JSON bodies get the same error body as every other
/// failure instead of actix's plain-text 400.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(format!("Invalid JSON body: {}", err)).into()
    })
}

/// Registers every route. `/api/auth` must come before the authenticated
/// `/api` scope so its public routes are matched first.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .configure(health_handler::configure)
        .service(web::scope("/api/auth").configure(auth_handler::configure))
        .service(
            web::scope("/api")
                .wrap(AuthMiddleware)
                .configure(quiz_handler::configure)
                .configure(submission_handler::configure),
        );
}
