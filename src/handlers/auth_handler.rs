use actix_web::{get, http::header, post, web, HttpRequest, HttpResponse};
use reqwest::Url;

use crate::{
    app_state::AppState,
    auth::{
        cookie::{cleared_session_cookie, session_cookie},
        presented_tokens, AuthMiddleware, AuthenticatedUser,
    },
    errors::{AppError, AppResult},
    models::{
        domain::User,
        dto::{
            request::{LoginRequest, OAuthCallbackParams, RegisterRequest},
            response::{AuthResponse, MeResponse, MessageResponse, UserDto},
        },
    },
};

fn session_response(
    mut builder: actix_web::HttpResponseBuilder,
    state: &AppState,
    user: User,
) -> Result<HttpResponse, AppError> {
    let token = state.session_service.issue(&user)?;

    Ok(builder
        .cookie(session_cookie(&token, &state.config))
        .json(AuthResponse {
            user: UserDto::from(user),
            token,
        }))
}

#[post("/register")]
async fn register(
    state: web::Data<AppState>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let user = state.user_service.register(request.into_inner()).await?;
    session_response(HttpResponse::Created(), &state, user)
}

#[post("/login")]
async fn login(
    state: web::Data<AppState>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let user = state.user_service.login(request.into_inner()).await?;
    log::info!("User {} logged in", user.id);
    session_response(HttpResponse::Ok(), &state, user)
}

#[post("/logout")]
async fn logout(state: web::Data<AppState>, req: HttpRequest) -> Result<HttpResponse, AppError> {
    for token in presented_tokens(&req) {
        state.session_service.revoke(&token).await?;
    }

    Ok(HttpResponse::Ok()
        .cookie(cleared_session_cookie(&state.config))
        .json(MessageResponse {
            message: "Logged out successfully".to_string(),
        }))
}

#[get("/me", wrap = "AuthMiddleware")]
async fn me(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let user = state.user_service.get_user(&auth.0.sub).await?;
    Ok(HttpResponse::Ok().json(MeResponse {
        user: UserDto::from(user),
    }))
}

#[get("/google")]
async fn google_login(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let url = state.oauth.authorize_url()?;
    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, url))
        .finish())
}

#[get("/google/callback")]
async fn google_callback(
    state: web::Data<AppState>,
    params: web::Query<OAuthCallbackParams>,
) -> HttpResponse {
    match complete_google_login(&state, params.into_inner()).await {
        Ok(response) => response,
        Err(e) => {
            log::warn!("Google sign-in failed: {}", e);
            redirect(&format!(
                "{}/login?error=Google%20auth%20failed",
                state.config.client_url
            ))
        }
    }
}

async fn complete_google_login(
    state: &AppState,
    params: OAuthCallbackParams,
) -> AppResult<HttpResponse> {
    if let Some(error) = params.error {
        return Err(AppError::Unauthorized(format!("Provider returned '{}'", error)));
    }
    let code = params
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing authorization code".to_string()))?;

    let profile = state.oauth.exchange_code(&code).await?;
    let user = state.user_service.login_with_google(profile).await?;
    let token = state.session_service.issue(&user)?;

    let target = Url::parse_with_params(
        &format!("{}/auth-success", state.config.client_url),
        &[("token", token.as_str()), ("role", user.role.as_str())],
    )
    .map_err(|e| AppError::InternalError(format!("Invalid CLIENT_URL: {}", e)))?;

    log::info!("User {} signed in with Google", user.id);

    Ok(HttpResponse::Found()
        .cookie(session_cookie(&token, &state.config))
        .insert_header((header::LOCATION, target.to_string()))
        .finish())
}

fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location.to_string()))
        .finish()
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(register)
        .service(login)
        .service(logout)
        .service(me)
        .service(google_login)
        .service(google_callback);
}
