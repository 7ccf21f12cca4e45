use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::Header,
    web, Error, FromRequest, HttpMessage, HttpRequest, ResponseError,
};
use actix_web_httpauth::headers::authorization::{Authorization, Bearer};
use futures::future::LocalBoxFuture;

use crate::{
    app_state::AppState,
    auth::{cookie::SESSION_COOKIE, Claims},
    errors::{AppError, AppResult},
};

/// Every session token the request carries: the cookie first, then an
/// `Authorization: Bearer` header. Empty values and repeats are skipped.
pub fn presented_tokens(req: &HttpRequest) -> Vec<String> {
    let mut tokens = Vec::with_capacity(2);

    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        if !cookie.value().is_empty() {
            tokens.push(cookie.value().to_string());
        }
    }

    if let Ok(auth) = Authorization::<Bearer>::parse(req) {
        let token = auth.into_scheme().token().to_string();
        if !token.is_empty() && !tokens.contains(&token) {
            tokens.push(token);
        }
    }

    tokens
}

pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            match authenticate(&req).await {
                Ok(claims) => {
                    req.extensions_mut().insert(claims);
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Err(e) => {
                    log::debug!("Rejected {} {}: {}", req.method(), req.path(), e);
                    let response = e.error_response();
                    Ok(req.into_response(response).map_into_right_body())
                }
            }
        })
    }
}

async fn authenticate(req: &ServiceRequest) -> AppResult<Claims> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .cloned()
        .ok_or_else(|| AppError::InternalError("Application state not configured".to_string()))?;

    let tokens = presented_tokens(req.request());
    state.session_service.authenticate_any(&tokens).await
}

// Extractor for the authenticated session in handlers
pub struct AuthenticatedUser(pub Claims);

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let claims = req
            .extensions()
            .get::<Claims>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Not authenticated".to_string()));

        ready(claims.map(AuthenticatedUser))
    }
}
