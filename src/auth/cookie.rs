use actix_web::cookie::{time::Duration, Cookie, SameSite};

use crate::config::Config;

pub const SESSION_COOKIE: &str = "token";

/// The httpOnly cookie carrying the session token.
pub fn session_cookie(token: &str, config: &Config) -> Cookie<'static> {
    build(token.to_string(), config, Duration::seconds(config.session_max_age_seconds()))
}

/// Same attributes as the session cookie, empty and already expired, so the
/// browser drops it.
pub fn cleared_session_cookie(config: &Config) -> Cookie<'static> {
    build(String::new(), config, Duration::ZERO)
}

fn build(value: String, config: &Config, max_age: Duration) -> Cookie<'static> {
    let same_site = if config.production {
        SameSite::None
    } else {
        SameSite::Lax
    };

    Cookie::build(SESSION_COOKIE, value)
        .path("/")
        .http_only(true)
        .secure(config.production)
        .same_site(same_site)
        .max_age(max_age)
        .finish()
}
