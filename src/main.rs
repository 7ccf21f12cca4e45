use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};

use quizwhiz_server::{
    app_state::AppState, config::Config, handlers, middleware::RequestIdMiddleware,
};

fn cors(config: &Config) -> Cors {
    let cors = Cors::default()
        .supports_credentials()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .max_age(3600);

    if !config.production {
        return cors.allow_any_origin();
    }

    let allowed = config.allowed_origins.clone();
    cors.allowed_origin_fn(move |origin, _req| {
        origin
            .to_str()
            .map(|o| allowed.iter().any(|a| a == o))
            .unwrap_or(false)
    })
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env();
    config
        .validate_for_production()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;

    let bind_addr = (config.web_server_host.clone(), config.web_server_port);

    let state = AppState::new(config)
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;

    log::info!(
        "Starting QuizWhiz server on http://{}:{} ({})",
        bind_addr.0,
        bind_addr.1,
        if state.config.production { "production" } else { "development" }
    );

    let state = web::Data::new(state);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(RequestIdMiddleware)
            .wrap(Logger::new(
                "%a \"%r\" %s %b %Dms request_id=%{x-request-id}o",
            ))
            .wrap(cors(&state.config))
            .configure(handlers::configure)
    })
    .bind(bind_addr)?
    .run()
    .await
}
