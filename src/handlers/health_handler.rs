use actix_web::{get, web, HttpResponse};

use crate::app_state::AppState;

#[get("/")]
async fn root() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "message": "Server is running" }))
}

#[get("/health")]
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[get("/health/live")]
async fn health_check_live() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[get("/health/ready")]
async fn health_check_ready(state: web::Data<AppState>) -> HttpResponse {
    let ping = match &state.db {
        Some(db) => db.ping().await.map(Some),
        None => Ok(None),
    };

    match ping {
        Ok(latency) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ready",
            "version": env!("CARGO_PKG_VERSION"),
            "dependencies": {
                "mongodb": "ok"
            },
            "latencyMs": latency.map(|l| l.as_millis() as u64)
        })),
        Err(e) => {
            log::warn!("Readiness check failed: {}", e);
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "status": "not_ready",
                "version": env!("CARGO_PKG_VERSION"),
                "dependencies": {
                    "mongodb": "error"
                }
            }))
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(root)
        .service(health_check)
        .service(health_check_live)
        .service(health_check_ready);
}
