// src/handlers/health.rs
// DOCUMENTATION: Health check handler
// PURPOSE: Liveness probe that also reports which store backs the service

use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

use crate::config::Config;

pub async fn health_check(config: web::Data<Config>) -> impl Responder {
    let store = if config.uses_memory_store() {
        "memory"
    } else {
        "postgres"
    };
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "service": "photo-map-journal",
        "version": env!("CARGO_PKG_VERSION"),
        "store": store
    }))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}

#[cfg(test)]
mod tests {
    use crate::handlers::test_support::TestContext;
    use actix_web::test;

    #[actix_web::test]
    async fn test_health_is_public() {
        let ctx = TestContext::new();
        let app = test::init_service(ctx.app()).await;
        let req = test::TestRequest::get().uri("/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["store"], "memory");
    }
}
