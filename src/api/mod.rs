pub mod cart;
pub mod health;
pub mod metrics;
pub mod swagger;

use actix_web::{error::InternalError, web, HttpResponse};

use crate::middleware::AuthMiddleware;

const MAX_JSON_BODY: usize = 4 * 1024;

/// Bad JSON bodies answer with the same `{ success, message }` envelope as the handlers
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(MAX_JSON_BODY)
        .error_handler(|err, _req| {
            let message = format!("Invalid request body: {}", err);
            metrics::increment_error_count();
            log::warn!("⚠️ {}", message);
            InternalError::from_response(
                err,
                HttpResponse::BadRequest().json(cart::CartActionResponse {
                    success: false,
                    message,
                }),
            )
            .into()
        })
}

/// Health, metrics and the JWT-protected cart routes.
///
/// The caller registers a `web::Data<dyn CartStore>`.
pub fn configure(cfg: &mut web::ServiceConfig, jwt_secret: &str) {
    cfg.app_data(json_config())
        .route("/health", web::get().to(health::health_check))
        .route("/metrics", web::get().to(metrics::get_metrics))
        .service(
            web::scope("/api/cart")
                .wrap(AuthMiddleware::new(jwt_secret))
                .route("/add", web::post().to(cart::add_to_cart))
                .route("/remove", web::post().to(cart::remove_from_cart))
                .route("/get", web::post().to(cart::get_cart)),
        );
}
