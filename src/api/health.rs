use actix_web::{http::StatusCode, web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::services::CartStore;

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    /// `healthy`, or `degraded` when storage does not answer
    pub status: String,
    pub service: String,
    pub version: String,
    pub storage: String,
    pub timestamp: i64,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service and storage are up", body = HealthResponse),
        (status = 503, description = "Storage unreachable", body = HealthResponse)
    )
)]
pub async fn health_check(store: web::Data<dyn CartStore>) -> HttpResponse {
    let (code, status, storage) = match store.ping().await {
        Ok(()) => (StatusCode::OK, "healthy", "ok"),
        Err(e) => {
            log::error!("❌ Storage health check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "degraded", "unavailable")
        }
    };

    HttpResponse::build(code).json(HealthResponse {
        status: status.to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        storage: storage.to_string(),
        timestamp: chrono::Utc::now().timestamp(),
    })
}
