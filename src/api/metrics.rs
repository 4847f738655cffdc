use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

static CART_ADDS: AtomicU64 = AtomicU64::new(0);
static CART_REMOVES: AtomicU64 = AtomicU64::new(0);
static CART_READS: AtomicU64 = AtomicU64::new(0);
static ERROR_COUNT: AtomicU64 = AtomicU64::new(0);

pub fn increment_cart_adds() {
    CART_ADDS.fetch_add(1, Ordering::Relaxed);
}

pub fn increment_cart_removes() {
    CART_REMOVES.fetch_add(1, Ordering::Relaxed);
}

pub fn increment_cart_reads() {
    CART_READS.fetch_add(1, Ordering::Relaxed);
}

pub fn increment_error_count() {
    ERROR_COUNT.fetch_add(1, Ordering::Relaxed);
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MetricsResponse {
    pub cart_add_requests_total: u64,
    pub cart_remove_requests_total: u64,
    pub cart_get_requests_total: u64,
    pub cart_errors_total: u64,
}

impl MetricsResponse {
    pub fn snapshot() -> Self {
        Self {
            cart_add_requests_total: CART_ADDS.load(Ordering::Relaxed),
            cart_remove_requests_total: CART_REMOVES.load(Ordering::Relaxed),
            cart_get_requests_total: CART_READS.load(Ordering::Relaxed),
            cart_errors_total: ERROR_COUNT.load(Ordering::Relaxed),
        }
    }

    /// Prometheus text exposition format
    pub fn render(&self) -> String {
        let counters = [
            ("cart_add_requests_total", "Total number of add-to-cart requests", self.cart_add_requests_total),
            ("cart_remove_requests_total", "Total number of remove-from-cart requests", self.cart_remove_requests_total),
            ("cart_get_requests_total", "Total number of cart reads", self.cart_get_requests_total),
            ("cart_errors_total", "Total number of failed cart requests", self.cart_errors_total),
        ];

        counters
            .iter()
            .map(|(name, help, value)| {
                format!("# HELP {name} {help}\n# TYPE {name} counter\n{name} {value}\n")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[utoipa::path(
    get,
    path = "/metrics",
    tag = "Health",
    responses(
        (status = 200, description = "Cart counters in Prometheus text format")
    )
)]
pub async fn get_metrics() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(MetricsResponse::snapshot().render())
}
