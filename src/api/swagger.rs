use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Food Cart Service API",
        version = "1.0.0",
        description = "Per-user shopping cart for the food ordering storefront.\n\n**Authentication:** cart endpoints require the login JWT, sent either in the `token` header or as `Authorization: Bearer <jwt>`."
    ),
    paths(
        // Cart
        crate::api::cart::add_to_cart,
        crate::api::cart::remove_from_cart,
        crate::api::cart::get_cart,

        // Health & Metrics
        crate::api::health::health_check,
        crate::api::metrics::get_metrics,
    ),
    components(
        schemas(
            crate::api::cart::CartItemRequest,
            crate::api::cart::CartActionResponse,
            crate::api::cart::CartDataResponse,
            crate::models::Cart,
            crate::api::health::HealthResponse,
            crate::api::metrics::MetricsResponse,
        )
    ),
    tags(
        (name = "Cart", description = "Add, remove and read items of the authenticated user's cart."),
        (name = "Health", description = "Health check and cart counters."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Enter your JWT token"))
                        .build(),
                ),
            );
            components.add_security_scheme(
                "token",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("token"))),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_cart_paths() {
        let doc = ApiDoc::openapi();
        for path in ["/api/cart/add", "/api/cart/remove", "/api/cart/get", "/health"] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
