use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::{
    api::metrics,
    middleware::auth::Claims,
    models::Cart,
    services::{cart_service, CartStore},
    utils::AppError,
};

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CartItemRequest {
    #[serde(rename = "itemId")]
    pub item_id: String,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CartActionResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CartDataResponse {
    pub success: bool,
    #[serde(rename = "cartData")]
    pub cart_data: Cart,
}

fn failure(error: AppError, message: &str) -> HttpResponse {
    metrics::increment_error_count();

    match &error {
        AppError::DatabaseError(_) | AppError::UpstreamError(_) => {
            log::error!("❌ {}: {}", message, error)
        }
        _ => log::warn!("⚠️ {}: {}", message, error),
    }

    HttpResponse::build(error.status_code()).json(CartActionResponse {
        success: false,
        message: message.to_string(),
    })
}

/// POST /api/cart/add - Incrementa a quantidade do item no carrinho
#[utoipa::path(
    post,
    path = "/api/cart/add",
    tag = "Cart",
    request_body = CartItemRequest,
    responses(
        (status = 200, description = "Item added", body = CartActionResponse),
        (status = 400, description = "Invalid item id", body = CartActionResponse),
        (status = 401, description = "Missing or invalid token", body = CartActionResponse),
        (status = 404, description = "User not found", body = CartActionResponse)
    ),
    security(("token" = []), ("bearer_auth" = []))
)]
pub async fn add_to_cart(
    user: web::ReqData<Claims>,
    store: web::Data<dyn CartStore>,
    request: web::Json<CartItemRequest>,
) -> HttpResponse {
    metrics::increment_cart_adds();

    match cart_service::add_to_cart(store.get_ref(), &user.id, &request.item_id).await {
        Ok(cart) => {
            log::info!(
                "✅ Cart of user {}: {} x{}",
                user.id,
                request.item_id,
                cart.quantity(&request.item_id)
            );
            HttpResponse::Ok().json(CartActionResponse {
                success: true,
                message: "Added To Cart".to_string(),
            })
        }
        Err(e) => failure(e, "Error adding to cart"),
    }
}

/// POST /api/cart/remove - Decrementa a quantidade (nunca abaixo de zero)
#[utoipa::path(
    post,
    path = "/api/cart/remove",
    tag = "Cart",
    request_body = CartItemRequest,
    responses(
        (status = 200, description = "Item removed", body = CartActionResponse),
        (status = 400, description = "Invalid item id", body = CartActionResponse),
        (status = 401, description = "Missing or invalid token", body = CartActionResponse),
        (status = 404, description = "User not found", body = CartActionResponse)
    ),
    security(("token" = []), ("bearer_auth" = []))
)]
pub async fn remove_from_cart(
    user: web::ReqData<Claims>,
    store: web::Data<dyn CartStore>,
    request: web::Json<CartItemRequest>,
) -> HttpResponse {
    metrics::increment_cart_removes();

    match cart_service::remove_from_cart(store.get_ref(), &user.id, &request.item_id).await {
        Ok(cart) => {
            log::info!(
                "✅ Cart of user {}: {} x{}",
                user.id,
                request.item_id,
                cart.quantity(&request.item_id)
            );
            HttpResponse::Ok().json(CartActionResponse {
                success: true,
                message: "Removed From Cart".to_string(),
            })
        }
        Err(e) => failure(e, "Error removing from cart"),
    }
}

/// POST /api/cart/get - Retorna o cartData do usuário autenticado
///
/// O corpo da requisição é ignorado.
#[utoipa::path(
    post,
    path = "/api/cart/get",
    tag = "Cart",
    responses(
        (status = 200, description = "Current cart", body = CartDataResponse),
        (status = 401, description = "Missing or invalid token", body = CartActionResponse),
        (status = 404, description = "User not found", body = CartActionResponse)
    ),
    security(("token" = []), ("bearer_auth" = []))
)]
pub async fn get_cart(user: web::ReqData<Claims>, store: web::Data<dyn CartStore>) -> HttpResponse {
    metrics::increment_cart_reads();

    match cart_service::get_cart(store.get_ref(), &user.id).await {
        Ok(cart) => {
            log::info!("✅ Cart of user {} has {} entries", user.id, cart.len());
            HttpResponse::Ok().json(CartDataResponse {
                success: true,
                cart_data: cart,
            })
        }
        Err(e) => failure(e, "Error fetching cart data"),
    }
}
