use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

use crate::{
    middleware::auth::TOKEN_HEADER,
    models::{Cart, FoodItem, FoodListResponse},
    utils::AppError,
};

const DEFAULT_API_URL: &str = "http://localhost:4000";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Any cart endpoint answer: `{ success, message? , cartData? }`
#[derive(Debug, Deserialize)]
struct CartEnvelope {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(rename = "cartData", default)]
    cart_data: Option<Cart>,
}

/// Mirrors the cart locally and pushes every change to the backend when logged in.
///
/// Local updates happen first and are not rolled back when the request fails.
#[derive(Debug, Clone)]
pub struct StorefrontClient {
    http: reqwest::Client,
    url: String,
    token: Option<String>,
    cart_items: Cart,
    food_list: Vec<FoodItem>,
}

impl StorefrontClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into().trim_end_matches('/').to_string(),
            token: None,
            cart_items: Cart::new(),
            food_list: Vec::new(),
        }
    }

    /// Base URL from `FOOD_API_URL`, default `http://localhost:4000`
    pub fn from_env() -> Self {
        let url = std::env::var("FOOD_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self::new(url)
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.set_token(token);
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        let token = token.into();
        self.token = if token.is_empty() { None } else { Some(token) };
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    pub fn cart_items(&self) -> &Cart {
        &self.cart_items
    }

    pub fn set_cart_items(&mut self, cart: Cart) {
        self.cart_items = cart;
    }

    pub fn food_list(&self) -> &[FoodItem] {
        &self.food_list
    }

    /// Fetches the food list, then the cart when a token is present
    pub async fn load(&mut self) -> Result<(), AppError> {
        self.fetch_food_list().await?;

        if let Some(token) = self.token.clone() {
            self.load_cart_data(&token).await?;
        }

        Ok(())
    }

    pub async fn fetch_food_list(&mut self) -> Result<(), AppError> {
        let response = self
            .http
            .get(format!("{}/api/food/list", self.url))
            .header("Accept", "application/json")
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| {
                log::error!("❌ GET /api/food/list failed: {}", e);
                AppError::from(e)
            })?;

        let list: FoodListResponse = response.json().await.map_err(|e| {
            log::error!("❌ Failed to parse food list: {}", e);
            AppError::UpstreamError(format!("Failed to parse food list: {}", e))
        })?;

        if !list.success {
            log::error!(
                "❌ Food list request failed: {}",
                list.message.as_deref().unwrap_or("no message")
            );
            return Err(AppError::UpstreamError(
                "Error! Products are not fetching.".to_string(),
            ));
        }

        log::info!("🍽️  Loaded {} food items", list.data.len());
        self.food_list = list.data;
        Ok(())
    }

    pub async fn add_to_cart(&mut self, item_id: &str) -> Result<(), AppError> {
        self.cart_items.add_item(item_id);

        if let Some(token) = self.token.clone() {
            self.post_cart("/api/cart/add", serde_json::json!({ "itemId": item_id }), &token)
                .await?;
        }

        Ok(())
    }

    pub async fn remove_from_cart(&mut self, item_id: &str) -> Result<(), AppError> {
        self.cart_items.decrement_unguarded(item_id);

        if let Some(token) = self.token.clone() {
            self.post_cart("/api/cart/remove", serde_json::json!({ "itemId": item_id }), &token)
                .await?;
        }

        Ok(())
    }

    /// Replaces the local mirror with the cart stored for `token`'s user
    pub async fn load_cart_data(&mut self, token: &str) -> Result<(), AppError> {
        let envelope = self
            .post_cart("/api/cart/get", serde_json::json!({}), token)
            .await?;

        self.cart_items = envelope.cart_data.unwrap_or_default();
        Ok(())
    }

    pub fn total_cart_amount(&self) -> f64 {
        self.cart_items.total_amount(&self.food_list)
    }

    async fn post_cart(
        &self,
        path: &str,
        body: serde_json::Value,
        token: &str,
    ) -> Result<CartEnvelope, AppError> {
        let response = self
            .http
            .post(format!("{}{}", self.url, path))
            .header(TOKEN_HEADER, token)
            .json(&body)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| {
                log::error!("❌ POST {} failed: {}", path, e);
                AppError::from(e)
            })?;

        let status = response.status();
        let envelope: CartEnvelope = response.json().await.map_err(|e| {
            log::error!("❌ Failed to parse {} response ({}): {}", path, status, e);
            AppError::UpstreamError(format!("Failed to parse {} response ({}): {}", path, status, e))
        })?;

        if !envelope.success {
            let message = envelope
                .message
                .unwrap_or_else(|| format!("{} answered {}", path, status));
            log::error!("❌ POST {} rejected: {}", path, message);
            return Err(error_for_status(status, message));
        }

        Ok(envelope)
    }
}

fn error_for_status(status: StatusCode, message: String) -> AppError {
    match status {
        StatusCode::BAD_REQUEST => AppError::InvalidRequest(message),
        StatusCode::UNAUTHORIZED => AppError::Unauthorized(message),
        StatusCode::NOT_FOUND => AppError::NotFound(message),
        _ => AppError::UpstreamError(message),
    }
}
