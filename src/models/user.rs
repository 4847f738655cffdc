use crate::models::Cart;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Projection of a `users` document down to the cart field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCartDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// Missing or null reads as an empty cart
    #[serde(rename = "cartData", default)]
    pub cart_data: Option<Cart>,
}

impl UserCartDocument {
    pub fn into_cart(self) -> Cart {
        self.cart_data.unwrap_or_default()
    }
}
