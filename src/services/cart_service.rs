// ==================== CART MANAGEMENT ====================
// Quantidades do carrinho ficam no próprio documento do usuário (campo cartData).
// Cada operação é read-modify-write: um load e no máximo um save por chamada.

use crate::{
    database::{MongoDB, USERS_COLLECTION},
    models::{Cart, UserCartDocument},
    utils::AppError,
};
use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId};
use std::collections::HashMap;
use tokio::sync::RwLock;

const MAX_ITEM_ID_LEN: usize = 128;

/// Where user carts are read from and written back to
#[async_trait]
pub trait CartStore: Send + Sync {
    /// `None` when the user does not exist
    async fn load_cart(&self, user_id: &str) -> Result<Option<Cart>, AppError>;

    async fn save_cart(&self, user_id: &str, cart: &Cart) -> Result<(), AppError>;

    /// Whether the backing storage answers
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

// ==================== MONGODB STORE ====================

#[derive(Clone)]
pub struct MongoCartStore {
    db: MongoDB,
}

impl MongoCartStore {
    pub fn new(db: MongoDB) -> Self {
        Self { db }
    }
}

fn parse_user_id(user_id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(user_id)
        .map_err(|_| AppError::InvalidRequest(format!("Invalid user id '{}'", user_id)))
}

#[async_trait]
impl CartStore for MongoCartStore {
    async fn load_cart(&self, user_id: &str) -> Result<Option<Cart>, AppError> {
        let object_id = parse_user_id(user_id)?;
        let collection = self.db.collection::<UserCartDocument>(USERS_COLLECTION);

        let user = collection
            .find_one(doc! { "_id": object_id })
            .projection(doc! { "cartData": 1 })
            .await?;

        Ok(user.map(UserCartDocument::into_cart))
    }

    async fn save_cart(&self, user_id: &str, cart: &Cart) -> Result<(), AppError> {
        let object_id = parse_user_id(user_id)?;
        let collection = self.db.collection::<UserCartDocument>(USERS_COLLECTION);

        let cart_data = mongodb::bson::to_bson(cart)
            .map_err(|e| AppError::DatabaseError(format!("Failed to encode cart: {}", e)))?;

        let result = collection
            .update_one(
                doc! { "_id": object_id },
                doc! { "$set": { "cartData": cart_data } },
            )
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.db.health_check().await
    }
}

// ==================== IN-MEMORY STORE ====================

/// Keeps carts in process memory. Only users that were seeded exist.
#[derive(Debug, Default)]
pub struct InMemoryCartStore {
    carts: RwLock<HashMap<String, Cart>>,
}

impl InMemoryCartStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users<I, S>(user_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let carts = user_ids
            .into_iter()
            .map(|id| (id.into(), Cart::new()))
            .collect();
        Self {
            carts: RwLock::new(carts),
        }
    }

    /// Registers a user with an empty cart; an existing cart is kept
    pub async fn insert_user(&self, user_id: &str) {
        self.carts
            .write()
            .await
            .entry(user_id.to_string())
            .or_default();
    }
}

#[async_trait]
impl CartStore for InMemoryCartStore {
    async fn load_cart(&self, user_id: &str) -> Result<Option<Cart>, AppError> {
        Ok(self.carts.read().await.get(user_id).cloned())
    }

    async fn save_cart(&self, user_id: &str, cart: &Cart) -> Result<(), AppError> {
        match self.carts.write().await.get_mut(user_id) {
            Some(stored) => {
                *stored = cart.clone();
                Ok(())
            }
            None => Err(AppError::NotFound("User not found".to_string())),
        }
    }
}

// ==================== SERVICE FUNCTIONS ====================

/// Item ids become field names under `cartData`, so dots and a leading `$` are refused
pub fn validate_item_id(item_id: &str) -> Result<(), AppError> {
    if item_id.trim().is_empty() {
        return Err(AppError::InvalidRequest("itemId is required".to_string()));
    }
    if item_id.len() > MAX_ITEM_ID_LEN {
        return Err(AppError::InvalidRequest(format!(
            "itemId must be at most {} bytes",
            MAX_ITEM_ID_LEN
        )));
    }
    if item_id.contains('.') || item_id.starts_with('$') {
        return Err(AppError::InvalidRequest(format!(
            "itemId '{}' contains reserved characters",
            item_id
        )));
    }
    Ok(())
}

async fn load_existing(store: &dyn CartStore, user_id: &str) -> Result<Cart, AppError> {
    store
        .load_cart(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

pub async fn add_to_cart(
    store: &dyn CartStore,
    user_id: &str,
    item_id: &str,
) -> Result<Cart, AppError> {
    validate_item_id(item_id)?;
    log::info!("🛒 Adding {} to cart of user {}", item_id, user_id);

    let mut cart = load_existing(store, user_id).await?;
    cart.add_item(item_id);
    store.save_cart(user_id, &cart).await?;

    Ok(cart)
}

pub async fn remove_from_cart(
    store: &dyn CartStore,
    user_id: &str,
    item_id: &str,
) -> Result<Cart, AppError> {
    validate_item_id(item_id)?;
    log::info!("🛒 Removing {} from cart of user {}", item_id, user_id);

    let mut cart = load_existing(store, user_id).await?;
    if cart.remove_item(item_id) {
        store.save_cart(user_id, &cart).await?;
    } else {
        log::debug!("Item {} not in cart of user {}, nothing to remove", item_id, user_id);
    }

    Ok(cart)
}

pub async fn get_cart(store: &dyn CartStore, user_id: &str) -> Result<Cart, AppError> {
    log::info!("🛒 Fetching cart of user {}", user_id);
    load_existing(store, user_id).await
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER: &str = "65f1c0ffee65f1c0ffee0001";

    #[actix_rt::test]
    async fn test_first_add_creates_entry() {
        let store = InMemoryCartStore::with_users([USER]);

        let cart = add_to_cart(&store, USER, "food-1").await.unwrap();
        assert_eq!(cart.quantity("food-1"), 1);

        let stored = get_cart(&store, USER).await.unwrap();
        assert_eq!(stored, cart);
    }

    #[actix_rt::test]
    async fn test_repeated_add_increments() {
        let store = InMemoryCartStore::with_users([USER]);

        for _ in 0..3 {
            add_to_cart(&store, USER, "food-1").await.unwrap();
        }
        add_to_cart(&store, USER, "food-2").await.unwrap();

        let cart = get_cart(&store, USER).await.unwrap();
        assert_eq!(cart.quantity("food-1"), 3);
        assert_eq!(cart.quantity("food-2"), 1);
    }

    #[actix_rt::test]
    async fn test_remove_never_goes_below_zero() {
        let store = InMemoryCartStore::with_users([USER]);
        add_to_cart(&store, USER, "food-1").await.unwrap();

        remove_from_cart(&store, USER, "food-1").await.unwrap();
        let cart = remove_from_cart(&store, USER, "food-1").await.unwrap();
        assert_eq!(cart.quantity("food-1"), 0);

        let cart = remove_from_cart(&store, USER, "never-added").await.unwrap();
        assert_eq!(cart.quantity("never-added"), 0);
        assert_eq!(cart.len(), 1);
    }

    #[actix_rt::test]
    async fn test_unknown_user_is_not_found() {
        let store = InMemoryCartStore::new();

        let err = add_to_cart(&store, USER, "food-1").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = get_cart(&store, USER).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[actix_rt::test]
    async fn test_new_user_has_empty_cart() {
        let store = InMemoryCartStore::new();
        store.insert_user(USER).await;

        assert!(get_cart(&store, USER).await.unwrap().is_empty());
    }

    #[actix_rt::test]
    async fn test_invalid_item_id_is_rejected_before_load() {
        let store = InMemoryCartStore::new();

        for item_id in ["", "   ", "a.b", "$where"] {
            let err = add_to_cart(&store, USER, item_id).await.unwrap_err();
            assert!(matches!(err, AppError::InvalidRequest(_)), "{}", item_id);
        }

        let long_id = "x".repeat(MAX_ITEM_ID_LEN + 1);
        let err = remove_from_cart(&store, USER, &long_id).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));
    }

    async fn mongo_store() -> MongoCartStore {
        dotenv::dotenv().ok();
        let uri = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017/food-del".to_string());
        MongoCartStore::new(MongoDB::new(&uri).await.unwrap())
    }

    #[actix_rt::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_mongo_cart_round_trip() {
        let store = mongo_store().await;
        let users = store
            .db
            .collection::<mongodb::bson::Document>(USERS_COLLECTION);

        let user_id = ObjectId::new();
        users
            .insert_one(doc! { "_id": user_id, "name": "cart test", "cartData": {} })
            .await
            .unwrap();
        let user = user_id.to_hex();

        add_to_cart(&store, &user, "food-1").await.unwrap();
        add_to_cart(&store, &user, "food-1").await.unwrap();
        remove_from_cart(&store, &user, "food-1").await.unwrap();
        let cart = get_cart(&store, &user).await.unwrap();

        users.delete_one(doc! { "_id": user_id }).await.unwrap();

        assert_eq!(cart.quantity("food-1"), 1);
        assert_eq!(cart.len(), 1);
    }

    #[actix_rt::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_mongo_unknown_user() {
        let store = mongo_store().await;
        let user = ObjectId::new().to_hex();

        assert!(store.load_cart(&user).await.unwrap().is_none());

        let err = store.save_cart(&user, &Cart::new()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_parse_user_id() {
        assert!(parse_user_id(USER).is_ok());
        assert!(matches!(
            parse_user_id("not-an-object-id"),
            Err(AppError::InvalidRequest(_))
        ));
    }
}
