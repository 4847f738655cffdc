pub mod cart_service;

pub use cart_service::{CartStore, InMemoryCartStore, MongoCartStore};
