//! Per-user shopping cart for the food ordering storefront: the cart HTTP API
//! backed by the `users` collection, and the storefront-side cart mirror.

pub mod api;
pub mod client;
pub mod config;
pub mod database;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;
