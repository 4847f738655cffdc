//! Storefront-side cart state: a local mirror of the user's cart kept in sync
//! with the cart API.

pub mod storefront;

pub use storefront::StorefrontClient;
