pub mod cart;
pub mod food;
pub mod user;

pub use cart::*;
pub use food::*;
pub use user::*;
