//! Domain models for the storefront.
//!
//! These are validated domain types, separate from the sqlx row structs that
//! live next to the queries in [`crate::db`].

pub mod cart;
pub mod product;
pub mod session;
pub mod user;

pub use cart::{CartItem, CartLine, CartSummary};
pub use product::{NewProduct, Product};
pub use session::{CurrentUser, Flash, FlashLevel, keys as session_keys};
pub use user::User;
