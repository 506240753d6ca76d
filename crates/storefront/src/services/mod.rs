//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - Registration and username/password login
//! - `cart` - Add to cart, cart view, checkout

pub mod auth;
pub mod cart;

pub use auth::{AuthError, AuthService};
pub use cart::{CartError, CartService};
