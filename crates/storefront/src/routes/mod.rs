//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                         - Catalog
//! GET  /register                 - Registration form
//! POST /register                 - Create account
//! GET  /login                    - Login form
//! POST /login                    - Sign in
//! GET  /logout                   - Sign out (requires auth)
//! POST /add_to_cart/{product_id} - Add one unit (requires auth)
//! GET  /cart                     - Cart and total (requires auth)
//! GET  /checkout                 - Cart, total and card form (requires auth)
//! POST /checkout                 - Confirm, empty the cart (requires auth)
//! GET  /contact                  - Static contact page
//!
//! GET  /health                   - Liveness
//! GET  /health/ready             - Readiness (database ping)
//! ```

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod contact;
pub mod health;
pub mod home;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create all page routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/add_to_cart/{product_id}", post(cart::add))
        .route("/cart", get(cart::show))
        .route("/checkout", get(checkout::show).post(checkout::confirm))
        .route("/contact", get(contact::contact))
}

/// Health check routes. These sit outside the session layer.
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
}
