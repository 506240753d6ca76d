//! Simulated checkout.
//!
//! GET shows the cart with a card form; POST confirms, empties the cart and
//! renders the success state. No payment is taken and no order is stored.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::error::AppError;
use crate::filters;
use crate::middleware::{PageContext, RequireAuth};
use crate::models::CartSummary;
use crate::services::CartService;
use crate::state::AppState;

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout.html")]
pub struct CheckoutTemplate {
    pub page: PageContext,
    pub cart: CartSummary,
    pub payment_success: bool,
}

/// Show the cart lines and total with the payment form.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    page: PageContext,
) -> Result<impl IntoResponse, AppError> {
    let cart = CartService::new(state.pool()).view_cart(user.id).await?;
    Ok(CheckoutTemplate {
        page,
        cart,
        payment_success: false,
    })
}

/// Confirm checkout: clear the cart and show the success state.
///
/// Submitted card fields are ignored.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn confirm(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    mut page: PageContext,
) -> Result<impl IntoResponse, AppError> {
    let cart = CartService::new(state.pool()).checkout(user.id).await?;
    page.cart_units = 0;
    Ok(CheckoutTemplate {
        page,
        cart,
        payment_success: true,
    })
}
