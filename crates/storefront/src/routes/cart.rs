//! Cart route handlers.
//!
//! ```text
//! POST /add_to_cart/{product_id}  - Add one unit, flash, redirect home
//! GET  /cart                      - Cart lines and total
//! ```

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};
use tower_sessions::Session;
use tracing::instrument;

use green_wally_core::ProductId;

use crate::error::AppError;
use crate::filters;
use crate::middleware::{PageContext, RequireAuth, push_flash};
use crate::models::{CartSummary, Flash};
use crate::services::CartService;
use crate::state::AppState;

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart.html")]
pub struct CartTemplate {
    pub page: PageContext,
    pub cart: CartSummary,
}

/// Add one unit of a product to the signed-in user's cart.
///
/// Unknown or non-numeric product ids are a 404.
#[instrument(skip_all, fields(user_id = %user.id, product_id = %product_id))]
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Path(product_id): Path<String>,
) -> Result<Redirect, AppError> {
    let product_id = product_id
        .parse::<i64>()
        .map(ProductId::new)
        .map_err(|_| AppError::NotFound(format!("product {product_id}")))?;

    let item = CartService::new(state.pool())
        .add_to_cart(user.id, product_id)
        .await?;

    tracing::info!(quantity = %item.quantity, "Added to cart");
    push_flash(&session, Flash::success("Product added to cart!")).await?;
    Ok(Redirect::to("/"))
}

/// Show the signed-in user's cart.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    page: PageContext,
) -> Result<impl IntoResponse, AppError> {
    let cart = CartService::new(state.pool()).view_cart(user.id).await?;
    Ok(CartTemplate { page, cart })
}
