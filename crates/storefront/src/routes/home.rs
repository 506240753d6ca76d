//! Home page route handler: the full catalog.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::db::ProductRepository;
use crate::error::AppError;
use crate::filters;
use crate::middleware::PageContext;
use crate::models::Product;
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct HomeTemplate {
    pub page: PageContext,
    pub products: Vec<Product>,
}

/// Display every product in id order.
#[instrument(skip_all)]
pub async fn home(
    State(state): State<AppState>,
    page: PageContext,
) -> Result<impl IntoResponse, AppError> {
    let products = ProductRepository::new(state.pool()).list_all().await?;

    Ok(HomeTemplate { page, products })
}
