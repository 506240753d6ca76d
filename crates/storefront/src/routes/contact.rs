//! Contact page.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;

use crate::filters;
use crate::middleware::PageContext;

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    pub page: PageContext,
}

/// Display the static contact page.
#[allow(clippy::unused_async)]
pub async fn contact(page: PageContext) -> impl IntoResponse {
    ContactTemplate { page }
}
