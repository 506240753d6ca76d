//! Per-page layout context: who is signed in, cart badge, pending flashes.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_sessions::Session;

use crate::error::{AppError, NotFoundPage, NotFoundTemplate};
use crate::middleware::auth::AuthContext;
use crate::middleware::flash::take_flashes;
use crate::models::{CurrentUser, Flash};
use crate::services::CartService;
use crate::state::AppState;

/// Data every page template needs for the shared layout.
///
/// Extracting it consumes the pending flash messages, so only handlers that
/// render a page should take it.
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    pub user: Option<CurrentUser>,
    pub cart_units: i64,
    pub flashes: Vec<Flash>,
}

impl PageContext {
    /// Append a message to show on this render.
    pub fn flash(&mut self, flash: Flash) {
        self.flashes.push(flash);
    }

    #[must_use]
    pub const fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    /// Build the context for a render from the request's session.
    ///
    /// # Errors
    ///
    /// Returns `AppError` if the session or cart lookup fails.
    pub async fn load(session: &Session, state: &AppState) -> Result<Self, AppError> {
        let flashes = take_flashes(session).await?;
        let user = session.current_user().await?;
        let cart_units = match &user {
            Some(user) => CartService::new(state.pool()).unit_count(user.id).await?,
            None => 0,
        };

        Ok(Self {
            user,
            cart_units,
            flashes,
        })
    }
}

impl FromRequestParts<AppState> for PageContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<Session>().cloned() {
            Some(session) => Self::load(&session, state).await,
            None => Ok(Self::default()),
        }
    }
}

/// Re-render 404 pages with the shopper's nav bar and cart badge.
///
/// Must sit inside the session layer. If the layout cannot be loaded the
/// anonymous page is kept.
pub async fn render_not_found(
    State(state): State<AppState>,
    session: Session,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    if response.extensions().get::<NotFoundPage>().is_none() {
        return response;
    }

    match PageContext::load(&session, &state).await {
        Ok(page) => (StatusCode::NOT_FOUND, NotFoundTemplate { page }).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Could not load layout for 404 page");
            response
        }
    }
}
