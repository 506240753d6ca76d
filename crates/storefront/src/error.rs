//! Unified error handling with Sentry integration.
//!
//! Route handlers return `Result<T, AppError>`. Expected failures (bad form
//! input, duplicate usernames, wrong passwords) are not errors at this level;
//! handlers turn them into flash messages before they get here.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::filters;
use crate::middleware::PageContext;
use crate::services::{AuthError, CartError};

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Cart operation failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Session store read or write failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) | Self::Cart(CartError::ProductNotFound(_)) => StatusCode::NOT_FOUND,
            Self::Auth(err) if err.is_user_facing() => StatusCode::BAD_REQUEST,
            Self::Database(_)
            | Self::Auth(_)
            | Self::Cart(_)
            | Self::Session(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Page rendered for unknown routes and missing products.
#[derive(Template, WebTemplate)]
#[template(path = "404.html")]
pub struct NotFoundTemplate {
    pub page: PageContext,
}

/// Response extension marking a rendered 404 page.
///
/// `AppError` has no access to the session, so it renders the page with an
/// anonymous layout. [`crate::middleware::render_not_found`] re-renders
/// marked responses with the shopper's own layout.
#[derive(Debug, Clone, Copy)]
pub struct NotFoundPage;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        match status {
            StatusCode::NOT_FOUND => {
                tracing::debug!(error = %self, "Not found");
                let mut response = (
                    status,
                    NotFoundTemplate {
                        page: PageContext::default(),
                    },
                )
                    .into_response();
                response.extensions_mut().insert(NotFoundPage);
                response
            }
            StatusCode::BAD_REQUEST => {
                tracing::debug!(error = %self, "Rejected request");
                (status, self.to_string()).into_response()
            }
            _ => {
                let event_id = sentry::capture_error(&self);
                tracing::error!(
                    error = %self,
                    sentry_event_id = %event_id,
                    "Request error"
                );
                // Don't expose internal error details to clients
                (status, "Internal server error").into_response()
            }
        }
    }
}

/// Fallback handler for unmatched routes.
#[allow(clippy::unused_async)]
pub async fn not_found() -> AppError {
    AppError::NotFound("no such page".to_string())
}

/// Set the Sentry user context after sign-in.
pub fn set_sentry_user(user_id: &impl ToString, username: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            username: Some(username.to_string()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
