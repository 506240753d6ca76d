//! Authentication context and extractors.
//!
//! The session only carries the signed-in user's id and name. [`RequireAuth`]
//! re-reads the account row on every request, so an account removed out of
//! band stops working at once.

use std::future::Future;

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::db::UserRepository;
use crate::error::AppError;
use crate::models::{CurrentUser, User, session_keys};
use crate::state::AppState;

/// Session capability for reading and changing who is signed in.
pub trait AuthContext {
    /// The signed-in user as recorded in the session, if any.
    fn current_user(
        &self,
    ) -> impl Future<Output = Result<Option<CurrentUser>, tower_sessions::session::Error>> + Send;

    /// Record `user` as signed in. Issues a new session id.
    fn sign_in(
        &self,
        user: &User,
    ) -> impl Future<Output = Result<(), tower_sessions::session::Error>> + Send;

    /// Forget the signed-in user. Pending flash messages survive.
    fn sign_out(&self) -> impl Future<Output = Result<(), tower_sessions::session::Error>> + Send;
}

impl AuthContext for Session {
    async fn current_user(&self) -> Result<Option<CurrentUser>, tower_sessions::session::Error> {
        self.get::<CurrentUser>(session_keys::CURRENT_USER).await
    }

    async fn sign_in(&self, user: &User) -> Result<(), tower_sessions::session::Error> {
        let current = CurrentUser {
            id: user.id,
            username: user.username.clone(),
        };
        self.cycle_id().await?;
        self.insert(session_keys::CURRENT_USER, current).await
    }

    async fn sign_out(&self) -> Result<(), tower_sessions::session::Error> {
        self.remove::<CurrentUser>(session_keys::CURRENT_USER)
            .await?;
        self.cycle_id().await
    }
}

/// Extractor that requires a signed-in user.
///
/// Anonymous requests, and sessions whose account no longer exists, are
/// redirected to `/login`.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireAuth(user): RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", user.username)
/// }
/// ```
pub struct RequireAuth(pub User);

/// Rejection for [`RequireAuth`].
pub enum AuthRejection {
    /// Redirect to the login page.
    RedirectToLogin,
    /// The session or user lookup failed.
    Internal(AppError),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/login").into_response(),
            Self::Internal(err) => err.into_response(),
        }
    }
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| {
                AuthRejection::Internal(AppError::Internal("session layer missing".to_string()))
            })?;

        let current = session
            .current_user()
            .await
            .map_err(|e| AuthRejection::Internal(e.into()))?
            .ok_or(AuthRejection::RedirectToLogin)?;

        let user = UserRepository::new(state.pool())
            .get_by_id(current.id)
            .await
            .map_err(|e| AuthRejection::Internal(e.into()))?;

        let Some(user) = user else {
            tracing::info!(user_id = %current.id, "session refers to a missing account");
            session
                .sign_out()
                .await
                .map_err(|e| AuthRejection::Internal(e.into()))?;
            return Err(AuthRejection::RedirectToLogin);
        };

        tracing::Span::current().record("user_id", tracing::field::display(user.id));
        Ok(Self(user))
    }
}
