//! Authentication route handlers.
//!
//! Registration, username/password login and logout. Failures the shopper
//! can fix are reported with flash messages, never error pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{AuthContext, PageContext, RequireAuth, push_flash};
use crate::models::Flash;
use crate::services::{AuthError, AuthService};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub page: PageContext,
    pub username: String,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub page: PageContext,
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
#[allow(clippy::unused_async)]
pub async fn register_page(page: PageContext) -> impl IntoResponse {
    RegisterTemplate { page }
}

/// Handle registration form submission.
///
/// On success flashes a confirmation and redirects to the login page; on a
/// duplicate or malformed field flashes the reason and redirects back.
#[instrument(skip_all, fields(username = %form.username))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    let result = AuthService::new(state.pool())
        .register(&form.username, &form.email, &form.password)
        .await;

    match result {
        Ok(_) => {
            push_flash(&session, Flash::success("Registration successful!")).await?;
            Ok(Redirect::to("/login").into_response())
        }
        Err(err) if err.is_user_facing() => {
            tracing::info!(reason = %err, "Registration rejected");
            push_flash(&session, Flash::error(err.to_string())).await?;
            Ok(Redirect::to("/register").into_response())
        }
        Err(err) => Err(err.into()),
    }
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
#[allow(clippy::unused_async)]
pub async fn login_page(page: PageContext) -> impl IntoResponse {
    LoginTemplate {
        page,
        username: String::new(),
    }
}

/// Handle login form submission.
///
/// A wrong username or password re-renders the form with a flash and leaves
/// the session untouched.
#[instrument(skip_all, fields(username = %form.username))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    match AuthService::new(state.pool())
        .login(&form.username, &form.password)
        .await
    {
        Ok(user) => {
            session.sign_in(&user).await?;
            set_sentry_user(&user.id, user.username.as_str());
            tracing::info!(user_id = %user.id, "Signed in");
            Ok(Redirect::to("/").into_response())
        }
        Err(AuthError::InvalidCredentials) => {
            tracing::info!("Login failed");
            let mut page = PageContext::load(&session, &state).await?;
            page.flash(Flash::error(AuthError::InvalidCredentials.to_string()));
            Ok(LoginTemplate {
                page,
                username: form.username,
            }
            .into_response())
        }
        Err(err) => Err(err.into()),
    }
}

/// End the session and return to the catalog.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn logout(RequireAuth(user): RequireAuth, session: Session) -> Result<Redirect, AppError> {
    session.sign_out().await?;
    clear_sentry_user();
    tracing::info!("Signed out");
    Ok(Redirect::to("/"))
}
