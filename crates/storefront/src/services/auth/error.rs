//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during registration and login.
///
/// Every variant except `Repository` and `PasswordHash` is a user-facing
/// failure that the route layer turns into a flash message.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Username is already registered.
    #[error("Username already exists")]
    UsernameTaken,

    /// Email is already registered.
    #[error("Email already registered")]
    EmailTaken,

    /// Username is empty or too long.
    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] green_wally_core::UsernameError),

    /// Email is malformed.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] green_wally_core::EmailError),

    /// Password is empty.
    #[error("Password is required")]
    EmptyPassword,

    /// Unknown username or wrong password.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

impl AuthError {
    /// Whether this error should be reported to the user rather than treated
    /// as a server failure.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        !matches!(self, Self::Repository(_) | Self::PasswordHash)
    }
}
