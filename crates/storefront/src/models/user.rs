//! User domain types.

use chrono::{DateTime, Utc};

use green_wally_core::{Email, UserId, Username};

/// A registered shopper (domain type).
///
/// The password hash is deliberately absent; it only leaves the database
/// through [`crate::db::UserRepository::get_password_hash`].
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Unique login name.
    pub username: Username,
    /// Unique email address.
    pub email: Email,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}
