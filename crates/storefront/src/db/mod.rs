//! Database operations for the storefront `SQLite` store.
//!
//! ## Tables
//!
//! - `users` - Shopper accounts (argon2 password hashes)
//! - `products` - Catalog, seeded at startup
//! - `cart_items` - One row per (user, product) with a quantity
//! - `tower_sessions` - Session storage, owned by `tower-sessions-sqlx-store`
//!
//! # Migrations
//!
//! Migrations live in `crates/storefront/migrations/`, are embedded at
//! compile time, and run on every startup via [`run_migrations`] (they are
//! idempotent). They can also be applied by hand:
//! ```bash
//! cargo run -p green-wally-cli -- migrate
//! ```

pub mod cart;
pub mod products;
pub mod users;

use std::str::FromStr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::SqlitePool;
use sqlx::migrate::MigrateError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;

pub use cart::CartRepository;
pub use products::ProductRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique username).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `SQLite` connection pool.
///
/// The database file is created if missing and foreign keys are enforced on
/// every connection. An in-memory URL gets a single long-lived connection,
/// since each `SQLite` memory connection is its own database.
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is invalid or the connection cannot be established.
pub async fn create_pool(database_url: &SecretString) -> Result<SqlitePool, sqlx::Error> {
    let url = database_url.expose_secret();
    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    if url.contains(":memory:") {
        return SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await;
    }

    SqlitePoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}

/// Apply the embedded schema migrations.
///
/// # Errors
///
/// Returns `MigrateError` if a migration fails or the history is inconsistent.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Map an insert error, turning a `UNIQUE` violation into `Conflict`.
///
/// `what` names the offending column in the returned error; `SQLite` reports
/// the violated column as `table.column` in the message.
pub(crate) fn map_unique_violation(err: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = err
        && db_err.is_unique_violation()
    {
        let column = db_err
            .message()
            .rsplit_once('.')
            .map_or("value", |(_, column)| column)
            .to_owned();
        return RepositoryError::Conflict(column);
    }
    RepositoryError::Database(err)
}

#[cfg(test)]
pub(crate) mod test_support {
    use secrecy::SecretString;
    use sqlx::SqlitePool;

    /// Fresh migrated in-memory database.
    #[allow(clippy::expect_used)]
    pub async fn memory_pool() -> SqlitePool {
        let pool = super::create_pool(&SecretString::from("sqlite::memory:"))
            .await
            .expect("in-memory pool");
        super::run_migrations(&pool).await.expect("migrations");
        pool
    }
}
