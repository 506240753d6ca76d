//! Database migration command.
//!
//! Applies the storefront migrations embedded in the storefront crate. The
//! storefront also applies them on start, so this is only needed to prepare
//! a database ahead of a deploy.

use green_wally_storefront::db;

/// Run storefront database migrations.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or a migration fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;

    tracing::info!("Running storefront migrations...");
    db::run_migrations(&pool).await?;

    tracing::info!("Storefront migrations complete!");
    Ok(())
}
