//! Subcommand implementations.

pub mod migrate;
pub mod products;
pub mod seed;

use green_wally_storefront::config::StorefrontConfig;
use green_wally_storefront::db;
use sqlx::SqlitePool;

/// Connect to the storefront database named by the environment.
async fn connect() -> Result<SqlitePool, Box<dyn std::error::Error>> {
    let config = StorefrontConfig::from_env()?;
    let pool = db::create_pool(&config.database_url).await?;
    tracing::info!("Connected to database");
    Ok(pool)
}
