//! Catalog inspection commands.

use green_wally_storefront::db::ProductRepository;
use tracing::info;

/// List every product in id order.
///
/// # Errors
///
/// Returns an error if the database cannot be read.
pub async fn list() -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;
    let products = ProductRepository::new(&pool).list_all().await?;

    info!("Catalog ({} products)", products.len());
    info!("========================");
    for product in &products {
        info!(
            "  #{:<3} {:<20} {:>8}  stock {}",
            product.id, product.name, product.price, product.stock
        );
    }

    Ok(())
}
