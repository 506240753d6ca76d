//! Catalog seeding.
//!
//! The storefront ships with a fixed list of grocery products that is
//! inserted at startup. Seeding is idempotent by product name and is not
//! wrapped in a transaction: if an insert fails part way, the products
//! already written stay written and the next run picks up the rest.

use sqlx::SqlitePool;
use tracing::{debug, info, instrument};

use green_wally_core::Price;

use crate::db::{ProductRepository, RepositoryError};
use crate::models::NewProduct;

/// `(name, price, description, image, stock)`
type SeedRow = (&'static str, u32, &'static str, &'static str, u32);

const DEFAULT_CATALOG: &[SeedRow] = &[
    ("Rice", 45, "Premium quality rice, perfect for daily cooking.", "rice.jpg", 100),
    ("Milk", 32, "Fresh full cream milk, rich in calcium.", "milk.jpg", 50),
    ("Shampoo", 180, "Gentle hair care shampoo for all hair types.", "shampoo.jpg", 30),
    ("Sunflower Oil", 120, "Pure sunflower oil for healthy cooking.", "sunflower-oil.jpg", 40),
    ("Mango", 60, "Fresh and sweet mangoes.", "mango.jpg", 75),
    ("Bread", 35, "Fresh white bread, perfect for breakfast.", "bread.jpg", 45),
    ("Orange", 80, "Fresh juicy oranges, rich in vitamin C.", "orange.jpg", 70),
    ("Biscuits", 20, "Crispy and delicious biscuits.", "biscuit.jpg", 120),
    ("Grapes", 150, "Fresh green grapes, sweet and juicy.", "graps.jpg", 40),
    ("Colgate Toothpaste", 85, "Fresh breath and strong teeth.", "colgate.jpg", 60),
    ("Potatoes", 25, "Fresh potatoes for cooking.", "potetos.jpg", 150),
    ("Onions", 35, "Fresh onions for cooking.", "onion.jpg", 100),
    ("Salt", 20, "Pure iodized salt.", "salt.jpg", 200),
    ("Sugar", 45, "Pure white sugar.", "sugar.jpg", 150),
    ("Toor Dal", 120, "Premium quality toor dal.", "toor dal.jpg", 60),
    ("Wheat Flour", 55, "Pure wheat flour for rotis and breads.", "wheat flour.jpg", 90),
];

/// The built-in product list.
#[must_use]
pub fn default_catalog() -> Vec<NewProduct> {
    DEFAULT_CATALOG
        .iter()
        .map(|&(name, price, description, image, stock)| NewProduct {
            name: name.to_string(),
            price: Price::whole(price),
            description: Some(description.to_string()),
            image: Some(image.to_string()),
            stock,
        })
        .collect()
}

/// Result of a seeding run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedResult {
    /// Products inserted.
    pub inserted: u64,
    /// Products skipped because the name already exists.
    pub skipped: u64,
}

/// Insert every product whose name is not already in the catalog.
///
/// # Errors
///
/// Returns the first `RepositoryError`; earlier inserts are kept.
#[instrument(skip_all, fields(products = products.len()))]
pub async fn seed_catalog(
    pool: &SqlitePool,
    products: &[NewProduct],
) -> Result<SeedResult, RepositoryError> {
    let repo = ProductRepository::new(pool);
    let mut result = SeedResult::default();

    for product in products {
        if repo.insert_if_absent(product).await? {
            result.inserted += 1;
        } else {
            result.skipped += 1;
            debug!(name = %product.name, "Skipping existing product");
        }
    }

    info!(
        inserted = result.inserted,
        skipped = result.skipped,
        "Catalog seeding complete"
    );

    Ok(result)
}
