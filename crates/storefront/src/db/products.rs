//! Product repository: catalog reads and idempotent seeding inserts.

use sqlx::{FromRow, SqlitePool};

use green_wally_core::{Price, ProductId};

use super::RepositoryError;
use crate::models::{NewProduct, Product};

#[derive(FromRow)]
pub(super) struct ProductRow {
    pub(super) id: ProductId,
    pub(super) name: String,
    pub(super) price: String,
    pub(super) description: Option<String>,
    pub(super) image: Option<String>,
    pub(super) stock: i64,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let price = Price::parse(&row.price).map_err(|e| {
            RepositoryError::DataCorruption(format!("product {}: {e}", row.id))
        })?;
        let stock = u32::try_from(row.stock).map_err(|_| {
            RepositoryError::DataCorruption(format!(
                "product {}: stock out of range ({})",
                row.id, row.stock
            ))
        })?;

        Ok(Self {
            id: row.id,
            name: row.name,
            price,
            description: row.description,
            image: row.image,
            stock,
        })
    }
}

/// Repository for catalog queries.
pub struct ProductRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Every product, in insertion order. No filtering or paging.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored price or stock is invalid.
    pub async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> = sqlx::query_as(
            r"
            SELECT id, name, price, description, image, stock
            FROM products
            ORDER BY id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(
            r"
            SELECT id, name, price, description, image, stock
            FROM products
            WHERE id = ?
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Product::try_from).transpose()
    }

    /// Insert `product` unless one with the same name already exists.
    ///
    /// The existence check and insert are a single statement. Returns `true`
    /// if a row was inserted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn insert_if_absent(&self, product: &NewProduct) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            INSERT INTO products (name, price, description, image, stock)
            SELECT ?1, ?2, ?3, ?4, ?5
            WHERE NOT EXISTS (SELECT 1 FROM products WHERE name = ?1)
            ",
        )
        .bind(&product.name)
        .bind(product.price.to_string())
        .bind(product.description.as_deref())
        .bind(product.image.as_deref())
        .bind(i64::from(product.stock))
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Number of products in the catalog.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}
