//! Cart repository.
//!
//! `cart_items` carries `UNIQUE (user_id, product_id)`, so adding a product
//! is a single upsert: concurrent adds of the same product for the same user
//! serialize on the row instead of racing to insert duplicates.

use sqlx::{FromRow, SqlitePool};
use tracing::instrument;

use green_wally_core::{CartItemId, ProductId, Quantity, UserId};

use super::RepositoryError;
use super::products::ProductRow;
use crate::models::{CartItem, CartLine, Product};

#[derive(FromRow)]
struct CartItemRow {
    id: CartItemId,
    user_id: UserId,
    product_id: ProductId,
    quantity: i64,
}

impl TryFrom<CartItemRow> for CartItem {
    type Error = RepositoryError;

    fn try_from(row: CartItemRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            product_id: row.product_id,
            quantity: parse_quantity(row.id, row.quantity)?,
        })
    }
}

#[derive(FromRow)]
struct CartLineRow {
    item_id: CartItemId,
    quantity: i64,
    #[sqlx(flatten)]
    product: ProductRow,
}

impl TryFrom<CartLineRow> for CartLine {
    type Error = RepositoryError;

    fn try_from(row: CartLineRow) -> Result<Self, Self::Error> {
        let quantity = parse_quantity(row.item_id, row.quantity)?;
        let product = Product::try_from(row.product)?;
        Self::new(row.item_id, product, quantity)
            .map_err(|e| RepositoryError::DataCorruption(format!("cart item {}: {e}", row.item_id)))
    }
}

fn parse_quantity(id: CartItemId, raw: i64) -> Result<Quantity, RepositoryError> {
    Quantity::new(raw)
        .map_err(|e| RepositoryError::DataCorruption(format!("cart item {id}: {e}")))
}

/// Repository for per-user cart rows.
pub struct CartRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Add one unit of `product_id` to the user's cart.
    ///
    /// Inserts a row with quantity 1, or increments the existing row's
    /// quantity. Returns the row as it stands after the write.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user or product does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    #[instrument(skip_all, fields(user_id = %user_id, product_id = %product_id))]
    pub async fn add_one(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<CartItem, RepositoryError> {
        let row: CartItemRow = sqlx::query_as(
            r"
            INSERT INTO cart_items (user_id, product_id, quantity)
            VALUES (?, ?, 1)
            ON CONFLICT (user_id, product_id)
            DO UPDATE SET quantity = cart_items.quantity + 1
            RETURNING id, user_id, product_id, quantity
            ",
        )
        .bind(user_id)
        .bind(product_id)
        .fetch_one(self.pool)
        .await
        .map_err(|err| match err {
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                RepositoryError::NotFound
            }
            other => RepositoryError::Database(other),
        })?;

        CartItem::try_from(row)
    }

    /// Every line in the user's cart, joined with its product, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored row is invalid.
    pub async fn find_by_user(&self, user_id: UserId) -> Result<Vec<CartLine>, RepositoryError> {
        let rows: Vec<CartLineRow> = sqlx::query_as(
            r"
            SELECT ci.id AS item_id, ci.quantity,
                   p.id, p.name, p.price, p.description, p.image, p.stock
            FROM cart_items ci
            JOIN products p ON p.id = ci.product_id
            WHERE ci.user_id = ?
            ORDER BY ci.id
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(CartLine::try_from).collect()
    }

    /// Delete every cart row for the user. Returns the number of rows removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    #[instrument(skip_all, fields(user_id = %user_id))]
    pub async fn clear(&self, user_id: UserId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE user_id = ?")
            .bind(user_id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Total units across the user's cart, for the navigation badge.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn unit_count(&self, user_id: UserId) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(quantity), 0) FROM cart_items WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_one(self.pool)
        .await?;
        Ok(count)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use green_wally_core::{Email, Price, Username};

    use super::*;
    use crate::db::test_support::memory_pool;
    use crate::db::{ProductRepository, UserRepository};
    use crate::models::{CartSummary, NewProduct};

    async fn user(pool: &SqlitePool, name: &str) -> UserId {
        UserRepository::new(pool)
            .create(
                &Username::parse(name).unwrap(),
                &Email::parse(&format!("{name}@example.com")).unwrap(),
                "h",
            )
            .await
            .unwrap()
            .id
    }

    async fn product(pool: &SqlitePool, name: &str, price: &str) -> ProductId {
        let repo = ProductRepository::new(pool);
        repo.insert_if_absent(&NewProduct {
            name: name.to_string(),
            price: Price::parse(price).unwrap(),
            description: None,
            image: None,
            stock: 1,
        })
        .await
        .unwrap();
        repo.list_all()
            .await
            .unwrap()
            .into_iter()
            .find(|p| p.name == name)
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn adding_twice_increments_one_row() {
        let pool = memory_pool().await;
        let uid = user(&pool, "asha").await;
        let rice = product(&pool, "Rice", "45").await;
        let repo = CartRepository::new(&pool);

        let first = repo.add_one(uid, rice).await.unwrap();
        let second = repo.add_one(uid, rice).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.quantity.get(), 2);
        assert_eq!(repo.find_by_user(uid).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn add_is_not_limited_by_stock() {
        let pool = memory_pool().await;
        let uid = user(&pool, "ravi").await;
        let salt = product(&pool, "Salt", "20").await;
        let repo = CartRepository::new(&pool);

        for _ in 0..3 {
            repo.add_one(uid, salt).await.unwrap();
        }
        assert_eq!(repo.unit_count(uid).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn unknown_product_is_not_found() {
        let pool = memory_pool().await;
        let uid = user(&pool, "neha").await;

        let err = CartRepository::new(&pool)
            .add_one(uid, ProductId::new(404))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn lines_join_products_and_total() {
        let pool = memory_pool().await;
        let uid = user(&pool, "dev").await;
        let rice = product(&pool, "Rice", "45.00").await;
        let milk = product(&pool, "Milk", "32.00").await;
        let repo = CartRepository::new(&pool);

        repo.add_one(uid, rice).await.unwrap();
        repo.add_one(uid, milk).await.unwrap();
        repo.add_one(uid, rice).await.unwrap();

        let lines = repo.find_by_user(uid).await.unwrap();
        assert_eq!(lines[0].product.name, "Rice");
        assert_eq!(lines[0].quantity.get(), 2);
        assert_eq!(lines[1].product.name, "Milk");

        let summary = CartSummary::from_lines(lines).unwrap();
        assert_eq!(summary.total.to_string(), "122.00");
    }

    #[tokio::test]
    async fn overflowing_line_total_is_reported_not_panicked() {
        let pool = memory_pool().await;
        let uid = user(&pool, "kiran").await;
        let gold = product(&pool, "Gold", "79228162514264337593543950335").await;
        let repo = CartRepository::new(&pool);

        repo.add_one(uid, gold).await.unwrap();
        assert_eq!(repo.find_by_user(uid).await.unwrap().len(), 1);

        repo.add_one(uid, gold).await.unwrap();
        let err = repo.find_by_user(uid).await.unwrap_err();
        assert!(matches!(err, RepositoryError::DataCorruption(_)));
    }

    #[tokio::test]
    async fn carts_are_per_user_and_clear_only_touches_owner() {
        let pool = memory_pool().await;
        let a = user(&pool, "anil").await;
        let b = user(&pool, "bela").await;
        let bread = product(&pool, "Bread", "35").await;
        let repo = CartRepository::new(&pool);

        repo.add_one(a, bread).await.unwrap();
        repo.add_one(b, bread).await.unwrap();

        assert_eq!(repo.clear(a).await.unwrap(), 1);
        assert!(repo.find_by_user(a).await.unwrap().is_empty());
        assert_eq!(repo.find_by_user(b).await.unwrap().len(), 1);
        assert_eq!(repo.clear(a).await.unwrap(), 0);
    }
}
