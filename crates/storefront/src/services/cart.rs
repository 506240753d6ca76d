//! Cart and checkout operations.

use sqlx::SqlitePool;
use thiserror::Error;
use tracing::instrument;

use green_wally_core::{ProductId, UserId};

use crate::db::{CartRepository, ProductRepository, RepositoryError};
use crate::models::{CartItem, CartSummary};

/// Errors from cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The product does not exist.
    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Per-user cart operations.
pub struct CartService<'a> {
    products: ProductRepository<'a>,
    cart: CartRepository<'a>,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            products: ProductRepository::new(pool),
            cart: CartRepository::new(pool),
        }
    }

    /// Add one unit of a product to the user's cart.
    ///
    /// Stock is not consulted.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ProductNotFound` if the product does not exist.
    #[instrument(skip(self))]
    pub async fn add_to_cart(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<CartItem, CartError> {
        if self.products.get_by_id(product_id).await?.is_none() {
            return Err(CartError::ProductNotFound(product_id));
        }

        // The product can still vanish between the check and the upsert.
        self.cart
            .add_one(user_id, product_id)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => CartError::ProductNotFound(product_id),
                other => CartError::Repository(other),
            })
    }

    /// The user's cart lines and total.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if the query fails or the total does
    /// not fit in a decimal.
    pub async fn view_cart(&self, user_id: UserId) -> Result<CartSummary, CartError> {
        let lines = self.cart.find_by_user(user_id).await?;
        CartSummary::from_lines(lines).map_err(|e| {
            RepositoryError::DataCorruption(format!("cart total for user {user_id}: {e}")).into()
        })
    }

    /// Confirm checkout: remove every line from the user's cart.
    ///
    /// There is no payment step and no order record. Returns the now empty
    /// summary shown on the confirmation page.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if the delete fails.
    #[instrument(skip(self))]
    pub async fn checkout(&self, user_id: UserId) -> Result<CartSummary, CartError> {
        let removed = self.cart.clear(user_id).await?;
        tracing::info!(removed, "checkout confirmed");
        Ok(CartSummary::empty())
    }

    /// Units in the user's cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if the query fails.
    pub async fn unit_count(&self, user_id: UserId) -> Result<i64, CartError> {
        Ok(self.cart.unit_count(user_id).await?)
    }
}
