//! Cart types.
//!
//! A cart is not a stored entity: it is the set of `cart_items` rows that
//! belong to one user. [`CartSummary`] is the computed view of that set.

use green_wally_core::{CartItemId, Price, PriceError, ProductId, Quantity, UserId};

use super::Product;

/// One `cart_items` row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartItem {
    pub id: CartItemId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: Quantity,
}

/// A cart row joined with the product it refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub item_id: CartItemId,
    pub product: Product,
    pub quantity: Quantity,
    line_total: Price,
}

impl CartLine {
    /// Join a cart row with its product, computing `price × quantity`.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Overflow` if the line total does not fit in a decimal.
    pub fn new(item_id: CartItemId, product: Product, quantity: Quantity) -> Result<Self, PriceError> {
        let line_total = product.price.times(quantity)?;
        Ok(Self {
            item_id,
            product,
            quantity,
            line_total,
        })
    }

    /// `price × quantity` for this line.
    #[must_use]
    pub const fn line_total(&self) -> Price {
        self.line_total
    }
}

/// Every line in a user's cart plus the computed total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSummary {
    pub lines: Vec<CartLine>,
    pub total: Price,
}

impl CartSummary {
    /// An empty cart with a zero total.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            lines: Vec::new(),
            total: Price::ZERO,
        }
    }

    /// Build a summary, summing `price × quantity` over the lines.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Overflow` if the total does not fit in a decimal.
    pub fn from_lines(lines: Vec<CartLine>) -> Result<Self, PriceError> {
        let total = Price::try_sum(lines.iter().map(CartLine::line_total))?;
        Ok(Self { lines, total })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn unit_count(&self) -> u64 {
        self.lines
            .iter()
            .map(|line| u64::from(line.quantity.get()))
            .sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(id: i64, name: &str, price: &str, quantity: i64) -> CartLine {
        CartLine::new(
            CartItemId::new(id),
            Product {
                id: ProductId::new(id),
                name: name.to_string(),
                price: Price::parse(price).unwrap(),
                description: None,
                image: None,
                stock: 10,
            },
            Quantity::new(quantity).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn total_is_sum_of_price_times_quantity() {
        let summary =
            CartSummary::from_lines(vec![line(1, "Rice", "45.00", 2), line(2, "Milk", "32.00", 1)])
                .unwrap();
        assert_eq!(summary.total, Price::parse("122.00").unwrap());
        assert_eq!(summary.total.to_string(), "122.00");
        assert_eq!(summary.unit_count(), 3);
    }

    #[test]
    fn quantity_is_not_capped_by_stock() {
        let summary = CartSummary::from_lines(vec![line(1, "Salt", "20.00", 500)]).unwrap();
        assert_eq!(summary.total, Price::parse("10000").unwrap());
    }

    #[test]
    fn empty_cart_totals_zero() {
        let summary = CartSummary::from_lines(Vec::new()).unwrap();
        assert!(summary.is_empty());
        assert_eq!(summary, CartSummary::empty());
        assert_eq!(summary.total.to_string(), "0.00");
    }

    #[test]
    fn oversized_line_is_rejected() {
        let max = Product {
            id: ProductId::new(1),
            name: "Gold".to_string(),
            price: Price::parse("79228162514264337593543950335").unwrap(),
            description: None,
            image: None,
            stock: 1,
        };
        let err = CartLine::new(CartItemId::new(1), max, Quantity::new(2).unwrap()).unwrap_err();
        assert_eq!(err, PriceError::Overflow);
    }

    #[test]
    fn overflowing_total_is_rejected() {
        let max = "79228162514264337593543950335";
        let lines = vec![line(1, "Gold", max, 1), line(2, "Rice", "45.00", 1)];
        assert_eq!(CartSummary::from_lines(lines), Err(PriceError::Overflow));
    }
}
