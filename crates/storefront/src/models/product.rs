//! Catalog product types.

use serde::Deserialize;

use green_wally_core::{Price, ProductId};

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub description: Option<String>,
    /// File name under `/static/images/products/`.
    pub image: Option<String>,
    /// Units on hand. Informational only; never checked or decremented.
    pub stock: u32,
}

impl Product {
    /// Path of the product image relative to the site root.
    #[must_use]
    pub fn image_url(&self) -> Option<String> {
        self.image
            .as_deref()
            .map(|file| format!("/static/images/products/{file}"))
    }
}

/// A product to be inserted by catalog seeding.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    pub stock: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_url_points_into_static_products() {
        let product = Product {
            id: ProductId::new(1),
            name: "Toor Dal".to_string(),
            price: Price::ZERO,
            description: None,
            image: Some("toor dal.jpg".to_string()),
            stock: 60,
        };
        assert_eq!(
            product.image_url().as_deref(),
            Some("/static/images/products/toor dal.jpg")
        );
    }
}
