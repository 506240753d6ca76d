//! Catalog seeding command.
//!
//! Seeds the built-in catalog, or a YAML file shaped like:
//!
//! ```yaml
//! - name: Rice
//!   price: "45.00"
//!   description: Premium quality basmati rice
//!   image: rice.jpg
//!   stock: 100
//! ```
//!
//! Products are matched by name, so re-running the command only inserts
//! what is missing.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use green_wally_storefront::catalog::{self, SeedResult};
use green_wally_storefront::models::NewProduct;
use thiserror::Error;
use tracing::info;

/// Problems with a catalog file, caught before touching the database.
#[derive(Debug, Error)]
pub enum CatalogFileError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("product #{0} has an empty name")]
    EmptyName(usize),

    #[error("product \"{0}\" appears more than once")]
    DuplicateName(String),
}

/// Seed the catalog from `file`, or from the built-in list when `None`.
///
/// # Errors
///
/// Returns an error if the file is invalid, the database cannot be opened,
/// or an insert fails.
pub async fn catalog(file: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let products = match file {
        Some(path) => {
            info!("Loading catalog from {}", path.display());
            load_catalog_file(path)?
        }
        None => catalog::default_catalog(),
    };

    let pool = super::connect().await?;
    let SeedResult { inserted, skipped } = catalog::seed_catalog(&pool, &products).await?;

    info!("Seeding complete: {inserted} inserted, {skipped} already present");
    Ok(())
}

/// Read and validate a YAML catalog file.
fn load_catalog_file(path: &Path) -> Result<Vec<NewProduct>, CatalogFileError> {
    let content = std::fs::read_to_string(path).map_err(|source| CatalogFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let products: Vec<NewProduct> =
        serde_yaml::from_str(&content).map_err(|source| CatalogFileError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    validate(&products)?;
    Ok(products)
}

/// Names are the seeding key, so they must be present and distinct.
fn validate(products: &[NewProduct]) -> Result<(), CatalogFileError> {
    let mut seen = HashSet::new();
    for (index, product) in products.iter().enumerate() {
        let name = product.name.trim();
        if name.is_empty() {
            return Err(CatalogFileError::EmptyName(index + 1));
        }
        if !seen.insert(name) {
            return Err(CatalogFileError::DuplicateName(name.to_string()));
        }
    }
    Ok(())
}
