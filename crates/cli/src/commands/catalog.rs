//! Catalog inspection commands.
//!
//! # Usage
//!
//! ```bash
//! storecart-cli catalog check crates/storefront/data/items.json
//! storecart-cli catalog list
//! ```

use std::path::Path;

use storecart_core::{Catalog, Price};
use storecart_storefront::catalog::{CatalogLoadError, load_catalog};

/// Load a catalog and report how many products it holds.
///
/// # Errors
///
/// Returns `CatalogLoadError` if the file cannot be read or is invalid.
pub fn check(path: Option<&Path>) -> Result<(), CatalogLoadError> {
    let catalog = load_catalog(path)?;
    tracing::info!(products = catalog.len(), "Catalog is valid");
    Ok(())
}

/// Print one line per product: id, name and formatted price.
///
/// # Errors
///
/// Returns `CatalogLoadError` if the file cannot be read or is invalid.
pub fn list(path: Option<&Path>) -> Result<(), CatalogLoadError> {
    let catalog = load_catalog(path)?;

    #[allow(clippy::print_stdout)]
    {
        for line in format_lines(&catalog) {
            println!("{line}");
        }
    }
    Ok(())
}

fn format_lines(catalog: &Catalog) -> Vec<String> {
    let name_width = catalog.iter().map(|p| p.name.len()).max().unwrap_or(0);
    catalog
        .iter()
        .map(|product| {
            format!(
                "{:>4}  {:<name_width$}  {}",
                product.id.as_i32(),
                product.name,
                Price::usd(product.price)
            )
        })
        .collect()
}
