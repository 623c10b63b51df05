//! Product catalog loading.
//!
//! The catalog is a static JSON file. A default copy (`data/items.json`) is
//! compiled into the binary; `STOREFRONT_CATALOG_PATH` points at a
//! replacement on disk.

use std::path::{Path, PathBuf};

use storecart_core::{Catalog, CatalogError};
use thiserror::Error;

/// Catalog compiled into the binary.
pub const BUNDLED_CATALOG: &str = include_str!("../data/items.json");

/// Errors loading the catalog at startup.
#[derive(Debug, Error)]
pub enum CatalogLoadError {
    #[error("failed to read catalog {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Invalid(#[from] CatalogError),
}

/// Load the catalog from `path`, or the bundled catalog when `None`.
///
/// # Errors
///
/// Returns `CatalogLoadError` if the file cannot be read or is not a valid
/// catalog.
pub fn load_catalog(path: Option<&Path>) -> Result<Catalog, CatalogLoadError> {
    let catalog = match path {
        Some(path) => {
            let json = std::fs::read_to_string(path).map_err(|source| CatalogLoadError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            Catalog::from_json(&json)?
        }
        None => Catalog::from_json(BUNDLED_CATALOG)?,
    };

    tracing::info!(
        products = catalog.len(),
        source = %path.map_or_else(|| "bundled".to_string(), |p| p.display().to_string()),
        "Catalog loaded"
    );
    Ok(catalog)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use storecart_core::ProductId;

    use super::*;

    #[test]
    fn test_bundled_catalog_is_valid() {
        let catalog = load_catalog(None).unwrap();
        assert!(!catalog.is_empty());
        assert_eq!(catalog.get(ProductId::new(1)).unwrap().name, "Book");
    }

    #[test]
    fn test_bundled_images_are_served_from_static() {
        let catalog = load_catalog(None).unwrap();
        assert!(catalog.iter().all(|p| p.img_url.starts_with("/static/imgs/")));
    }

    #[test]
    fn test_missing_file() {
        let err = load_catalog(Some(Path::new("/nonexistent/items.json"))).unwrap_err();
        assert!(matches!(err, CatalogLoadError::Read { .. }));
    }
}
