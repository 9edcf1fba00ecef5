//! Catalog error types

use thiserror::Error;

/// Errors returned by a catalog gateway
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Property not found: {0}")]
    NotFound(String),

    #[error("Catalog unavailable: {0}")]
    Unavailable(String),

    #[error("Catalog I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid catalog data: {0}")]
    Parse(String),
}
