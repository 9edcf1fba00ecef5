//! Engine error types

use hotelcatalog::CatalogError;
use thiserror::Error;

/// Errors that fail a planning or price-comparison call
///
/// Provider outages never appear here; they degrade to fallback links inside
/// the aggregator.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Unknown destination: {0}")]
    UnknownDestination(String),

    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(#[source] CatalogError),

    #[error("Property not found: {0}")]
    PropertyNotFound(String),
}

impl EngineError {
    /// Check if the caller's input caused this error
    pub fn is_client_error(&self) -> bool {
        match self {
            EngineError::InvalidRequest(_) => true,
            EngineError::UnknownDestination(_) => true,
            EngineError::PropertyNotFound(_) => true,
            EngineError::CatalogUnavailable(_) => false,
        }
    }
}

impl From<CatalogError> for EngineError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(id) => EngineError::PropertyNotFound(id),
            other => EngineError::CatalogUnavailable(other),
        }
    }
}
