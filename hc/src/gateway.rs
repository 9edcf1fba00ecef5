//! CatalogGateway trait definition

use serde::{Deserialize, Serialize};

use crate::{CatalogError, Property};

/// Read-only access to the property catalog
///
/// Implementations must be safe to share across concurrent planning requests;
/// consumers never take locks around calls.
pub trait CatalogGateway: Send + Sync {
    /// Properties in `city`, optionally filtered by minimum rating and maximum
    /// nightly price. Order is stable for identical queries.
    fn list_properties(
        &self,
        city: &str,
        min_rating: Option<f64>,
        max_price: Option<f64>,
    ) -> Result<Vec<Property>, CatalogError>;

    /// Look up a single property by id
    fn get_property(&self, id: &str) -> Result<Property, CatalogError>;

    /// Paginated search across the catalog
    fn search(&self, query: &PropertyQuery) -> Result<PropertyPage, CatalogError>;
}

/// Filters for a paginated catalog search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyQuery {
    /// Substring match on the city, ignoring case
    pub city: Option<String>,
    pub min_rating: Option<f64>,
    pub max_price: Option<f64>,
    /// Every listed amenity must be present
    #[serde(default)]
    pub amenities: Vec<String>,
    /// 1-based page number
    pub page: usize,
    pub page_size: usize,
}

impl Default for PropertyQuery {
    fn default() -> Self {
        Self {
            city: None,
            min_rating: None,
            max_price: None,
            amenities: Vec::new(),
            page: 1,
            page_size: crate::DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of search results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyPage {
    pub items: Vec<Property>,
    pub page: usize,
    pub page_size: usize,
    /// Number of matches across all pages
    pub total: usize,
}

impl PropertyPage {
    /// Number of pages needed for `total` matches
    pub fn page_count(&self) -> usize {
        if self.page_size == 0 {
            return 0;
        }
        self.total.div_ceil(self.page_size)
    }
}
