//! HotelCatalog - read-only property catalog gateway
//!
//! Provides the narrow query contract the trip planner consumes for lodging:
//! filter by city, rating and price, look up by id, and a paginated search
//! used by the hotel browsing commands.
//!
//! # Example
//!
//! ```ignore
//! use hotelcatalog::{CatalogGateway, MemoryCatalog};
//!
//! let catalog = MemoryCatalog::embedded()?;
//! let hotels = catalog.list_properties("Kandy", Some(4.0), Some(120.0))?;
//! let hotel = catalog.get_property(&hotels[0].id)?;
//! ```

mod error;
mod gateway;
mod memory;
mod property;

pub use error::CatalogError;
pub use gateway::{CatalogGateway, PropertyPage, PropertyQuery};
pub use memory::MemoryCatalog;
pub use property::{Property, PropertySource};

/// Default page size for catalog searches
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Largest page size a search will honor
pub const MAX_PAGE_SIZE: usize = 100;
