//! Static reference tables: itineraries, activity pools, amenity keywords and
//! traveler multipliers
//!
//! Compiled in from `data/reference.yml`; a config file can point at a
//! replacement.

mod embedded;
mod tables;

pub use embedded::REFERENCE_YAML;
pub use tables::{CityActivities, Itinerary, ReferenceTables, WeightedStop};
