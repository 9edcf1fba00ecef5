//! Property records owned by the catalog

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a property record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PropertySource {
    Agoda,
    Booking,
    Airbnb,
    /// Our own dataset
    Local,
}

impl fmt::Display for PropertySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PropertySource::Agoda => "AGODA",
            PropertySource::Booking => "BOOKING",
            PropertySource::Airbnb => "AIRBNB",
            PropertySource::Local => "LOCAL",
        };
        write!(f, "{}", s)
    }
}

/// A single bookable property in a city
///
/// Snapshots handed out by a gateway are never mutated by consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    /// Unique identifier
    pub id: String,
    /// Human-readable name (e.g. "Palm Villa Mirissa")
    pub name: String,
    /// City or region this property belongs to; `location` on the wire
    #[serde(rename = "location", alias = "city")]
    pub city: String,
    /// Price per night in catalog currency units
    pub price: f64,
    /// Rating out of five stars
    pub rating: f64,
    /// Amenity labels (e.g. "WiFi", "Pool", "Breakfast")
    #[serde(default)]
    pub amenities: Vec<String>,
    /// Provider that supplied the record
    #[serde(default = "default_source")]
    pub source: PropertySource,
}

fn default_source() -> PropertySource {
    PropertySource::Local
}

impl Property {
    /// Case-insensitive city comparison
    pub fn in_city(&self, city: &str) -> bool {
        self.city.trim().eq_ignore_ascii_case(city.trim())
    }

    /// True if any amenity contains `needle`, ignoring case
    pub fn has_amenity(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return false;
        }
        self.amenities.iter().any(|a| a.to_lowercase().contains(&needle))
    }

    /// Check the record is usable: rating within 0-5, non-negative price, non-empty id
    pub fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err(format!("property '{}' has an empty id", self.name));
        }
        if !(0.0..=5.0).contains(&self.rating) {
            return Err(format!("property {} has rating {} outside 0-5", self.id, self.rating));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(format!("property {} has invalid price {}", self.id, self.price));
        }
        Ok(())
    }
}
