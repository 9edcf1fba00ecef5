//! Booking partners the engine can quote from

use hotelcatalog::PropertySource;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A third-party booking partner
///
/// Declaration order is the order comparisons are returned in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Agoda,
    Booking,
    Airbnb,
}

impl Provider {
    /// Every partner, in display order
    pub const ALL: [Provider; 3] = [Provider::Agoda, Provider::Booking, Provider::Airbnb];

    /// Lowercase identifier used in config and JSON
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Agoda => "agoda",
            Provider::Booking => "booking",
            Provider::Airbnb => "airbnb",
        }
    }

    /// Human-readable name
    pub fn label(&self) -> &'static str {
        match self {
            Provider::Agoda => "Agoda",
            Provider::Booking => "Booking.com",
            Provider::Airbnb => "Airbnb",
        }
    }

    /// Environment variable holding the affiliate id by default
    pub fn default_affiliate_env(&self) -> &'static str {
        match self {
            Provider::Agoda => "TRIPPLANNER_AGODA_AFFILIATE_ID",
            Provider::Booking => "TRIPPLANNER_BOOKING_AFFILIATE_ID",
            Provider::Airbnb => "TRIPPLANNER_AIRBNB_AFFILIATE_ID",
        }
    }

    /// Catalog source tag for records supplied by this partner
    pub fn source(&self) -> PropertySource {
        match self {
            Provider::Agoda => PropertySource::Agoda,
            Provider::Booking => PropertySource::Booking,
            Provider::Airbnb => PropertySource::Airbnb,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Provider::ALL
            .iter()
            .copied()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown provider: '{}'. Supported: agoda, booking, airbnb", s))
    }
}
