//! Reference table types and lookups

use eyre::{Context, Result, eyre};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use super::embedded::REFERENCE_YAML;

/// A city on a reference itinerary with its share of the nights
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedStop {
    pub city: String,
    pub weight: u32,
}

/// Ordered candidate stops for a destination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Itinerary {
    pub destination: String,
    /// Alternative names that resolve to this itinerary
    #[serde(default)]
    pub aliases: Vec<String>,
    pub stops: Vec<WeightedStop>,
}

impl Itinerary {
    fn answers_to(&self, name: &str) -> bool {
        self.destination.eq_ignore_ascii_case(name) || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
    }
}

/// Activity pools for one city
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CityActivities {
    /// Used to top up a day when interest pools run short
    pub general: Vec<String>,
    /// Interest name -> activities
    pub interests: BTreeMap<String, Vec<String>>,
}

impl CityActivities {
    /// Activities for an interest, matched ignoring case
    pub fn for_interest(&self, interest: &str) -> &[String] {
        self.interests
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(interest))
            .map(|(_, acts)| acts.as_slice())
            .unwrap_or(&[])
    }
}

/// All reference data the planner consults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceTables {
    pub itineraries: Vec<Itinerary>,

    /// City -> activity pools
    pub activities: BTreeMap<String, CityActivities>,

    /// Interest -> amenity keywords
    #[serde(rename = "interest-amenities")]
    pub interest_amenities: BTreeMap<String, Vec<String>>,

    /// Traveler type -> non-lodging spend multiplier
    #[serde(rename = "traveler-multipliers")]
    pub traveler_multipliers: BTreeMap<String, f64>,
}

impl ReferenceTables {
    /// Tables compiled into the binary
    pub fn embedded() -> Result<Self> {
        debug!("ReferenceTables::embedded: called");
        Self::from_yaml_str(REFERENCE_YAML).context("Failed to parse embedded reference tables")
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let tables: Self = serde_yaml::from_str(content).context("Failed to parse reference tables")?;
        tables.validate()?;
        Ok(tables)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).context(format!("Failed to read {}", path.display()))?;
        let tables = Self::from_yaml_str(&content)?;
        info!("Loaded reference tables from: {}", path.display());
        Ok(tables)
    }

    /// Reject tables the planner cannot use
    pub fn validate(&self) -> Result<()> {
        for itinerary in &self.itineraries {
            if itinerary.stops.is_empty() {
                return Err(eyre!("itinerary '{}' has no stops", itinerary.destination));
            }
            if let Some(stop) = itinerary.stops.iter().find(|s| s.weight == 0) {
                return Err(eyre!(
                    "itinerary '{}': stop '{}' has zero weight",
                    itinerary.destination,
                    stop.city
                ));
            }
        }
        if let Some((name, m)) = self
            .traveler_multipliers
            .iter()
            .find(|(_, m)| !m.is_finite() || **m < 0.0)
        {
            return Err(eyre!("traveler multiplier for '{}' is invalid: {}", name, m));
        }
        Ok(())
    }

    /// Itinerary for a destination name or alias, ignoring case
    pub fn itinerary(&self, destination: &str) -> Option<&Itinerary> {
        let name = destination.trim();
        self.itineraries.iter().find(|i| i.answers_to(name))
    }

    /// Canonical spelling of a city known to any table
    pub fn known_city(&self, name: &str) -> Option<&str> {
        let name = name.trim();
        self.itineraries
            .iter()
            .flat_map(|i| i.stops.iter())
            .map(|s| s.city.as_str())
            .chain(self.activities.keys().map(String::as_str))
            .find(|city| city.eq_ignore_ascii_case(name))
    }

    /// Activity pools for a city, ignoring case
    pub fn activities_for(&self, city: &str) -> Option<&CityActivities> {
        self.activities
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(city.trim()))
            .map(|(_, pools)| pools)
    }

    /// Amenity keywords counting toward an interest
    pub fn amenity_keywords(&self, interest: &str) -> &[String] {
        self.interest_amenities
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(interest))
            .map(|(_, keywords)| keywords.as_slice())
            .unwrap_or(&[])
    }

    /// Spend multiplier for a traveler type; unknown or absent types count as 1.0
    pub fn traveler_multiplier(&self, traveler_type: Option<&str>) -> f64 {
        let Some(kind) = traveler_type.map(str::trim).filter(|t| !t.is_empty()) else {
            return 1.0;
        };
        self.traveler_multipliers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(kind))
            .map(|(_, m)| *m)
            .unwrap_or(1.0)
    }
}
