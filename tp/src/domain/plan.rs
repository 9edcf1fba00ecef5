//! Planning output types

use hotelcatalog::Property;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::pricing::Provider;

/// A city on the route and how many nights are spent there
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteStop {
    pub city: String,
    pub nights: u32,
}

/// One day of the trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    /// 1-based day index
    pub day: u32,
    pub city: String,
    pub hotel: Option<Property>,
    /// Distinct across the whole trip
    pub activities: Vec<String>,
    /// Suggested non-lodging spend for the day
    pub daily_spend_estimate: f64,
    pub notes: Option<String>,
}

/// Cost summary of a plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub lodging: f64,
    pub non_lodging: f64,
    /// Always `lodging + non_lodging`
    pub trip: f64,
    pub budget: f64,
    /// Always `trip > budget`
    pub over_budget: bool,
}

impl Totals {
    pub fn new(lodging: f64, non_lodging: f64, budget: f64) -> Self {
        let trip = lodging + non_lodging;
        Self {
            lodging,
            non_lodging,
            trip,
            budget,
            over_budget: trip > budget,
        }
    }

    /// Budget left after the trip; negative when over budget
    pub fn remaining(&self) -> f64 {
        self.budget - self.trip
    }
}

/// Complete itinerary returned by the planner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanResult {
    pub route: Vec<RouteStop>,
    pub per_night_budget: f64,
    pub days: Vec<DayPlan>,
    /// Distinct selected properties, by first appearance
    pub recommended_hotels: Vec<Property>,
    pub totals: Totals,
    /// Destination search links, one per provider
    pub fallback_links: BTreeMap<Provider, String>,
    pub currency: String,
    /// Seed the plan was drawn with; replaying it reproduces the plan
    pub seed: u64,
}

impl PlanResult {
    pub fn total_nights(&self) -> u32 {
        self.route.iter().map(|s| s.nights).sum()
    }
}
