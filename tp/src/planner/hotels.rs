//! Lodging choice per route stop

use hotelcatalog::{CatalogGateway, Property};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::config::PlannerConfig;
use crate::error::EngineError;
use crate::reference::ReferenceTables;

/// Lodging picked for a stop, with an optional note for the traveler
#[derive(Debug, Clone, PartialEq)]
pub struct HotelSelection {
    pub hotel: Option<Property>,
    pub note: Option<String>,
}

/// Choices made so far in the trip
#[derive(Debug, Default)]
pub struct LodgingState {
    /// First property chosen per city, keyed by lower-case city
    by_city: BTreeMap<String, Property>,
    used_ids: BTreeSet<String>,
}

impl LodgingState {
    pub fn is_used(&self, id: &str) -> bool {
        self.used_ids.contains(id)
    }

    fn remember(&mut self, city: &str, property: &Property) {
        self.used_ids.insert(property.id.clone());
        self.by_city
            .entry(city.to_lowercase())
            .or_insert_with(|| property.clone());
    }

    fn chosen_for(&self, city: &str) -> Option<&Property> {
        self.by_city.get(&city.to_lowercase())
    }
}

/// Score a property: rating plus a bonus per amenity matching an interest
pub fn score(property: &Property, interests: &[String], reference: &ReferenceTables, amenity_weight: f64) -> f64 {
    let overlap = property
        .amenities
        .iter()
        .filter(|amenity| {
            let amenity = amenity.to_lowercase();
            interests.iter().any(|interest| {
                let direct = interest.trim().to_lowercase();
                (!direct.is_empty() && amenity.contains(&direct))
                    || reference
                        .amenity_keywords(interest)
                        .iter()
                        .any(|keyword| amenity.contains(&keyword.to_lowercase()))
            })
        })
        .count();
    property.rating + amenity_weight * overlap as f64
}

/// Picks lodging for each stop from the catalog
pub struct HotelSelector<'a> {
    catalog: &'a dyn CatalogGateway,
    reference: &'a ReferenceTables,
    config: &'a PlannerConfig,
    interests: &'a [String],
    vary_hotels: bool,
}

impl<'a> HotelSelector<'a> {
    pub fn new(
        catalog: &'a dyn CatalogGateway,
        reference: &'a ReferenceTables,
        config: &'a PlannerConfig,
        interests: &'a [String],
        vary_hotels: bool,
    ) -> Self {
        Self {
            catalog,
            reference,
            config,
            interests,
            vary_hotels,
        }
    }

    /// Choose lodging for a stop in `city` given the per-night budget
    pub fn select(
        &self,
        city: &str,
        per_night: f64,
        state: &mut LodgingState,
        rng: &mut ChaCha8Rng,
    ) -> Result<HotelSelection, EngineError> {
        debug!(%city, %per_night, vary = self.vary_hotels, "HotelSelector::select: called");
        if !self.vary_hotels {
            if let Some(previous) = state.chosen_for(city) {
                debug!(id = %previous.id, "HotelSelector::select: reusing earlier choice");
                return Ok(HotelSelection {
                    hotel: Some(previous.clone()),
                    note: None,
                });
            }
        }

        let cap = per_night * self.config.price_tolerance;
        let candidates = self
            .catalog
            .list_properties(city, None, Some(cap))
            .map_err(EngineError::CatalogUnavailable)?;

        if candidates.is_empty() {
            return self.select_cheapest(city, state);
        }

        let pool = self.exclude_used(candidates, state);
        let ranked = self.rank(pool);
        let top = &ranked[..ranked.len().min(self.config.top_k.max(1))];
        let chosen = top[rng.random_range(0..top.len())].clone();
        debug!(id = %chosen.id, top = top.len(), "HotelSelector::select: chosen");

        state.remember(city, &chosen);
        Ok(HotelSelection {
            hotel: Some(chosen),
            note: None,
        })
    }

    /// Nothing fits the budget: take the cheapest property, or report none
    fn select_cheapest(&self, city: &str, state: &mut LodgingState) -> Result<HotelSelection, EngineError> {
        debug!(%city, "HotelSelector::select_cheapest: called");
        let all = self
            .catalog
            .list_properties(city, None, None)
            .map_err(EngineError::CatalogUnavailable)?;
        if all.is_empty() {
            return Ok(HotelSelection {
                hotel: None,
                note: Some(format!("No lodging found in {}", city)),
            });
        }

        let pool = self.exclude_used(all, state);
        let cheapest = pool
            .into_iter()
            .min_by(|a, b| a.price.total_cmp(&b.price).then_with(|| a.id.cmp(&b.id)));
        match cheapest {
            Some(property) => {
                state.remember(city, &property);
                let note = format!("No lodging within budget in {}; showing the cheapest option", city);
                Ok(HotelSelection {
                    hotel: Some(property),
                    note: Some(note),
                })
            }
            None => Ok(HotelSelection {
                hotel: None,
                note: Some(format!("No lodging found in {}", city)),
            }),
        }
    }

    /// Drop already-chosen ids when varying hotels, unless that empties the list
    fn exclude_used(&self, candidates: Vec<Property>, state: &LodgingState) -> Vec<Property> {
        if !self.vary_hotels {
            return candidates;
        }
        let fresh: Vec<Property> = candidates.iter().filter(|p| !state.is_used(&p.id)).cloned().collect();
        if fresh.is_empty() { candidates } else { fresh }
    }

    /// Best first: score, then price, then id
    fn rank(&self, mut pool: Vec<Property>) -> Vec<Property> {
        let weight = self.config.amenity_weight;
        pool.sort_by(|a, b| {
            let sa = score(a, self.interests, self.reference, weight);
            let sb = score(b, self.interests, self.reference, weight);
            sb.total_cmp(&sa)
                .then_with(|| a.price.total_cmp(&b.price))
                .then_with(|| a.id.cmp(&b.id))
        });
        pool
    }
}
