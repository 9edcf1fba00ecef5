//! Plan assembly: route, lodging, activities and totals for a trip request

use hotelcatalog::{CatalogGateway, Property};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

use super::activities::ActivityGenerator;
use super::budget::{BudgetAllocator, round_cents};
use super::hotels::{HotelSelector, LodgingState};
use super::route::plan_route;
use super::seed::SeedSource;
use crate::config::PlannerConfig;
use crate::domain::{DayPlan, PlanResult, Totals, TripRequest};
use crate::error::EngineError;
use crate::pricing::LinkBuilder;
use crate::reference::ReferenceTables;

/// Builds day-by-day plans from trip requests
///
/// Planning is deterministic: the same request and seed always give the
/// same plan.
pub struct TripPlanner {
    catalog: Arc<dyn CatalogGateway>,
    reference: Arc<ReferenceTables>,
    config: PlannerConfig,
    links: Arc<LinkBuilder>,
}

impl TripPlanner {
    pub fn new(
        catalog: Arc<dyn CatalogGateway>,
        reference: Arc<ReferenceTables>,
        config: PlannerConfig,
        links: Arc<LinkBuilder>,
    ) -> Self {
        debug!(?config, "TripPlanner::new: called");
        Self {
            catalog,
            reference,
            config,
            links,
        }
    }

    pub fn reference(&self) -> &ReferenceTables {
        &self.reference
    }

    /// Plan a trip
    ///
    /// Fails on invalid requests, unknown destinations and catalog errors;
    /// no partial plan is returned.
    pub fn plan(&self, request: &TripRequest) -> Result<PlanResult, EngineError> {
        debug!(destination = %request.destination, days = request.days, "TripPlanner::plan: called");
        request.validate(self.config.max_days)?;
        let currency = request.currency_code()?;
        let seeds = SeedSource::from_request(request.seed);

        let route = plan_route(&self.reference, &request.destination, request.days)?;
        let multiplier = self.reference.traveler_multiplier(request.traveler_type.as_deref());
        let allocation =
            BudgetAllocator::new(self.config.non_lodging_fraction).allocate(request.budget, request.days, multiplier);
        debug!(?route, ?allocation, seed = seeds.seed(), "TripPlanner::plan: route and budget ready");

        let interests = request.normalized_interests();
        let selector = HotelSelector::new(
            self.catalog.as_ref(),
            &self.reference,
            &self.config,
            &interests,
            request.vary_hotels,
        );
        let generator = ActivityGenerator::new(&self.reference, self.config.activities_per_day);

        let mut lodging_state = LodgingState::default();
        let mut used_activities: HashSet<String> = HashSet::new();
        let mut days: Vec<DayPlan> = Vec::with_capacity(request.days as usize);
        let mut recommended: Vec<Property> = Vec::new();
        let mut lodging = 0.0;
        let mut non_lodging = 0.0;

        for (stop_index, stop) in route.iter().enumerate() {
            let mut hotel_rng = seeds.rng("hotel", stop_index as u64);
            let selection = selector.select(&stop.city, allocation.per_night, &mut lodging_state, &mut hotel_rng)?;

            if let Some(hotel) = &selection.hotel {
                if !recommended.iter().any(|p| p.id == hotel.id) {
                    recommended.push(hotel.clone());
                }
            }

            for night in 0..stop.nights {
                let day = days.len() as u32 + 1;
                let mut activity_rng = seeds.rng("activities", u64::from(day));
                let activities = generator.generate(&stop.city, &interests, &mut used_activities, &mut activity_rng);

                let notes = if night == 0 {
                    let mut parts = vec![format!("Arrive in {}", stop.city)];
                    parts.extend(selection.note.clone());
                    Some(parts.join("; "))
                } else if selection.hotel.is_none() {
                    selection.note.clone()
                } else {
                    None
                };

                if let Some(hotel) = &selection.hotel {
                    lodging += hotel.price;
                }
                non_lodging += allocation.daily_non_lodging;

                days.push(DayPlan {
                    day,
                    city: stop.city.clone(),
                    hotel: selection.hotel.clone(),
                    activities,
                    daily_spend_estimate: allocation.daily_non_lodging,
                    notes,
                });
            }
        }

        let totals = Totals::new(round_cents(lodging), round_cents(non_lodging), request.budget);
        let fallback_links = self.links.build_all(request.destination.trim());

        info!(
            destination = %request.destination,
            days = days.len(),
            stops = route.len(),
            trip = totals.trip,
            over_budget = totals.over_budget,
            seed = seeds.seed(),
            "Planned trip"
        );

        Ok(PlanResult {
            route,
            per_night_budget: allocation.per_night,
            days,
            recommended_hotels: recommended,
            totals,
            fallback_links,
            currency,
            seed: seeds.seed(),
        })
    }
}
