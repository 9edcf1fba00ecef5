//! Route planning: which cities, in what order, for how many nights

use tracing::debug;

use crate::domain::RouteStop;
use crate::error::EngineError;
use crate::reference::{ReferenceTables, WeightedStop};

/// Resolve a destination into stops whose nights add up to `days`
///
/// A destination that is not an itinerary but names a known city becomes a
/// single-stop route.
pub fn plan_route(reference: &ReferenceTables, destination: &str, days: u32) -> Result<Vec<RouteStop>, EngineError> {
    debug!(%destination, %days, "plan_route: called");
    if let Some(itinerary) = reference.itinerary(destination) {
        debug!(itinerary = %itinerary.destination, stops = itinerary.stops.len(), "plan_route: matched itinerary");
        return Ok(distribute_nights(&itinerary.stops, days));
    }
    if let Some(city) = reference.known_city(destination) {
        debug!(%city, "plan_route: single-city route");
        return Ok(vec![RouteStop {
            city: city.to_string(),
            nights: days,
        }]);
    }
    Err(EngineError::UnknownDestination(destination.trim().to_string()))
}

/// Share `days` nights among weighted stops
///
/// Keeps at most `days` stops (heaviest first, earlier wins ties) in their
/// itinerary order, gives each one night, splits the rest by weight rounded
/// down, then hands leftovers to the first stops.
pub fn distribute_nights(stops: &[WeightedStop], days: u32) -> Vec<RouteStop> {
    debug!(stops = stops.len(), %days, "distribute_nights: called");
    if stops.is_empty() || days == 0 {
        return Vec::new();
    }

    let keep = stops.len().min(days as usize);
    let mut ranked: Vec<usize> = (0..stops.len()).collect();
    ranked.sort_by(|a, b| stops[*b].weight.cmp(&stops[*a].weight).then(a.cmp(b)));
    let mut kept: Vec<usize> = ranked.into_iter().take(keep).collect();
    kept.sort_unstable();

    let remaining = u64::from(days) - keep as u64;
    let mut weights: Vec<u64> = kept.iter().map(|i| u64::from(stops[*i].weight)).collect();
    if weights.iter().all(|w| *w == 0) {
        weights.iter_mut().for_each(|w| *w = 1);
    }
    let total_weight: u64 = weights.iter().sum();

    let mut nights: Vec<u64> = weights.iter().map(|w| 1 + remaining * w / total_weight).collect();
    let assigned: u64 = nights.iter().sum();
    let mut leftover = u64::from(days) - assigned;
    let len = nights.len();
    let mut slot = 0;
    while leftover > 0 {
        nights[slot % len] += 1;
        leftover -= 1;
        slot += 1;
    }

    kept.iter()
        .zip(nights)
        .map(|(i, n)| RouteStop {
            city: stops[*i].city.clone(),
            nights: n as u32,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stops(weights: &[(&str, u32)]) -> Vec<WeightedStop> {
        weights
            .iter()
            .map(|(city, weight)| WeightedStop {
                city: city.to_string(),
                weight: *weight,
            })
            .collect()
    }

    fn nights(route: &[RouteStop]) -> Vec<(&str, u32)> {
        route.iter().map(|s| (s.city.as_str(), s.nights)).collect()
    }

    #[test]
    fn test_proportional_split() {
        let route = distribute_nights(&stops(&[("A", 1), ("B", 2), ("C", 1)]), 8);
        // 3 base nights, 5 shared 1:2:1 -> 1,2,1 floored, 1 leftover to A
        assert_eq!(nights(&route), vec![("A", 3), ("B", 3), ("C", 2)]);
    }

    #[test]
    fn test_fewer_days_than_stops_keeps_heaviest_in_order() {
        let route = distribute_nights(&stops(&[("A", 1), ("B", 2), ("C", 1), ("D", 3)]), 2);
        assert_eq!(nights(&route), vec![("B", 1), ("D", 1)]);
    }

    #[test]
    fn test_weight_ties_prefer_earlier_stops() {
        let route = distribute_nights(&stops(&[("A", 2), ("B", 2), ("C", 2)]), 2);
        assert_eq!(nights(&route), vec![("A", 1), ("B", 1)]);
    }

    #[test]
    fn test_nights_sum_to_days() {
        let input = stops(&[("A", 1), ("B", 2), ("C", 2), ("D", 2), ("E", 2), ("F", 1)]);
        for days in 1..=40 {
            let route = distribute_nights(&input, days);
            assert_eq!(route.iter().map(|s| s.nights).sum::<u32>(), days);
            assert!(route.iter().all(|s| s.nights >= 1));
        }
    }

    #[test]
    fn test_plan_route_itinerary_and_alias() {
        let reference = ReferenceTables::embedded().unwrap();
        let route = plan_route(&reference, "  sri lanka ", 5).unwrap();
        assert_eq!(route.len(), 5);
        assert_eq!(route.iter().map(|s| s.nights).sum::<u32>(), 5);
    }

    #[test]
    fn test_plan_route_single_city() {
        let reference = ReferenceTables::embedded().unwrap();
        let route = plan_route(&reference, "kandy", 4).unwrap();
        assert_eq!(nights(&route), vec![("Kandy", 4)]);
    }

    #[test]
    fn test_plan_route_unknown() {
        let reference = ReferenceTables::embedded().unwrap();
        let err = plan_route(&reference, "Nowhereland", 3).unwrap_err();
        assert!(matches!(err, EngineError::UnknownDestination(ref d) if d == "Nowhereland"));
    }
}
