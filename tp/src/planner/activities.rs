//! Daily activity draws that never repeat within a trip

use rand_chacha::ChaCha8Rng;
use rand::seq::IndexedRandom;
use std::collections::HashSet;
use tracing::debug;

use crate::reference::ReferenceTables;

/// Draws activities for each day from the reference pools
pub struct ActivityGenerator<'a> {
    reference: &'a ReferenceTables,
    per_day: usize,
}

impl<'a> ActivityGenerator<'a> {
    pub fn new(reference: &'a ReferenceTables, per_day: usize) -> Self {
        Self { reference, per_day }
    }

    /// Pick up to `per_day` activities in `city`, interest pools first
    ///
    /// Anything in `used` is skipped, and every pick is added to it. Returns
    /// fewer than `per_day` when the pools run dry.
    pub fn generate(&self, city: &str, interests: &[String], used: &mut HashSet<String>, rng: &mut ChaCha8Rng) -> Vec<String> {
        debug!(%city, ?interests, used = used.len(), "ActivityGenerator::generate: called");
        let Some(pools) = self.reference.activities_for(city) else {
            debug!(%city, "ActivityGenerator::generate: no activity pools");
            return Vec::new();
        };

        let interest_pool = unused(interests.iter().flat_map(|i| pools.for_interest(i)), used);
        let mut picked: Vec<String> = interest_pool
            .choose_multiple(rng, self.per_day)
            .cloned()
            .collect();
        used.extend(picked.iter().cloned());

        let short = self.per_day.saturating_sub(picked.len());
        if short > 0 {
            let general_pool = unused(pools.general.iter(), used);
            let top_up: Vec<String> = general_pool.choose_multiple(rng, short).cloned().collect();
            used.extend(top_up.iter().cloned());
            picked.extend(top_up);
        }

        debug!(%city, count = picked.len(), "ActivityGenerator::generate: done");
        picked
    }
}

/// Distinct activities not yet used, in pool order
fn unused<'p>(pool: impl Iterator<Item = &'p String>, used: &HashSet<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for activity in pool {
        if !used.contains(activity) && !out.contains(activity) {
            out.push(activity.clone());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn reference() -> ReferenceTables {
        ReferenceTables::from_yaml_str(
            r#"
itineraries: []
activities:
  Alpha:
    general: [g1, g2, g3, g4]
    interests:
      Food: [f1, f2]
      Surfing: [s1, f1]
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_interest_pools_come_first() {
        let reference = reference();
        let generator = ActivityGenerator::new(&reference, 3);
        let mut used = HashSet::new();
        let picked = generator.generate(
            "alpha",
            &["food".to_string(), "Surfing".to_string()],
            &mut used,
            &mut ChaCha8Rng::seed_from_u64(3),
        );
        assert_eq!(picked.len(), 3);
        let mut sorted = picked.clone();
        sorted.sort();
        assert_eq!(sorted, vec!["f1", "f2", "s1"]);
    }

    #[test]
    fn test_tops_up_from_general() {
        let reference = reference();
        let generator = ActivityGenerator::new(&reference, 3);
        let mut used = HashSet::new();
        let picked = generator.generate("Alpha", &["Food".to_string()], &mut used, &mut ChaCha8Rng::seed_from_u64(3));
        assert_eq!(picked.len(), 3);
        assert!(picked.contains(&"f1".to_string()));
        assert!(picked.contains(&"f2".to_string()));
        assert!(picked[2].starts_with('g'));
    }

    #[test]
    fn test_never_repeats_and_runs_dry() {
        let reference = reference();
        let generator = ActivityGenerator::new(&reference, 3);
        let mut used = HashSet::new();
        let mut all = Vec::new();
        for day in 0..4 {
            let picked = generator.generate("Alpha", &[], &mut used, &mut ChaCha8Rng::seed_from_u64(day));
            all.extend(picked);
        }
        // Only four general activities exist
        assert_eq!(all.len(), 4);
        let distinct: HashSet<_> = all.iter().collect();
        assert_eq!(distinct.len(), 4);
    }

    #[test]
    fn test_unknown_city_yields_nothing() {
        let reference = reference();
        let generator = ActivityGenerator::new(&reference, 3);
        let picked = generator.generate("Nowhere", &[], &mut HashSet::new(), &mut ChaCha8Rng::seed_from_u64(0));
        assert!(picked.is_empty());
    }
}
