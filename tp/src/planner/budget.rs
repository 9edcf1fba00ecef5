//! Budget split between lodging and daily spend

use tracing::debug;

/// Round a monetary amount to cents
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// How a trip budget is spread over its days
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetAllocation {
    /// Lodging budget for one night
    pub per_night: f64,
    /// Estimated non-lodging spend for one day
    pub daily_non_lodging: f64,
}

/// Splits a total budget into per-night and daily figures
#[derive(Debug, Clone, Copy)]
pub struct BudgetAllocator {
    non_lodging_fraction: f64,
}

impl BudgetAllocator {
    pub fn new(non_lodging_fraction: f64) -> Self {
        Self {
            non_lodging_fraction: non_lodging_fraction.max(0.0),
        }
    }

    /// Allocate `budget` over `days`, scaled by the traveler multiplier
    pub fn allocate(&self, budget: f64, days: u32, multiplier: f64) -> BudgetAllocation {
        debug!(%budget, %days, %multiplier, "BudgetAllocator::allocate: called");
        if days == 0 || !budget.is_finite() || budget <= 0.0 {
            return BudgetAllocation {
                per_night: 0.0,
                daily_non_lodging: 0.0,
            };
        }
        let per_night = round_cents(budget / f64::from(days));
        let daily_non_lodging = round_cents(per_night * self.non_lodging_fraction * multiplier.max(0.0));
        BudgetAllocation {
            per_night,
            daily_non_lodging,
        }
    }
}
