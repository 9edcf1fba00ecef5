//! Deterministic trip planning
//!
//! The planner walks a route stop by stop, picking lodging once per stop and
//! drawing activities per day. All randomness comes from [`SeedSource`].

mod activities;
mod assembler;
mod budget;
mod hotels;
mod route;
mod seed;

pub use activities::ActivityGenerator;
pub use assembler::TripPlanner;
pub use budget::{BudgetAllocation, BudgetAllocator, round_cents};
pub use hotels::{HotelSelection, HotelSelector, LodgingState, score};
pub use route::{distribute_nights, plan_route};
pub use seed::{SeedSource, derive_seed};
