//! Request and plan types exchanged with callers

mod plan;
mod request;

pub use plan::{DayPlan, PlanResult, RouteStop, Totals};
pub use request::{DEFAULT_CURRENCY, TripRequest};
