//! TripPlanner - itinerary planning and provider price aggregation
//!
//! TripPlanner turns a trip request (destination, days, budget, interests,
//! traveler type) into a day-by-day route with lodging and activities, and
//! compares a property's price across booking partners.
//!
//! # Core Concepts
//!
//! - **Deterministic plans**: every random draw comes from the request seed,
//!   so a seeded request always yields the same plan
//! - **Degrade, don't fail**: a partner that errors or runs late is replaced
//!   by a search link instead of failing the comparison
//! - **One fetch per key**: concurrent comparisons for the same stay share a
//!   single upstream fan-out and a TTL cache
//!
//! # Modules
//!
//! - [`planner`] - route, lodging, activity and budget planning
//! - [`pricing`] - provider adapters, fallback links, cache and aggregator
//! - [`reference`] - itineraries, activity pools and policy tables
//! - [`domain`] - request and plan types
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod cli;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod money;
pub mod planner;
pub mod pricing;
pub mod reference;

// Re-export commonly used types
pub use config::{Config, PlannerConfig, PricingConfig, ProviderConfig};
pub use domain::{DayPlan, PlanResult, RouteStop, Totals, TripRequest};
pub use engine::Engine;
pub use error::EngineError;
pub use money::format_money;
pub use planner::TripPlanner;
pub use pricing::{
    HttpQuoteAdapter, LinkBuilder, PriceAggregator, PriceCache, PriceComparison, Provider, ProviderAdapter,
    ProviderError, ProviderQuote, QuoteRequest, QuoteStatus, create_adapters,
};
pub use reference::ReferenceTables;
