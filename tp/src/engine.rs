//! Engine wiring: one planner and one price aggregator over shared parts

use chrono::NaiveDate;
use eyre::{Context, Result};
use hotelcatalog::CatalogGateway;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::{Config, PlannerConfig, PricingConfig};
use crate::domain::{PlanResult, TripRequest};
use crate::error::EngineError;
use crate::planner::TripPlanner;
use crate::pricing::{LinkBuilder, PriceAggregator, PriceCache, PriceComparison, ProviderAdapter, create_adapters};
use crate::reference::ReferenceTables;

/// Planning and price comparison over one catalog
pub struct Engine {
    catalog: Arc<dyn CatalogGateway>,
    planner: TripPlanner,
    aggregator: PriceAggregator,
    links: Arc<LinkBuilder>,
    default_guests: u32,
}

impl Engine {
    /// Build an engine from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        debug!("Engine::from_config: called");
        config.validate()?;

        let catalog: Arc<dyn CatalogGateway> = Arc::new(config.catalog.open()?);
        let reference = Arc::new(config.reference.load()?);
        let links = Arc::new(LinkBuilder::from_config(&config.providers));
        let adapters = create_adapters(&config.providers).context("Failed to create provider adapters")?;

        info!(
            providers = adapters.len(),
            itineraries = reference.itineraries.len(),
            "Engine ready"
        );
        Ok(Self::with_parts(
            catalog,
            reference,
            config.planner.clone(),
            &config.pricing,
            links,
            adapters,
        ))
    }

    /// Build an engine from already constructed parts
    pub fn with_parts(
        catalog: Arc<dyn CatalogGateway>,
        reference: Arc<ReferenceTables>,
        planner: PlannerConfig,
        pricing: &PricingConfig,
        links: Arc<LinkBuilder>,
        adapters: Vec<Arc<dyn ProviderAdapter>>,
    ) -> Self {
        debug!(adapters = adapters.len(), "Engine::with_parts: called");
        let cache = Arc::new(PriceCache::new(pricing.cache_ttl(), pricing.cache_max_entries));
        let aggregator = PriceAggregator::new(
            Arc::clone(&catalog),
            adapters,
            Arc::clone(&links),
            cache,
            pricing.deadline(),
        );
        let planner = TripPlanner::new(Arc::clone(&catalog), reference, planner, Arc::clone(&links));
        Self {
            catalog,
            planner,
            aggregator,
            links,
            default_guests: pricing.default_guests.max(1),
        }
    }

    pub fn catalog(&self) -> &dyn CatalogGateway {
        self.catalog.as_ref()
    }

    pub fn reference(&self) -> &ReferenceTables {
        self.planner.reference()
    }

    pub fn planner(&self) -> &TripPlanner {
        &self.planner
    }

    pub fn aggregator(&self) -> &PriceAggregator {
        &self.aggregator
    }

    pub fn links(&self) -> &LinkBuilder {
        &self.links
    }

    /// Guests assumed when a price comparison does not name a count
    pub fn default_guests(&self) -> u32 {
        self.default_guests
    }

    pub fn plan(&self, request: &TripRequest) -> Result<PlanResult, EngineError> {
        self.planner.plan(request)
    }

    pub async fn compare_prices(
        &self,
        property_id: &str,
        checkin: NaiveDate,
        checkout: NaiveDate,
        guests: Option<u32>,
    ) -> Result<Vec<PriceComparison>, EngineError> {
        let guests = guests.unwrap_or(self.default_guests);
        self.aggregator.compare_prices(property_id, checkin, checkout, guests).await
    }
}
