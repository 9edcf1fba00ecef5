//! Concurrent price comparison across booking providers

use chrono::{DateTime, NaiveDate, Utc};
use futures::FutureExt;
use futures::future::join_all;
use hotelcatalog::CatalogGateway;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, timeout_at};
use tracing::{debug, info, warn};

use super::cache::{Fetched, PriceCache, QuoteKey};
use super::{LinkBuilder, Provider, ProviderAdapter, ProviderError, QuoteRequest};
use crate::error::EngineError;

/// Whether a comparison entry carries a live price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStatus {
    Live,
    /// No quote; `url` is a search link
    Fallback,
}

/// One provider's entry in a price comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceComparison {
    pub provider: Provider,
    pub price: Option<f64>,
    pub url: String,
    pub fetched_at: Option<DateTime<Utc>>,
    pub status: QuoteStatus,
}

impl PriceComparison {
    fn fallback(provider: Provider, links: &LinkBuilder, term: &str) -> Self {
        Self {
            provider,
            price: None,
            url: links.build(provider, term),
            fetched_at: None,
            status: QuoteStatus::Fallback,
        }
    }

    pub fn is_live(&self) -> bool {
        self.status == QuoteStatus::Live
    }
}

/// Fans out quote requests to every configured provider
pub struct PriceAggregator {
    catalog: Arc<dyn CatalogGateway>,
    adapters: Arc<Vec<Arc<dyn ProviderAdapter>>>,
    links: Arc<LinkBuilder>,
    cache: Arc<PriceCache>,
    deadline: Duration,
}

impl PriceAggregator {
    /// Adapters are reordered into provider order; the first adapter per provider wins
    pub fn new(
        catalog: Arc<dyn CatalogGateway>,
        adapters: Vec<Arc<dyn ProviderAdapter>>,
        links: Arc<LinkBuilder>,
        cache: Arc<PriceCache>,
        deadline: Duration,
    ) -> Self {
        debug!(adapter_count = adapters.len(), ?deadline, "PriceAggregator::new: called");
        let mut ordered: Vec<Arc<dyn ProviderAdapter>> = Vec::with_capacity(adapters.len());
        for adapter in adapters {
            if ordered.iter().any(|a| a.provider() == adapter.provider()) {
                warn!(provider = %adapter.provider(), "Duplicate provider adapter ignored");
                continue;
            }
            ordered.push(adapter);
        }
        ordered.sort_by_key(|a| a.provider());

        Self {
            catalog,
            adapters: Arc::new(ordered),
            links,
            cache,
            deadline,
        }
    }

    /// Providers that appear in every comparison, in output order
    pub fn providers(&self) -> Vec<Provider> {
        self.adapters.iter().map(|a| a.provider()).collect()
    }

    /// Compare a property's price for a stay across all configured providers
    ///
    /// Returns exactly one entry per provider in provider order. A provider that
    /// errors or misses the deadline gets a fallback search link instead of a
    /// price; only invalid input or catalog failures fail the call.
    pub async fn compare_prices(
        &self,
        property_id: &str,
        checkin: NaiveDate,
        checkout: NaiveDate,
        guests: u32,
    ) -> Result<Vec<PriceComparison>, EngineError> {
        debug!(%property_id, %checkin, %checkout, %guests, "PriceAggregator::compare_prices: called");
        if checkout <= checkin {
            return Err(EngineError::InvalidRequest(format!(
                "checkout {} must be after checkin {}",
                checkout, checkin
            )));
        }
        if guests < 1 {
            return Err(EngineError::InvalidRequest("guests must be at least 1".to_string()));
        }

        let property = self.catalog.get_property(property_id)?;
        let request = QuoteRequest {
            property_id: property.id.clone(),
            property_name: property.name.clone(),
            city: property.city.clone(),
            checkin,
            checkout,
            guests,
        };
        let key = QuoteKey {
            property_id: property.id,
            checkin,
            checkout,
            guests,
        };

        let adapters = Arc::clone(&self.adapters);
        let links = Arc::clone(&self.links);
        let deadline = self.deadline;
        let comparison = self
            .cache
            .get_or_fetch(key, move || fan_out(adapters, links, request, deadline).boxed())
            .await;

        let live = comparison.iter().filter(|c| c.is_live()).count();
        info!(%property_id, live, total = comparison.len(), "Price comparison complete");
        Ok(comparison)
    }
}

/// Query every adapter concurrently and merge in provider order
async fn fan_out(
    adapters: Arc<Vec<Arc<dyn ProviderAdapter>>>,
    links: Arc<LinkBuilder>,
    request: QuoteRequest,
    deadline: Duration,
) -> Fetched {
    debug!(property_id = %request.property_id, adapters = adapters.len(), "fan_out: called");
    let started = Instant::now();
    let shared_deadline = started + deadline;

    let calls = adapters.iter().map(|adapter| {
        let request = &request;
        async move {
            let limit = shared_deadline.min(Instant::now() + adapter.timeout());
            let outcome = match timeout_at(limit, adapter.quote(request)).await {
                Ok(result) => result,
                Err(_) => Err(ProviderError::Timeout(limit.saturating_duration_since(started))),
            };
            (adapter.provider(), outcome)
        }
    });

    // join_all keeps input order, so arrival order never leaks into the output
    let mut cacheable = true;
    let comparisons = join_all(calls)
        .await
        .into_iter()
        .map(|(provider, outcome)| match outcome {
            Ok(quote) => PriceComparison {
                provider,
                price: Some(quote.price),
                url: quote.url,
                fetched_at: Some(quote.fetched_at),
                status: QuoteStatus::Live,
            },
            Err(e) => {
                cacheable &= !e.is_transient();
                if e.is_timeout() {
                    warn!(%provider, error = %e, "Provider timed out, using fallback link");
                } else {
                    debug!(%provider, error = %e, "fan_out: no live quote, using fallback link");
                }
                PriceComparison::fallback(provider, &links, &request.property_name)
            }
        })
        .collect();

    Fetched {
        comparisons,
        cacheable,
    }
}
