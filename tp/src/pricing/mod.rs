//! Price aggregation across booking providers
//!
//! Provides the provider adapter trait, the HTTP adapter used for every
//! partner, fallback link building, the shared price cache and the
//! aggregator that fans out to adapters.

use std::sync::Arc;

use tracing::{debug, warn};

pub mod adapter;
mod aggregator;
mod cache;
mod error;
mod http;
mod links;
mod provider;

pub use adapter::{ProviderAdapter, ProviderQuote, QuoteRequest};
pub use aggregator::{PriceAggregator, PriceComparison, QuoteStatus};
pub use cache::{ComparisonFetch, Fetched, PriceCache, QuoteKey};
pub use error::ProviderError;
pub use http::HttpQuoteAdapter;
pub use links::LinkBuilder;
pub use provider::Provider;

use crate::config::ProviderConfig;

/// Create one adapter per enabled provider
///
/// Later entries for a provider that is already configured are skipped.
pub fn create_adapters(configs: &[ProviderConfig]) -> Result<Vec<Arc<dyn ProviderAdapter>>, ProviderError> {
    debug!(count = configs.len(), "create_adapters: called");
    let mut adapters: Vec<Arc<dyn ProviderAdapter>> = Vec::new();
    for config in configs {
        if !config.enabled {
            debug!(provider = %config.provider, "create_adapters: provider disabled");
            continue;
        }
        if adapters.iter().any(|a| a.provider() == config.provider) {
            warn!(provider = %config.provider, "Provider configured twice, keeping the first entry");
            continue;
        }
        adapters.push(Arc::new(HttpQuoteAdapter::from_config(config)?));
    }
    adapters.sort_by_key(|a| a.provider());
    Ok(adapters)
}
