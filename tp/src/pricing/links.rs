//! Deterministic provider search links used when no live quote exists

use std::collections::BTreeMap;
use tracing::debug;
use url::form_urlencoded;

use super::Provider;
use crate::config::ProviderConfig;

/// Builds provider search URLs, appending affiliate ids where configured
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkBuilder {
    affiliate_ids: BTreeMap<Provider, String>,
}

/// Percent-encode a URL component; spaces become `%20`
fn encode_component(term: &str) -> String {
    // byte_serialize emits '+' only for spaces and escapes a literal '+'
    form_urlencoded::byte_serialize(term.trim().as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

impl LinkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Affiliate ids resolved from provider config and the environment
    pub fn from_config(providers: &[ProviderConfig]) -> Self {
        debug!(count = providers.len(), "LinkBuilder::from_config: called");
        let mut builder = Self::new();
        for config in providers {
            if let Some(id) = config.resolve_affiliate_id() {
                builder = builder.with_affiliate(config.provider, id);
            }
        }
        builder
    }

    pub fn with_affiliate(mut self, provider: Provider, id: impl Into<String>) -> Self {
        self.affiliate_ids.insert(provider, id.into());
        self
    }

    pub fn affiliate_id(&self, provider: Provider) -> Option<&str> {
        self.affiliate_ids.get(&provider).map(String::as_str)
    }

    /// Search URL for `term` on `provider`
    pub fn build(&self, provider: Provider, term: &str) -> String {
        let term = encode_component(term);
        let affiliate = self.affiliate_id(provider).map(encode_component);
        match provider {
            Provider::Agoda => {
                let base = format!("https://www.agoda.com/Search?city={}", term);
                match affiliate {
                    Some(id) => format!("{}&cid={}", base, id),
                    None => base,
                }
            }
            Provider::Booking => {
                let base = format!("https://www.booking.com/searchresults.html?ss={}", term);
                match affiliate {
                    Some(id) => format!("{}&aid={}", base, id),
                    None => base,
                }
            }
            Provider::Airbnb => {
                let base = format!("https://www.airbnb.com/s/{}/homes", term);
                match affiliate {
                    Some(id) => format!("{}?af={}", base, id),
                    None => base,
                }
            }
        }
    }

    /// One search URL per provider, keyed in provider order
    pub fn build_all(&self, term: &str) -> BTreeMap<Provider, String> {
        Provider::ALL.iter().map(|p| (*p, self.build(*p, term))).collect()
    }
}
