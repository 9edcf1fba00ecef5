//! HTTP provider adapter
//!
//! Talks to a partner rates endpoint:
//! `GET {base-url}/quotes?property=..&name=..&checkin=..&checkout=..&guests=..`
//! answering `{"price": 123.0, "url": "https://..."}`. 404 and 204 mean the
//! partner has nothing to offer for the stay.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::{Provider, ProviderAdapter, ProviderError, ProviderQuote, QuoteRequest};
use crate::config::ProviderConfig;

/// Body of a successful quote response
#[derive(Debug, Deserialize)]
struct QuoteBody {
    price: f64,
    url: String,
}

/// Adapter for a partner reachable over HTTP
pub struct HttpQuoteAdapter {
    provider: Provider,
    base_url: Option<String>,
    api_key: Option<String>,
    http: Client,
    timeout: Duration,
}

impl HttpQuoteAdapter {
    /// Create an adapter from provider configuration
    pub fn from_config(config: &ProviderConfig) -> Result<Self, ProviderError> {
        debug!(provider = %config.provider, base_url = ?config.base_url, "HttpQuoteAdapter::from_config: called");
        let timeout = config.timeout();
        let http = Client::builder().timeout(timeout).build().map_err(ProviderError::Network)?;

        Ok(Self {
            provider: config.provider,
            base_url: config
                .base_url
                .as_deref()
                .map(|u| u.trim().trim_end_matches('/').to_string())
                .filter(|u| !u.is_empty()),
            api_key: config.get_api_key(),
            http,
            timeout,
        })
    }

    /// Turn a response status and body into a quote
    fn parse_response(&self, status: StatusCode, body: &str) -> Result<ProviderQuote, ProviderError> {
        debug!(provider = %self.provider, %status, "HttpQuoteAdapter::parse_response: called");
        if status == StatusCode::NOT_FOUND || status == StatusCode::NO_CONTENT {
            return Err(ProviderError::Unavailable(format!("{} has no offer", self.provider.label())));
        }
        if !status.is_success() {
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        let parsed: QuoteBody =
            serde_json::from_str(body).map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
        if !parsed.price.is_finite() || parsed.price < 0.0 {
            return Err(ProviderError::InvalidResponse(format!("invalid price {}", parsed.price)));
        }
        if parsed.url.trim().is_empty() {
            return Err(ProviderError::InvalidResponse("missing deep link".to_string()));
        }

        Ok(ProviderQuote {
            provider: self.provider,
            price: parsed.price,
            url: parsed.url,
            fetched_at: Utc::now(),
        })
    }
}

#[async_trait]
impl ProviderAdapter for HttpQuoteAdapter {
    fn provider(&self) -> Provider {
        self.provider
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn quote(&self, request: &QuoteRequest) -> Result<ProviderQuote, ProviderError> {
        debug!(provider = %self.provider, property_id = %request.property_id, "HttpQuoteAdapter::quote: called");
        let Some(base_url) = &self.base_url else {
            debug!(provider = %self.provider, "HttpQuoteAdapter::quote: no endpoint configured");
            return Err(ProviderError::Unavailable("no endpoint configured".to_string()));
        };

        let guests = request.guests.to_string();
        let checkin = request.checkin.format("%Y-%m-%d").to_string();
        let checkout = request.checkout.format("%Y-%m-%d").to_string();
        let mut builder = self.http.get(format!("{}/quotes", base_url)).query(&[
            ("property", request.property_id.as_str()),
            ("name", request.property_name.as_str()),
            ("checkin", checkin.as_str()),
            ("checkout", checkout.as_str()),
            ("guests", guests.as_str()),
        ]);
        if let Some(key) = &self.api_key {
            builder = builder.header("x-api-key", key);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout(self.timeout)
            } else {
                ProviderError::Network(e)
            }
        })?;
        let status = response.status();
        let body = response.text().await?;
        self.parse_response(status, &body)
    }
}
