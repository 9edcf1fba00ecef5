//! ProviderAdapter trait definition

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{Provider, ProviderError};

/// What a provider is asked to price
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub property_id: String,
    pub property_name: String,
    pub city: String,
    pub checkin: NaiveDate,
    pub checkout: NaiveDate,
    pub guests: u32,
}

/// A live price from one provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderQuote {
    pub provider: Provider,
    pub price: f64,
    /// Deep link to book at this price
    pub url: String,
    pub fetched_at: DateTime<Utc>,
}

/// A booking partner that can quote a stay
///
/// One implementation per partner; the aggregator only sees this trait, so
/// adding a partner never touches the fan-out logic.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Partner this adapter talks to
    fn provider(&self) -> Provider;

    /// Upper bound on a single `quote` call
    fn timeout(&self) -> Duration;

    /// Price the stay, or explain why no price is available
    async fn quote(&self, request: &QuoteRequest) -> Result<ProviderQuote, ProviderError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing::debug;

    /// Mock adapter for unit tests: answers after `delay` with a fixed price or error
    pub struct MockAdapter {
        provider: Provider,
        delay: Duration,
        price: Option<f64>,
        timeout: Duration,
        call_count: AtomicUsize,
    }

    impl MockAdapter {
        pub fn priced(provider: Provider, price: f64) -> Self {
            debug!(%provider, %price, "MockAdapter::priced: called");
            Self {
                provider,
                delay: Duration::ZERO,
                price: Some(price),
                timeout: Duration::from_secs(5),
                call_count: AtomicUsize::new(0),
            }
        }

        pub fn unavailable(provider: Provider) -> Self {
            Self {
                price: None,
                ..Self::priced(provider, 0.0)
            }
        }

        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        pub fn with_timeout(mut self, timeout: Duration) -> Self {
            self.timeout = timeout;
            self
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ProviderAdapter for MockAdapter {
        fn provider(&self) -> Provider {
            self.provider
        }

        fn timeout(&self) -> Duration {
            self.timeout
        }

        async fn quote(&self, request: &QuoteRequest) -> Result<ProviderQuote, ProviderError> {
            debug!(provider = %self.provider, "MockAdapter::quote: called");
            self.call_count.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            match self.price {
                Some(price) => Ok(ProviderQuote {
                    provider: self.provider,
                    price,
                    url: format!("https://{}.example/{}", self.provider, request.property_id),
                    fetched_at: Utc::now(),
                }),
                None => Err(ProviderError::Unavailable("mock has no rooms".to_string())),
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn request() -> QuoteRequest {
            QuoteRequest {
                property_id: "lk-ella-01".to_string(),
                property_name: "Nine Arch Bridge Lodge".to_string(),
                city: "Ella".to_string(),
                checkin: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
                checkout: NaiveDate::from_ymd_opt(2026, 3, 4).unwrap(),
                guests: 2,
            }
        }

        #[tokio::test]
        async fn test_mock_adapter_returns_price() {
            let adapter = MockAdapter::priced(Provider::Agoda, 88.0);
            let quote = adapter.quote(&request()).await.unwrap();
            assert_eq!(quote.price, 88.0);
            assert_eq!(quote.provider, Provider::Agoda);
            assert_eq!(adapter.call_count(), 1);
        }

        #[tokio::test]
        async fn test_mock_adapter_unavailable() {
            let adapter = MockAdapter::unavailable(Provider::Booking);
            assert!(adapter.quote(&request()).await.is_err());
        }
    }
}
