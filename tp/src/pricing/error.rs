//! Provider adapter error types

use std::time::Duration;
use thiserror::Error;

/// Why a single provider produced no live quote
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("No quote available: {0}")]
    Unavailable(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// Check if the provider ran out of time
    pub fn is_timeout(&self) -> bool {
        match self {
            ProviderError::Timeout(_) => true,
            ProviderError::Network(e) => e.is_timeout(),
            _ => false,
        }
    }

    /// Whether asking again could give a different answer
    ///
    /// `Unavailable` is the provider's answer; everything else is a failure
    /// to get one.
    pub fn is_transient(&self) -> bool {
        !matches!(self, ProviderError::Unavailable(_))
    }
}
