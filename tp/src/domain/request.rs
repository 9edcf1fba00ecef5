//! Trip request and its validation

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::EngineError;

/// Currency used when the request names none
pub const DEFAULT_CURRENCY: &str = "USD";

/// Caller-supplied preferences that parameterize planning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRequest {
    pub destination: String,
    /// Number of travel days
    pub days: u32,
    /// Total trip budget in trip currency units
    pub budget: f64,
    /// Interests used to tailor lodging and activities (e.g. Surfing, Heritage)
    #[serde(default)]
    pub interests: Vec<String>,
    /// Solo, Couple, Family, ...
    #[serde(default)]
    pub traveler_type: Option<String>,
    /// ISO 4217 code
    #[serde(default)]
    pub currency: Option<String>,
    /// Try to use a different property at every stop
    #[serde(default)]
    pub vary_hotels: bool,
    /// Fixes every pseudo-random choice
    #[serde(default)]
    pub seed: Option<u64>,
}

impl TripRequest {
    pub fn new(destination: impl Into<String>, days: u32, budget: f64) -> Self {
        Self {
            destination: destination.into(),
            days,
            budget,
            interests: Vec::new(),
            traveler_type: None,
            currency: None,
            vary_hotels: false,
            seed: None,
        }
    }

    pub fn with_interests<I, S>(mut self, interests: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.interests = interests.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_traveler_type(mut self, traveler_type: impl Into<String>) -> Self {
        self.traveler_type = Some(traveler_type.into());
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    pub fn with_vary_hotels(mut self, vary: bool) -> Self {
        self.vary_hotels = vary;
        self
    }

    /// Reject requests no plan can be built for
    pub fn validate(&self, max_days: u32) -> Result<(), EngineError> {
        debug!(destination = %self.destination, days = self.days, budget = self.budget, "TripRequest::validate: called");
        if self.destination.trim().is_empty() {
            return Err(EngineError::InvalidRequest("destination must not be empty".to_string()));
        }
        if self.days < 1 {
            return Err(EngineError::InvalidRequest("days must be at least 1".to_string()));
        }
        if self.days > max_days {
            return Err(EngineError::InvalidRequest(format!(
                "days must be at most {}, got {}",
                max_days, self.days
            )));
        }
        if !self.budget.is_finite() || self.budget < 0.0 {
            return Err(EngineError::InvalidRequest(format!(
                "budget must be a non-negative amount, got {}",
                self.budget
            )));
        }
        self.currency_code()?;
        Ok(())
    }

    /// Upper-cased currency code, defaulting to USD
    pub fn currency_code(&self) -> Result<String, EngineError> {
        let code = match self.currency.as_deref().map(str::trim) {
            None | Some("") => return Ok(DEFAULT_CURRENCY.to_string()),
            Some(code) => code,
        };
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(EngineError::InvalidRequest(format!("invalid currency code: {}", code)));
        }
        Ok(code.to_ascii_uppercase())
    }

    /// Interests trimmed, with blanks and case-insensitive duplicates removed
    pub fn normalized_interests(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for interest in &self.interests {
            let interest = interest.trim();
            if interest.is_empty() || out.iter().any(|i| i.eq_ignore_ascii_case(interest)) {
                continue;
            }
            out.push(interest.to_string());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_zero_budget() {
        let req = TripRequest::new("Sri Lanka", 3, 0.0);
        assert!(req.validate(60).is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_input() {
        assert!(matches!(
            TripRequest::new("Sri Lanka", 0, 100.0).validate(60),
            Err(EngineError::InvalidRequest(_))
        ));
        assert!(matches!(
            TripRequest::new("Sri Lanka", 3, -1.0).validate(60),
            Err(EngineError::InvalidRequest(_))
        ));
        assert!(matches!(
            TripRequest::new("   ", 3, 100.0).validate(60),
            Err(EngineError::InvalidRequest(_))
        ));
        assert!(matches!(
            TripRequest::new("Sri Lanka", 61, 100.0).validate(60),
            Err(EngineError::InvalidRequest(_))
        ));
        assert!(matches!(
            TripRequest::new("Sri Lanka", 3, f64::NAN).validate(60),
            Err(EngineError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_currency_code() {
        assert_eq!(TripRequest::new("x", 1, 1.0).currency_code().unwrap(), "USD");
        assert_eq!(
            TripRequest::new("x", 1, 1.0).with_currency(" lkr ").currency_code().unwrap(),
            "LKR"
        );
        assert!(TripRequest::new("x", 1, 1.0).with_currency("dollars").currency_code().is_err());
    }

    #[test]
    fn test_normalized_interests() {
        let req = TripRequest::new("x", 1, 1.0).with_interests(["Surfing", " surfing", "", "Heritage"]);
        assert_eq!(req.normalized_interests(), vec!["Surfing".to_string(), "Heritage".to_string()]);
    }

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{"destination":"Sri Lanka","days":5,"budget":500,"interests":["Surfing"],"travelerType":"Couple","varyHotels":true,"seed":42}"#;
        let req: TripRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.days, 5);
        assert_eq!(req.traveler_type.as_deref(), Some("Couple"));
        assert!(req.vary_hotels);
        assert_eq!(req.seed, Some(42));
        assert!(req.currency.is_none());
    }
}
