//! TripPlanner configuration types and loading

use eyre::{Context, Result, eyre};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use hotelcatalog::MemoryCatalog;

use crate::pricing::Provider;
use crate::reference::ReferenceTables;

/// Main TripPlanner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// Planning policy constants
    pub planner: PlannerConfig,

    /// Reference tables source
    pub reference: ReferenceConfig,

    /// Property catalog source
    pub catalog: CatalogConfig,

    /// Price aggregation settings
    pub pricing: PricingConfig,

    /// Booking provider adapters
    pub providers: Vec<ProviderConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: None,
            planner: PlannerConfig::default(),
            reference: ReferenceConfig::default(),
            catalog: CatalogConfig::default(),
            pricing: PricingConfig::default(),
            providers: default_providers(),
        }
    }
}

impl Config {
    /// Validate configuration before use
    pub fn validate(&self) -> Result<()> {
        self.planner.validate()?;
        self.pricing.validate()?;
        for provider in &self.providers {
            if provider.timeout_ms == 0 {
                return Err(eyre!("providers.{}: timeout-ms must be greater than zero", provider.provider));
            }
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .tripplanner.yml
        let local_config = PathBuf::from(".tripplanner.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/tripplanner/tripplanner.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("tripplanner").join("tripplanner.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is initialized
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        Self::load(config_path).ok().and_then(|c| c.log_level)
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Planning policy constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Share of the per-night budget estimated for daily non-lodging spend
    #[serde(rename = "non-lodging-fraction")]
    pub non_lodging_fraction: f64,

    /// Multiplier on the per-night budget when filtering lodging candidates
    #[serde(rename = "price-tolerance")]
    pub price_tolerance: f64,

    /// Number of top-ranked hotels the seeded draw chooses from
    #[serde(rename = "top-k")]
    pub top_k: usize,

    /// Target number of activities per day
    #[serde(rename = "activities-per-day")]
    pub activities_per_day: usize,

    /// Score added per amenity matching an interest
    #[serde(rename = "amenity-weight")]
    pub amenity_weight: f64,

    /// Longest trip accepted
    #[serde(rename = "max-days")]
    pub max_days: u32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            non_lodging_fraction: 0.40,
            price_tolerance: 1.15,
            top_k: 3,
            activities_per_day: 3,
            amenity_weight: 0.5,
            max_days: 60,
        }
    }
}

impl PlannerConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.non_lodging_fraction.is_finite() || self.non_lodging_fraction < 0.0 {
            return Err(eyre!("planner.non-lodging-fraction must be a non-negative number"));
        }
        if !self.price_tolerance.is_finite() || self.price_tolerance < 1.0 {
            return Err(eyre!("planner.price-tolerance must be at least 1.0"));
        }
        if self.top_k == 0 {
            return Err(eyre!("planner.top-k must be at least 1"));
        }
        if self.max_days == 0 {
            return Err(eyre!("planner.max-days must be at least 1"));
        }
        Ok(())
    }
}

/// Where reference tables come from
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceConfig {
    /// YAML file replacing the embedded tables
    pub path: Option<PathBuf>,
}

impl ReferenceConfig {
    /// Load the configured tables, or the embedded defaults
    pub fn load(&self) -> Result<ReferenceTables> {
        match &self.path {
            Some(path) => ReferenceTables::from_path(path),
            None => ReferenceTables::embedded(),
        }
    }
}

/// Where the property catalog comes from
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// JSON or YAML catalog file replacing the embedded dataset
    pub path: Option<PathBuf>,
}

impl CatalogConfig {
    /// Open the configured catalog, or the embedded dataset
    pub fn open(&self) -> Result<MemoryCatalog> {
        match &self.path {
            Some(path) => {
                MemoryCatalog::from_path(path).context(format!("Failed to load catalog from {}", path.display()))
            }
            None => MemoryCatalog::embedded().context("Failed to load embedded catalog"),
        }
    }
}

/// Price aggregation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Shared deadline for one fan-out across all providers
    #[serde(rename = "deadline-ms")]
    pub deadline_ms: u64,

    /// How long aggregated results are reused
    #[serde(rename = "cache-ttl-secs")]
    pub cache_ttl_secs: u64,

    /// Upper bound on cached keys
    #[serde(rename = "cache-max-entries")]
    pub cache_max_entries: usize,

    /// Guest count used when the caller gives none
    #[serde(rename = "default-guests")]
    pub default_guests: u32,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            deadline_ms: 5_000,
            cache_ttl_secs: 300,
            cache_max_entries: 1024,
            default_guests: 2,
        }
    }
}

impl PricingConfig {
    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.deadline_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn validate(&self) -> Result<()> {
        if self.deadline_ms == 0 {
            return Err(eyre!("pricing.deadline-ms must be greater than zero"));
        }
        if self.cache_max_entries == 0 {
            return Err(eyre!("pricing.cache-max-entries must be at least 1"));
        }
        if self.default_guests == 0 {
            return Err(eyre!("pricing.default-guests must be at least 1"));
        }
        Ok(())
    }
}

/// One booking partner's adapter settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Which partner this entry configures
    pub provider: Provider,

    /// Disabled providers are left out of comparisons entirely
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Partner rates endpoint; without one the adapter always reports unavailable
    #[serde(default, rename = "base-url")]
    pub base_url: Option<String>,

    /// Environment variable containing the partner API key
    #[serde(default, rename = "api-key-env")]
    pub api_key_env: Option<String>,

    /// Per-request timeout in milliseconds
    #[serde(default = "default_provider_timeout_ms", rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Affiliate id appended to fallback links
    #[serde(default, rename = "affiliate-id")]
    pub affiliate_id: Option<String>,

    /// Environment variable consulted when `affiliate-id` is unset
    #[serde(default, rename = "affiliate-id-env")]
    pub affiliate_id_env: Option<String>,
}

fn default_enabled() -> bool {
    true
}

fn default_provider_timeout_ms() -> u64 {
    3_000
}

impl ProviderConfig {
    /// Default entry for a partner: enabled, no endpoint, affiliate id from env
    pub fn for_provider(provider: Provider) -> Self {
        Self {
            provider,
            enabled: true,
            base_url: None,
            api_key_env: None,
            timeout_ms: default_provider_timeout_ms(),
            affiliate_id: None,
            affiliate_id_env: Some(provider.default_affiliate_env().to_string()),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Affiliate id from config, falling back to the environment
    pub fn resolve_affiliate_id(&self) -> Option<String> {
        let configured = self.affiliate_id.as_deref().map(str::trim).filter(|s| !s.is_empty());
        if let Some(id) = configured {
            return Some(id.to_string());
        }
        let var = self.affiliate_id_env.as_deref()?;
        std::env::var(var).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
    }

    /// API key from the configured environment variable, if any
    pub fn get_api_key(&self) -> Option<String> {
        let var = self.api_key_env.as_deref()?;
        std::env::var(var).ok().filter(|v| !v.is_empty())
    }
}

/// One default entry per known partner
pub fn default_providers() -> Vec<ProviderConfig> {
    Provider::ALL.iter().copied().map(ProviderConfig::for_provider).collect()
}
