//! CLI command definitions and subcommands

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

/// TripPlanner - itinerary planning and price comparison
#[derive(Parser)]
#[command(
    name = "tp",
    about = "Plan multi-city trips and compare lodging prices across booking partners",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Plan a trip
    Plan {
        /// Destination: an itinerary name, alias or city
        #[arg(short, long)]
        destination: String,

        /// Number of days (one night each)
        #[arg(short = 'n', long)]
        days: u32,

        /// Total budget in the trip currency
        #[arg(short, long)]
        budget: f64,

        /// Interest to plan around (repeatable)
        #[arg(short, long = "interest", value_name = "INTEREST")]
        interests: Vec<String>,

        /// Traveler type (solo, couple, family, group, friends)
        #[arg(short, long)]
        traveler_type: Option<String>,

        /// ISO 4217 currency code
        #[arg(long)]
        currency: Option<String>,

        /// Prefer a different property at every stop
        #[arg(long)]
        vary_hotels: bool,

        /// Seed for reproducible plans
        #[arg(short, long)]
        seed: Option<u64>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Compare a property's price across providers
    Prices {
        /// Property id
        property_id: String,

        /// Check-in date (YYYY-MM-DD), default one week from today
        #[arg(long)]
        checkin: Option<NaiveDate>,

        /// Check-out date (YYYY-MM-DD), default the day after check-in
        #[arg(long)]
        checkout: Option<NaiveDate>,

        /// Number of guests
        #[arg(short, long)]
        guests: Option<u32>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Search the property catalog
    Hotels {
        /// City to search in
        #[arg(long)]
        city: Option<String>,

        /// Minimum rating (0-5)
        #[arg(long)]
        min_rating: Option<f64>,

        /// Maximum nightly price
        #[arg(long)]
        max_price: Option<f64>,

        /// Required amenity (repeatable)
        #[arg(short, long = "amenity", value_name = "AMENITY")]
        amenities: Vec<String>,

        /// Page number, starting at 1
        #[arg(long, default_value = "1")]
        page: usize,

        /// Results per page
        #[arg(long, default_value = "10")]
        page_size: usize,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Show one property
    Hotel {
        /// Property id
        id: String,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// List known destinations
    Destinations {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },
}

/// Output format for command results
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        debug!(%s, "OutputFormat::from_str: called");
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use text or json", s)),
        }
    }
}

/// Path of the log file written by the binary
pub fn get_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tripplanner")
        .join("logs")
        .join("tripplanner.log")
}
